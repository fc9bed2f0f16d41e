//! Terminal chess: a human against a UCI engine, or two humans.

mod app;
mod cli;
mod command;
mod engine_process;
mod input;
mod terminal;

use std::env;

use anyhow::Context;
use match_controller::{Controller, ControllerConfig, EngineOrchestrator, MatchMode, SystemClock};
use tokio::sync::mpsc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::app::{App, Flow};
use crate::engine_process::ProcessChannel;
use crate::terminal::TerminalRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match cli::parse_args(&args) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err:#}");
            cli::print_usage();
            std::process::exit(2);
        }
    };
    if cli.help {
        cli::print_usage();
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ControllerConfig::default(),
    };
    cli.apply(&mut config);
    let game = config.initial_game().context("building start position")?;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (promotion, router) = input::promotion_prompt();
    input::spawn_stdin_reader(events_tx.clone(), router);
    let renderer = TerminalRenderer::new();

    let (controller, engine) = match config.match_mode() {
        MatchMode::HumanVsHuman => (Controller::human_vs_human(game, renderer, promotion), None),
        MatchMode::HumanVsEngine { human } => {
            let path = config
                .engine_path
                .clone()
                .unwrap_or_else(engine_process::default_engine_path);
            let (process, channel) = match engine_process::spawn(&path, events_tx.clone()) {
                Ok((process, channel)) => (Some(process), channel),
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "continuing without an engine");
                    (None, ProcessChannel::disconnected())
                }
            };
            let orchestrator = EngineOrchestrator::new(
                Box::new(channel),
                Box::new(SystemClock),
                config.engine_settings(),
            );
            let controller =
                Controller::human_vs_engine(game, renderer, promotion, human, orchestrator);
            (controller, process)
        }
    };

    let mut app = App::new(controller, events_tx);
    app.start();
    while let Some(event) = events_rx.recv().await {
        if app.update(event) == Flow::Quit {
            break;
        }
    }
    app.shutdown();
    if let Some(process) = engine {
        process.shutdown().await;
    }
    Ok(())
}
