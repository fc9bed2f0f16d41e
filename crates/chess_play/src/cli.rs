//! Command-line flags. They override the config file.

use std::path::PathBuf;

use anyhow::{bail, Context};
use chess_core::Color;
use match_controller::{ControllerConfig, ModeKind};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub engine: Option<PathBuf>,
    pub human: Option<Color>,
    pub human_vs_human: bool,
    pub depth: Option<u8>,
    pub help: bool,
}

pub fn print_usage() {
    println!("ML-chess terminal play");
    println!();
    println!("Usage:");
    println!("  chess_play [--config FILE] [--engine PATH] [--human white|black] [--depth N] [--hvh]");
    println!();
    println!("Options:");
    println!("  --config, -c   TOML match configuration");
    println!("  --engine, -e   UCI engine executable (default: bundled uci_engine)");
    println!("  --human        Colour you play against the engine");
    println!("  --depth, -d    Search depth sent with `go depth`");
    println!("  --hvh          Two humans at one terminal, no engine");
    println!();
    print_commands();
}

pub fn print_commands() {
    println!("Commands:");
    println!("  e2            click a square (select, move, deselect)");
    println!("  e2 e4 | e2e4  drag a piece from one square to another");
    println!("  undo          take back your last move");
    println!("  reset         start over");
    println!("  flip          turn the board around");
    println!("  jump N        show the position after ply N (0 = start)");
    println!("  history       list the moves");
    println!("  save FILE     write the game as JSON");
    println!("  status        show whose turn it is");
    println!("  help          this text");
    println!("  quit          leave");
}

pub fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => cli.config = Some(PathBuf::from(value(args, i)?)),
            "--engine" | "-e" => cli.engine = Some(PathBuf::from(value(args, i)?)),
            "--human" => {
                let text = value(args, i)?;
                let color = text
                    .parse::<Color>()
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("--human {text}"))?;
                cli.human = Some(color);
            }
            "--depth" | "-d" => {
                let text = value(args, i)?;
                let depth = text
                    .parse::<u8>()
                    .with_context(|| format!("--depth {text}"))?;
                cli.depth = Some(depth);
            }
            "--hvh" => {
                cli.human_vs_human = true;
                i += 1;
                continue;
            }
            "--help" | "-h" => {
                cli.help = true;
                i += 1;
                continue;
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 2;
    }
    Ok(cli)
}

fn value(args: &[String], i: usize) -> anyhow::Result<&str> {
    match args.get(i + 1) {
        Some(v) => Ok(v.as_str()),
        None => bail!("{} needs a value", args[i]),
    }
}

impl CliArgs {
    pub fn apply(&self, config: &mut ControllerConfig) {
        if let Some(engine) = &self.engine {
            config.engine_path = Some(engine.clone());
        }
        if let Some(human) = self.human {
            config.human_color = human;
            config.mode = ModeKind::HumanVsEngine;
        }
        if let Some(depth) = self.depth {
            config.search_depth = depth;
        }
        if self.human_vs_human {
            config.mode = ModeKind::HumanVsHuman;
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
