use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod session;

use session::{Control, Session};

fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut session = Session::new(rand::thread_rng());

    for line in stdin.lock().lines() {
        let line = line.context("reading command from stdin")?;
        match session.handle(&line) {
            Control::Reply(lines) => {
                for reply in lines {
                    writeln!(stdout, "{reply}").context("writing to stdout")?;
                }
                stdout.flush().context("flushing stdout")?;
            }
            Control::Quit => break,
        }
    }
    Ok(())
}
