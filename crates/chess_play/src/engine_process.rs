//! External UCI engine over a child process's stdin/stdout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use match_controller::{ChannelError, EngineChannel};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::app::AppEvent;

/// Sending half handed to the orchestrator. Commands are queued and written
/// by a background task, so `send` never blocks.
#[derive(Debug, Clone)]
pub struct ProcessChannel {
    commands: UnboundedSender<String>,
}

impl ProcessChannel {
    /// A channel with no engine behind it; every send fails.
    pub fn disconnected() -> Self {
        let (commands, _) = mpsc::unbounded_channel();
        Self { commands }
    }
}

impl EngineChannel for ProcessChannel {
    fn send(&mut self, command: &str) -> Result<(), ChannelError> {
        self.commands
            .send(command.to_string())
            .map_err(|_| ChannelError::Closed)
    }
}

pub struct EngineProcess {
    child: Child,
    path: PathBuf,
}

/// The `uci_engine` binary built alongside this one.
pub fn default_engine_path() -> PathBuf {
    let name = format!("uci_engine{}", std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&name)))
        .unwrap_or_else(|| PathBuf::from(name))
}

/// Start the engine. Its output lines arrive as [`AppEvent::EngineLine`],
/// followed by one [`AppEvent::EngineExited`] when stdout closes.
pub fn spawn(
    path: &Path,
    events: UnboundedSender<AppEvent>,
) -> anyhow::Result<(EngineProcess, ProcessChannel)> {
    let mut child = Command::new(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to start engine {}", path.display()))?;

    let stdin = child.stdin.take().context("engine stdin not captured")?;
    let stdout = child.stdout.take().context("engine stdout not captured")?;
    let (commands, queue) = mpsc::unbounded_channel();
    tokio::spawn(write_commands(stdin, queue));
    tokio::spawn(read_output(stdout, events));

    info!(engine = %path.display(), "engine started");
    Ok((
        EngineProcess {
            child,
            path: path.to_path_buf(),
        },
        ProcessChannel { commands },
    ))
}

async fn write_commands(mut stdin: ChildStdin, mut queue: UnboundedReceiver<String>) {
    while let Some(command) = queue.recv().await {
        debug!(target: "uci", ">> {command}");
        let line = format!("{command}\n");
        if let Err(err) = stdin.write_all(line.as_bytes()).await {
            warn!(error = %err, "engine stdin closed");
            break;
        }
        if let Err(err) = stdin.flush().await {
            warn!(error = %err, "engine stdin flush failed");
            break;
        }
    }
}

async fn read_output(stdout: ChildStdout, events: UnboundedSender<AppEvent>) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                debug!(target: "uci", "<< {line}");
                if events.send(AppEvent::EngineLine(line)).is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "reading engine output failed");
                break;
            }
        }
    }
    let _ = events.send(AppEvent::EngineExited);
}

impl EngineProcess {
    /// Give the engine a moment to act on `quit`, then kill it.
    pub async fn shutdown(mut self) {
        match tokio::time::timeout(Duration::from_secs(1), self.child.wait()).await {
            Ok(Ok(status)) => debug!(engine = %self.path.display(), %status, "engine exited"),
            Ok(Err(err)) => warn!(error = %err, "waiting for engine failed"),
            Err(_) => {
                warn!(engine = %self.path.display(), "engine ignored quit; killing it");
                let _ = self.child.kill().await;
            }
        }
    }
}
