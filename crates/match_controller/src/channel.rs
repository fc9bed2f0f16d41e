//! Line-oriented channel to an out-of-process UCI engine, plus the few bits
//! of UCI text the orchestrator needs.

use thiserror::Error;

use crate::request::MoveRequest;
use crate::rules::PositionToken;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("engine channel closed")]
    Closed,
    #[error("engine I/O error: {0}")]
    Io(String),
}

/// Outbound half of the engine pipe. Sending is fire-and-forget; replies
/// come back to the host as separate line events.
pub trait EngineChannel {
    /// Write one command line (without the trailing newline).
    fn send(&mut self, command: &str) -> Result<(), ChannelError>;
}

impl<C: EngineChannel + ?Sized> EngineChannel for Box<C> {
    fn send(&mut self, command: &str) -> Result<(), ChannelError> {
        (**self).send(command)
    }
}

pub(crate) fn position_command(position: &PositionToken) -> String {
    format!("position fen {position}")
}

pub(crate) fn go_command(depth: u8) -> String {
    format!("go depth {depth}")
}

/// Parsed `bestmove` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestMove {
    Move(MoveRequest),
    /// `bestmove (none)` or `bestmove 0000`: the engine has no move.
    None,
    /// A `bestmove` line whose move text is missing or unreadable.
    Invalid(String),
}

/// Extract the reply from an engine output line. Lines without a `bestmove`
/// token (`info`, `readyok`, ...) yield `None`.
pub fn parse_bestmove(line: &str) -> Option<BestMove> {
    let mut tokens = line.split_whitespace();
    tokens.find(|&t| t == "bestmove")?;
    let reply = match tokens.next() {
        Some("(none)") | Some("0000") => BestMove::None,
        Some(text) => match MoveRequest::parse_uci(text) {
            Some(request) => BestMove::Move(request),
            None => BestMove::Invalid(text.to_string()),
        },
        None => BestMove::Invalid(String::new()),
    };
    Some(reply)
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod channel_tests;
