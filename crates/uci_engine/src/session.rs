//! One UCI conversation: parses a command line, updates the position and
//! produces the lines to print.

use chess_core::{move_to_uci, score_root_moves, set_position_from_uci, Position};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

pub const DEFAULT_DEPTH: u8 = 3;
pub const MAX_DEPTH: u8 = 8;

pub enum Control {
    Reply(Vec<String>),
    Quit,
}

pub struct Session<R> {
    position: Position,
    /// `Depth` option; also caps `go depth N`.
    depth: u8,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(rng: R) -> Self {
        Self {
            position: Position::startpos(),
            depth: DEFAULT_DEPTH,
            rng,
        }
    }

    pub fn handle(&mut self, line: &str) -> Control {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return Control::Reply(Vec::new());
        };

        let reply = match command {
            "uci" => vec![
                "id name ML-chess 0.2".to_string(),
                "id author ML-chess".to_string(),
                format!(
                    "option name Depth type spin default {DEFAULT_DEPTH} min 1 max {MAX_DEPTH}"
                ),
                "uciok".to_string(),
            ],
            "isready" => vec!["readyok".to_string()],
            "setoption" => {
                self.set_option(&parts[1..]);
                Vec::new()
            }
            "ucinewgame" => {
                self.position = Position::startpos();
                Vec::new()
            }
            "position" => {
                if let Err(err) = set_position_from_uci(&mut self.position, &parts[1..]) {
                    warn!(%err, line, "bad position command, keeping previous position");
                }
                Vec::new()
            }
            "go" => vec![self.go(&parts[1..])],
            // Searches finish before the next command is read, so there is
            // never anything to stop.
            "stop" => Vec::new(),
            "quit" => return Control::Quit,
            other => {
                debug!(command = other, "ignoring unknown command");
                Vec::new()
            }
        };
        Control::Reply(reply)
    }

    /// `setoption name Depth value N`
    fn set_option(&mut self, args: &[&str]) {
        let name = args
            .iter()
            .position(|&a| a == "name")
            .and_then(|i| args.get(i + 1));
        let value = args
            .iter()
            .position(|&a| a == "value")
            .and_then(|i| args.get(i + 1))
            .and_then(|v| v.parse::<u8>().ok());
        match (name, value) {
            (Some(&"Depth"), Some(depth)) => {
                self.depth = depth.clamp(1, MAX_DEPTH);
                info!(depth = self.depth, "search depth set");
            }
            _ => debug!(?args, "unsupported option"),
        }
    }

    /// Search and return the `bestmove` line. `go depth N` is honoured up to
    /// the `Depth` option; time controls are ignored.
    fn go(&mut self, args: &[&str]) -> String {
        let requested = args
            .iter()
            .position(|&a| a == "depth")
            .and_then(|i| args.get(i + 1))
            .and_then(|d| d.parse::<u8>().ok());
        let depth = requested.map_or(self.depth, |d| d.clamp(1, self.depth));

        let scored = score_root_moves(&self.position, depth);
        let Some(best) = scored.iter().map(|&(_, score)| score).max() else {
            return "bestmove 0000".to_string();
        };
        let candidates: Vec<_> = scored
            .iter()
            .filter(|&&(_, score)| score == best)
            .map(|&(mv, _)| mv)
            .collect();
        match candidates.choose(&mut self.rng) {
            Some(&mv) => {
                debug!(depth, score = best, ties = candidates.len(), "search done");
                format!("bestmove {}", move_to_uci(mv))
            }
            None => "bestmove 0000".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
