//! Ply-indexed move history with a replay cursor.
//!
//! Entries `1..=cursor` are the live timeline. Jumping back moves the cursor
//! but keeps the later entries around until a fresh move is appended, which
//! starts a new timeline and drops them.

use std::path::Path;

use chess_core::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::match_state::MatchStatus;
use crate::request::MoveRequest;
use crate::rules::PositionToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based half-move index.
    pub ply: usize,
    pub request: MoveRequest,
    /// Standard algebraic notation.
    pub notation: String,
    /// Position after this ply.
    pub position: PositionToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history entry out of sequence: expected ply {expected}, got {got}")]
    OutOfSequence { expected: usize, got: usize },
    #[error("ply {requested} is beyond the recorded history ({len} plies)")]
    OutOfRange { requested: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    first_move_number: u32,
    first_to_move: Color,
}

impl Default for History {
    fn default() -> Self {
        Self::new(1, Color::White)
    }
}

impl History {
    /// Empty history for a game whose initial position is at
    /// `first_move_number` with `first_to_move` on move.
    pub fn new(first_move_number: u32, first_to_move: Color) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            first_move_number,
            first_to_move,
        }
    }

    /// Recorded plies, including any beyond the cursor.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ply the board currently shows.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn next_ply(&self) -> usize {
        self.cursor + 1
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries up to and including the cursor.
    pub fn live(&self) -> &[HistoryEntry] {
        &self.entries[..self.cursor]
    }

    pub fn get(&self, ply: usize) -> Option<&HistoryEntry> {
        ply.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn append(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let expected = self.cursor + 1;
        if entry.ply != expected {
            return Err(HistoryError::OutOfSequence {
                expected,
                got: entry.ply,
            });
        }
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        self.cursor = expected;
        Ok(())
    }

    /// Requests that rebuild the position at `ply`.
    pub fn requests_to(&self, ply: usize) -> Result<Vec<MoveRequest>, HistoryError> {
        if ply > self.entries.len() {
            return Err(HistoryError::OutOfRange {
                requested: ply,
                len: self.entries.len(),
            });
        }
        Ok(self.entries[..ply].iter().map(|e| e.request).collect())
    }

    pub fn set_cursor(&mut self, ply: usize) -> Result<(), HistoryError> {
        if ply > self.entries.len() {
            return Err(HistoryError::OutOfRange {
                requested: ply,
                len: self.entries.len(),
            });
        }
        self.cursor = ply;
        Ok(())
    }

    /// Drop the last `plies` live entries (and everything after them).
    pub fn undo(&mut self, plies: usize) {
        self.cursor = self.cursor.saturating_sub(plies);
        self.entries.truncate(self.cursor);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Numbered move text for the live timeline, one string per move number:
    /// `["1. e4 e5", "2. Nf3"]`, or `["1... e5", ...]` when black moved first.
    pub fn move_pairs(&self) -> Vec<String> {
        let mut pairs = Vec::new();
        let mut number = self.first_move_number;
        let mut notations = self.live().iter().map(|e| e.notation.as_str());

        if self.first_to_move == Color::Black {
            match notations.next() {
                Some(first) => pairs.push(format!("{number}... {first}")),
                None => return pairs,
            }
            number += 1;
        }

        loop {
            match (notations.next(), notations.next()) {
                (Some(white), Some(black)) => pairs.push(format!("{number}. {white} {black}")),
                (Some(white), None) => {
                    pairs.push(format!("{number}. {white}"));
                    break;
                }
                _ => break,
            }
            number += 1;
        }
        pairs
    }

    /// Move text on one line, or `None` as shown for an empty game.
    pub fn movetext(&self) -> String {
        let pairs = self.move_pairs();
        if pairs.is_empty() {
            "None".to_string()
        } else {
            pairs.join(" ")
        }
    }

    pub fn record(&self, start: &PositionToken, status: &MatchStatus) -> MatchRecord {
        let live = self.live();
        MatchRecord {
            start_position: start.clone(),
            moves: live.iter().map(|e| e.notation.clone()).collect(),
            uci_moves: live.iter().map(|e| e.request.to_uci()).collect(),
            final_position: live
                .last()
                .map(|e| e.position.clone())
                .unwrap_or_else(|| start.clone()),
            status: status.to_string(),
        }
    }
}

/// Serializable snapshot of the live timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub start_position: PositionToken,
    /// SAN of each ply.
    pub moves: Vec<String>,
    pub uci_moves: Vec<String>,
    pub final_position: PositionToken,
    pub status: String,
}

impl MatchRecord {
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read: {}", e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse: {}", e))
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod history_tests;
