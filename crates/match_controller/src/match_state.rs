//! Match state: the rule engine plus the status derived from it.

use std::fmt;

use chess_core::{Color, Piece, Square};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::request::MoveRequest;
use crate::rules::{AppliedMove, LegalTarget, PositionToken, RuleEngine, RuleError};
use crate::selection::SelectionBoard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalReason {
    Checkmate,
    Draw,
    None,
}

/// Snapshot of whose turn it is and whether the game is over. Always
/// recomputed from the rule engine, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStatus {
    pub turn: Color,
    pub terminal: bool,
    pub reason: TerminalReason,
    pub in_check: bool,
}

impl MatchStatus {
    pub fn from_rules<R: RuleEngine>(rules: &R) -> Self {
        let turn = rules.turn();
        let reason = if rules.is_checkmate() {
            TerminalReason::Checkmate
        } else if rules.is_draw() {
            TerminalReason::Draw
        } else {
            TerminalReason::None
        };
        Self {
            turn,
            terminal: reason != TerminalReason::None,
            reason,
            in_check: rules.is_check(),
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            TerminalReason::Checkmate => write!(f, "CHECKMATE! {} lost.", self.turn),
            TerminalReason::Draw => f.write_str("DRAW."),
            TerminalReason::None if self.in_check => {
                write!(f, "{}'s Turn (Check!)", self.turn)
            }
            TerminalReason::None => write!(f, "{}'s Turn", self.turn),
        }
    }
}

/// Why a move attempt was refused. The match is unchanged either way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("illegal move {0}")]
    Illegal(MoveRequest),
    #[error("rule engine failed on {request}: {message}")]
    Internal {
        request: MoveRequest,
        message: String,
    },
}

impl Rejected {
    pub fn request(&self) -> MoveRequest {
        match self {
            Rejected::Illegal(request) => *request,
            Rejected::Internal { request, .. } => *request,
        }
    }
}

/// Owns the rule engine. The single source of truth for board, turn and
/// termination.
#[derive(Debug, Clone)]
pub struct MatchState<R> {
    rules: R,
}

impl<R: RuleEngine> MatchState<R> {
    pub fn new(rules: R) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn attempt_move(&mut self, request: &MoveRequest) -> Result<AppliedMove, Rejected> {
        let applied = self
            .rules
            .apply_move(request)
            .map_err(|err| rejection(request, err))?;
        debug!(request = %applied.request, san = %applied.notation, "move applied");
        Ok(applied)
    }

    pub fn status(&self) -> MatchStatus {
        MatchStatus::from_rules(&self.rules)
    }

    pub fn turn(&self) -> Color {
        self.rules.turn()
    }

    pub fn position_token(&self) -> PositionToken {
        self.rules.position_token()
    }

    pub fn initial_token(&self) -> PositionToken {
        self.rules.initial_token()
    }

    pub fn moves_from(&self, square: Square) -> Vec<LegalTarget> {
        self.rules.moves_from(square)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.rules.piece_at(square)
    }

    pub fn notation_history(&self) -> Vec<String> {
        self.rules.notation_history()
    }

    /// Revert up to `plies` moves; returns how many were reverted.
    pub fn undo(&mut self, plies: usize) -> usize {
        let mut reverted = 0;
        while reverted < plies && self.rules.undo_last_move() {
            reverted += 1;
        }
        reverted
    }

    pub fn reset(&mut self) {
        self.rules.reset_to_initial();
    }

    /// Reset to the initial position and feed `requests` straight to the
    /// rule engine's `apply_move`, in order. These were accepted once already,
    /// so nothing else is consulted. If any of them fails the previous state
    /// is restored.
    pub fn replay(&mut self, requests: &[MoveRequest]) -> Result<(), Rejected> {
        let snapshot = self.rules.clone();
        self.rules.reset_to_initial();
        for request in requests {
            if let Err(err) = self.rules.apply_move(request) {
                self.rules = snapshot;
                return Err(rejection(request, err));
            }
        }
        debug!(plies = requests.len(), "replayed");
        Ok(())
    }
}

fn rejection(request: &MoveRequest, err: RuleError) -> Rejected {
    match err {
        RuleError::Illegal(reason) => {
            debug!(%request, %reason, "move rejected");
            Rejected::Illegal(*request)
        }
        RuleError::Internal(message) => {
            warn!(%request, %message, "rule engine failed");
            Rejected::Internal {
                request: *request,
                message,
            }
        }
    }
}

impl<R: RuleEngine> SelectionBoard for MatchState<R> {
    fn is_own_piece(&self, square: Square) -> bool {
        self.piece_at(square)
            .is_some_and(|piece| piece.color == self.turn())
    }

    fn is_legal_destination(&self, from: Square, to: Square) -> bool {
        self.moves_from(from).iter().any(|target| target.to == to)
    }
}

#[cfg(test)]
#[path = "match_state_tests.rs"]
mod match_state_tests;
