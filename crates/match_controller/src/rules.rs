//! The rule engine seam and its implementation for [`chess_core::Game`].

use std::fmt;

use chess_core::{Color, Game, GameError, Piece, Square};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::MoveRequest;

/// Opaque serialized position. For [`Game`] this is a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionToken(String);

impl PositionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PositionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A legal destination from some origin square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalTarget {
    pub to: Square,
    /// Moving there promotes a pawn.
    pub promotion: bool,
}

/// What the rule engine reports after applying a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    /// The request as played, with the promotion piece filled in when the
    /// move promoted.
    pub request: MoveRequest,
    pub piece: Piece,
    pub captured: Option<Piece>,
    /// Standard algebraic notation.
    pub notation: String,
    /// Position after the move.
    pub position: PositionToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("illegal move: {0}")]
    Illegal(String),
    #[error("rule engine failure: {0}")]
    Internal(String),
}

/// Chess rules as the controller consumes them. The controller never
/// reimplements any of this; it only asks.
///
/// Implementations are `Clone` so a replay can snapshot and restore.
pub trait RuleEngine: Clone {
    fn moves_from(&self, square: Square) -> Vec<LegalTarget>;
    fn piece_at(&self, square: Square) -> Option<Piece>;
    fn apply_move(&mut self, request: &MoveRequest) -> Result<AppliedMove, RuleError>;

    /// Side to move.
    fn turn(&self) -> Color;
    fn is_check(&self) -> bool;
    fn is_checkmate(&self) -> bool;
    fn is_draw(&self) -> bool;
    fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    fn position_token(&self) -> PositionToken;
    /// Position the engine was created with; `reset_to_initial` returns here.
    fn initial_token(&self) -> PositionToken;
    /// Full-move number and side to move of the initial position, used to
    /// number the move list.
    fn initial_move_number(&self) -> (u32, Color) {
        (1, Color::White)
    }

    /// Take back the last move. `false` when there is nothing to undo.
    fn undo_last_move(&mut self) -> bool;
    fn reset_to_initial(&mut self);
    /// Notation of every move played since the initial position.
    fn notation_history(&self) -> Vec<String>;
}

impl RuleEngine for Game {
    fn moves_from(&self, square: Square) -> Vec<LegalTarget> {
        let mut targets: Vec<LegalTarget> = Vec::new();
        for mv in Game::moves_from(self, square) {
            let to = mv.to_square();
            // Four promotion moves share one destination.
            if targets.iter().any(|t| t.to == to) {
                continue;
            }
            targets.push(LegalTarget {
                to,
                promotion: mv.promo.is_some(),
            });
        }
        targets
    }

    fn piece_at(&self, square: Square) -> Option<Piece> {
        Game::piece_at(self, square)
    }

    fn apply_move(&mut self, request: &MoveRequest) -> Result<AppliedMove, RuleError> {
        let played = self
            .play(request.from, request.to, request.promotion)
            .map_err(|err| match err {
                GameError::NoPiece(_) | GameError::IllegalMove(_) => {
                    RuleError::Illegal(err.to_string())
                }
            })?;
        Ok(AppliedMove {
            request: MoveRequest {
                from: request.from,
                to: request.to,
                promotion: played.mv.promo,
            },
            piece: played.piece,
            captured: played.captured,
            notation: played.san,
            position: PositionToken::new(played.fen),
        })
    }

    fn turn(&self) -> Color {
        Game::turn(self)
    }

    fn is_check(&self) -> bool {
        Game::is_check(self)
    }

    fn is_checkmate(&self) -> bool {
        Game::is_checkmate(self)
    }

    fn is_draw(&self) -> bool {
        Game::is_draw(self)
    }

    fn is_game_over(&self) -> bool {
        Game::is_game_over(self)
    }

    fn position_token(&self) -> PositionToken {
        PositionToken::new(self.fen())
    }

    fn initial_token(&self) -> PositionToken {
        PositionToken::new(self.initial_position().to_fen())
    }

    fn initial_move_number(&self) -> (u32, Color) {
        let initial = self.initial_position();
        (initial.fullmove_number.max(1), initial.side_to_move)
    }

    fn undo_last_move(&mut self) -> bool {
        self.undo().is_some()
    }

    fn reset_to_initial(&mut self) {
        self.reset();
    }

    fn notation_history(&self) -> Vec<String> {
        self.san_history()
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
