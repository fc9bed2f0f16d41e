//! A played game: a position plus the moves that led to it.
//!
//! `Game` is what front ends talk to. It validates moves against the legal
//! move list, keeps an undo stack with SAN for each ply, and answers the
//! termination questions (checkmate, stalemate, fifty-move rule, threefold
//! repetition, insufficient material).

use crate::board::{Position, Undo};
use crate::error::{FenError, GameError};
use crate::movegen::{legal_moves, legal_moves_from};
use crate::san::move_to_san;
use crate::types::*;
use crate::uci::move_to_uci;

/// Why a finished game was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

/// A move that was accepted and played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub san: String,
    /// FEN after the move
    pub fen: String,
}

impl PlayedMove {
    pub fn uci(&self) -> String {
        move_to_uci(self.mv)
    }
}

#[derive(Debug, Clone)]
struct Ply {
    mv: Move,
    undo: Undo,
    san: String,
}

#[derive(Debug, Clone)]
pub struct Game {
    initial: Position,
    position: Position,
    plies: Vec<Ply>,
    /// Hash of every position reached, starting with `initial`.
    hashes: Vec<u64>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    pub fn from_position(position: Position) -> Self {
        let hash = position.position_hash();
        Self {
            initial: position.clone(),
            position,
            plies: Vec::new(),
            hashes: vec![hash],
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }
    pub fn initial_position(&self) -> &Position {
        &self.initial
    }
    pub fn turn(&self) -> Color {
        self.position.side_to_move
    }
    pub fn ply_count(&self) -> usize {
        self.plies.len()
    }
    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.position.piece_at(sq.index())
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.position)
    }

    pub fn moves_from(&self, sq: Square) -> Vec<Move> {
        legal_moves_from(&self.position, sq.index())
    }

    /// Play `from -> to`. A missing promotion piece on a promoting move means
    /// queen; a promotion piece on any other move is ignored.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<PlayedMove, GameError> {
        let piece = self
            .piece_at(from)
            .ok_or_else(|| GameError::NoPiece(from.to_string()))?;
        let wanted = promotion.unwrap_or(PieceKind::Queen);
        let mv = self
            .moves_from(from)
            .into_iter()
            .find(|m| m.to == to.index() && (m.promo.is_none() || m.promo == Some(wanted)))
            .ok_or_else(|| GameError::IllegalMove(format!("{from}{to}")))?;

        let san = move_to_san(&self.position, mv);
        let undo = self.position.make_move(mv);
        let captured = undo.captured;
        self.hashes.push(self.position.position_hash());
        self.plies.push(Ply {
            mv,
            undo,
            san: san.clone(),
        });

        Ok(PlayedMove {
            mv,
            piece,
            captured,
            san,
            fen: self.position.to_fen(),
        })
    }

    /// Take back the last ply. `None` at the start of the game.
    pub fn undo(&mut self) -> Option<Move> {
        let ply = self.plies.pop()?;
        self.hashes.pop();
        self.position.unmake_move(ply.mv, ply.undo);
        Some(ply.mv)
    }

    pub fn reset(&mut self) {
        self.position = self.initial.clone();
        self.plies.clear();
        self.hashes.truncate(1);
    }

    pub fn san_history(&self) -> Vec<String> {
        self.plies.iter().map(|p| p.san.clone()).collect()
    }

    pub fn uci_history(&self) -> Vec<String> {
        self.plies.iter().map(|p| move_to_uci(p.mv)).collect()
    }

    pub fn is_check(&self) -> bool {
        self.position.in_check(self.turn())
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_threefold_repetition(&self) -> bool {
        let Some(&current) = self.hashes.last() else {
            return false;
        };
        self.hashes.iter().filter(|&&h| h == current).count() >= 3
    }

    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.is_stalemate() {
            Some(DrawReason::Stalemate)
        } else if self.position.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.position.is_fifty_move_draw() {
            Some(DrawReason::FiftyMoveRule)
        } else if self.is_threefold_repetition() {
            Some(DrawReason::ThreefoldRepetition)
        } else {
            None
        }
    }

    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
