//! Move requests: one normalized shape for every way a player can ask for a
//! move.

use std::fmt;

use chess_core::{parse_coordinate_move, PieceKind, Square};
use serde::{Deserialize, Serialize};

use crate::promotion::{resolve_promotion, PromotionChoiceProvider};
use crate::rules::RuleEngine;

/// A requested move. Built per attempt and dropped once the attempt is
/// resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// Parse coordinate text such as `e2e4` or `e7e8q`.
    pub fn parse_uci(text: &str) -> Option<Self> {
        let (from, to, promotion) = parse_coordinate_move(text)?;
        Some(Self {
            from,
            to,
            promotion,
        })
    }

    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

/// The two input shapes that produce a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Second click of a click-to-select pair.
    ClickPair { from: Square, to: Square },
    /// Piece dragged from `source` and dropped on `target`.
    DragDrop { source: Square, target: Square },
}

impl Gesture {
    pub fn endpoints(self) -> (Square, Square) {
        match self {
            Gesture::ClickPair { from, to } => (from, to),
            Gesture::DragDrop { source, target } => (source, target),
        }
    }
}

/// Normalize a gesture into a [`MoveRequest`], asking `provider` for the
/// promotion piece when the move promotes.
pub fn build_move_request<R: RuleEngine>(
    rules: &R,
    gesture: Gesture,
    provider: &mut dyn PromotionChoiceProvider,
) -> MoveRequest {
    let (from, to) = gesture.endpoints();
    let request = MoveRequest::new(from, to);
    match resolve_promotion(rules, from, to, provider) {
        Some(kind) => request.with_promotion(kind),
        None => request,
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod request_tests;
