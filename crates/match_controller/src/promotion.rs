//! Promotion detection and piece choice.

use chess_core::{Color, Piece, PieceKind, Square};
use tracing::debug;

use crate::rules::RuleEngine;

/// Synchronous source of the promotion piece. Called while the move request
/// is being built; nothing else happens until it returns.
pub trait PromotionChoiceProvider {
    /// Piece a pawn of `color` should become. `None` (dismissed prompt) means
    /// queen.
    fn choose(&mut self, color: Color) -> Option<PieceKind>;
}

impl<F> PromotionChoiceProvider for F
where
    F: FnMut(Color) -> Option<PieceKind>,
{
    fn choose(&mut self, color: Color) -> Option<PieceKind> {
        self(color)
    }
}

/// Never asks; always queens.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysQueen;

impl PromotionChoiceProvider for AlwaysQueen {
    fn choose(&mut self, _color: Color) -> Option<PieceKind> {
        Some(PieceKind::Queen)
    }
}

/// A pawn landing on the far rank for its colour.
pub fn needs_promotion(piece: Option<Piece>, to: Square) -> bool {
    match piece {
        Some(Piece {
            kind: PieceKind::Pawn,
            color,
        }) => to.rank() == color.promotion_rank(),
        _ => false,
    }
}

/// Restrict a choice to the four promotable kinds, defaulting to queen.
pub fn normalize_choice(choice: Option<PieceKind>) -> PieceKind {
    match choice {
        Some(kind @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => {
            kind
        }
        _ => PieceKind::Queen,
    }
}

/// Interpret typed prompt input. Accepts `q`/`r`/`b`/`n` or the full piece
/// names in any case; anything else is a queen.
pub fn parse_promotion_choice(input: &str) -> PieceKind {
    let choice = match input.trim().to_ascii_lowercase().as_str() {
        "q" | "queen" => Some(PieceKind::Queen),
        "r" | "rook" => Some(PieceKind::Rook),
        "b" | "bishop" => Some(PieceKind::Bishop),
        "n" | "knight" => Some(PieceKind::Knight),
        _ => None,
    };
    normalize_choice(choice)
}

/// Promotion piece for `from -> to`, or `None` when the move does not
/// promote. The provider is only consulted when `to` is a legal destination;
/// an illegal promoting request still carries a queen so the request shape
/// stays consistent.
pub(crate) fn resolve_promotion<R: RuleEngine>(
    rules: &R,
    from: Square,
    to: Square,
    provider: &mut dyn PromotionChoiceProvider,
) -> Option<PieceKind> {
    let piece = rules.piece_at(from)?;
    if !needs_promotion(Some(piece), to) {
        return None;
    }
    let legal = rules.moves_from(from).iter().any(|target| target.to == to);
    if !legal {
        return Some(PieceKind::Queen);
    }
    let kind = normalize_choice(provider.choose(piece.color));
    debug!(%from, %to, piece = ?kind, "promotion chosen");
    Some(kind)
}

#[cfg(test)]
#[path = "promotion_tests.rs"]
mod promotion_tests;
