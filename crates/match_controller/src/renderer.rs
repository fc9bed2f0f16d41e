//! Board display seam.

use chess_core::{Color, Square};

use crate::rules::PositionToken;

/// Highlight shade; picked from the square colour so the marker stays
/// visible on both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightVariant {
    Light,
    Dark,
}

impl HighlightVariant {
    pub fn for_square(square: Square) -> Self {
        if square.is_light() {
            HighlightVariant::Light
        } else {
            HighlightVariant::Dark
        }
    }
}

/// Whatever draws the board. The controller only pushes positions and
/// highlight commands; it never reads anything back.
pub trait BoardRenderer {
    fn set_position(&mut self, position: &PositionToken);
    fn highlight_square(&mut self, square: Square, variant: HighlightVariant);
    fn mark_possible_destination(&mut self, square: Square);
    fn clear_highlights(&mut self);
    fn set_orientation(&mut self, color: Color);
}

/// Draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl BoardRenderer for NullRenderer {
    fn set_position(&mut self, _position: &PositionToken) {}
    fn highlight_square(&mut self, _square: Square, _variant: HighlightVariant) {}
    fn mark_possible_destination(&mut self, _square: Square) {}
    fn clear_highlights(&mut self) {}
    fn set_orientation(&mut self, _color: Color) {}
}
