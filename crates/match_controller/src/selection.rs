//! Click-to-select state.
//!
//! The machine only decides; the controller performs the highlight and move
//! side effects for whatever [`ClickAction`] comes back.

use chess_core::Square;

/// What the board looks like to the selection logic.
pub trait SelectionBoard {
    /// `square` holds a piece of the side to move.
    fn is_own_piece(&self, square: Square) -> bool;
    /// `to` is a legal destination for the piece on `from`.
    fn is_legal_destination(&self, from: Square, to: Square) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(Square),
}

/// Decision for one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// Highlight the square and its destinations, replacing any previous
    /// selection.
    Select(Square),
    /// Try to move `from -> to`.
    Attempt { from: Square, to: Square },
    /// Drop the current selection and its highlights.
    Deselect,
    /// Nothing selected and nothing to select.
    Ignore,
}

impl SelectionState {
    pub fn selected(self) -> Option<Square> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected(square) => Some(square),
        }
    }

    pub fn is_idle(self) -> bool {
        self == SelectionState::Idle
    }

    pub fn select(&mut self, square: Square) {
        *self = SelectionState::Selected(square);
    }

    pub fn clear(&mut self) {
        *self = SelectionState::Idle;
    }

    pub fn on_click(self, square: Square, board: &impl SelectionBoard) -> ClickAction {
        match self {
            SelectionState::Idle => {
                if board.is_own_piece(square) {
                    ClickAction::Select(square)
                } else {
                    ClickAction::Ignore
                }
            }
            SelectionState::Selected(from) => {
                if board.is_legal_destination(from, square) {
                    ClickAction::Attempt { from, to: square }
                } else {
                    Self::fall_through(square, board)
                }
            }
        }
    }

    /// Follow-up when an attempted move was refused: re-select an own piece,
    /// otherwise deselect.
    pub fn after_rejection(square: Square, board: &impl SelectionBoard) -> ClickAction {
        Self::fall_through(square, board)
    }

    fn fall_through(square: Square, board: &impl SelectionBoard) -> ClickAction {
        if board.is_own_piece(square) {
            ClickAction::Select(square)
        } else {
            ClickAction::Deselect
        }
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod selection_tests;
