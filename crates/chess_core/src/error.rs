//! Error types for position parsing and game play.

use thiserror::Error;

/// Reasons a FEN string can fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected at least 4 fields, found {0}")]
    FieldCount(usize),
    #[error("expected 8 ranks in board section, found {0}")]
    RankCount(usize),
    #[error("rank {rank} does not describe exactly 8 files")]
    RankWidth { rank: usize },
    #[error("invalid piece character '{0}'")]
    Piece(char),
    #[error("invalid side to move '{0}'")]
    SideToMove(String),
    #[error("invalid castling character '{0}'")]
    Castling(char),
    #[error("invalid en passant square '{0}'")]
    EnPassant(String),
    #[error("invalid move counter '{0}'")]
    Counter(String),
    #[error("position has no {0} king")]
    MissingKing(&'static str),
}

/// Errors raised by [`crate::Game`] when a move cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no piece on {0}")]
    NoPiece(String),
    #[error("illegal move {0}")]
    IllegalMove(String),
}
