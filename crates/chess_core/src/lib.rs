//! Chess rules: positions, legal move generation, FEN, SAN and game
//! termination, plus a small fixed-depth search for the bundled UCI engine.

pub mod board;
pub mod error;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod san;
pub mod search;
pub mod types;
pub mod uci;
pub mod zobrist;

pub use board::*;
pub use error::*;
pub use game::*;
pub use movegen::*;
pub use san::move_to_san;
pub use search::{pick_best_move, score_root_moves};
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;
