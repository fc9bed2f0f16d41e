//! Zobrist keys for position hashing.
//!
//! [`Position::position_hash`](crate::Position::position_hash) XORs one key per
//! occupied square, one for black to move, one per castling right and one for
//! a capturable en passant file. `Game` keeps the hashes of every position
//! reached so threefold repetition is a simple count.

use crate::types::Piece;

pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// [wk, wq, bk, bq]
    pub castling: [u64; 4],
    /// One per file
    pub en_passant: [u64; 8],
}

/// xorshift64 step; a fixed seed keeps hashes stable across runs.
const fn next(state: u64) -> u64 {
    let mut s = state;
    s ^= s << 13;
    s ^= s >> 7;
    s ^= s << 17;
    s
}

impl ZobristKeys {
    pub const fn new() -> Self {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut i = 0;
        while i < 2 * 6 * 64 {
            state = next(state);
            pieces[i / 384][(i / 64) % 6][i % 64] = state;
            i += 1;
        }

        state = next(state);
        let side_to_move = state;

        let mut castling = [0u64; 4];
        let mut c = 0;
        while c < 4 {
            state = next(state);
            castling[c] = state;
            c += 1;
        }

        let mut en_passant = [0u64; 8];
        let mut f = 0;
        while f < 8 {
            state = next(state);
            en_passant[f] = state;
            f += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }

    /// Key for castling right index (0=wk, 1=wq, 2=bk, 3=bq).
    #[inline(always)]
    pub fn castling_key(&self, index: usize) -> u64 {
        self.castling[index]
    }

    #[inline(always)]
    pub fn ep_key(&self, file: u8) -> u64 {
        self.en_passant[file as usize]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global static Zobrist keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
