//! Standard Algebraic Notation for moves.

use crate::{board::Position, movegen::legal_moves, types::*};

fn piece_letter(kind: PieceKind) -> Option<char> {
    match kind {
        PieceKind::Pawn => None,
        other => Some(other.letter().to_ascii_uppercase()),
    }
}

/// SAN for `mv`, which must be legal in `pos`. Includes capture markers,
/// file/rank disambiguation, promotion and the `+`/`#` suffix.
pub fn move_to_san(pos: &Position, mv: Move) -> String {
    let Some(piece) = pos.piece_at(mv.from) else {
        return crate::move_to_uci(mv);
    };

    let mut san = String::new();
    if mv.is_castle {
        san.push_str(if mv.to > mv.from { "O-O" } else { "O-O-O" });
    } else {
        let is_capture = pos.piece_at(mv.to).is_some() || mv.is_en_passant;
        match piece_letter(piece.kind) {
            Some(letter) => {
                san.push(letter);
                san.push_str(&disambiguation(pos, mv, piece.kind));
            }
            None if is_capture => san.push((b'a' + (mv.from % 8)) as char),
            None => {}
        }
        if is_capture {
            san.push('x');
        }
        san.push_str(&sq_to_coord(mv.to));
        if let Some(promo) = mv.promo {
            san.push('=');
            san.push(promo.letter().to_ascii_uppercase());
        }
    }

    let mut after = pos.clone();
    after.make_move(mv);
    if after.in_check(after.side_to_move) {
        san.push(if legal_moves(&after).is_empty() { '#' } else { '+' });
    }
    san
}

/// Extra file and/or rank needed when another piece of the same kind can
/// reach the same square.
fn disambiguation(pos: &Position, mv: Move, kind: PieceKind) -> String {
    let rivals: Vec<u8> = legal_moves(pos)
        .into_iter()
        .filter(|m| {
            m.to == mv.to
                && m.from != mv.from
                && pos.piece_at(m.from).map(|p| p.kind) == Some(kind)
        })
        .map(|m| m.from)
        .collect();
    if rivals.is_empty() {
        return String::new();
    }

    let coord = sq_to_coord(mv.from);
    let same_file = rivals.iter().any(|&s| file_of(s) == file_of(mv.from));
    let same_rank = rivals.iter().any(|&s| rank_of(s) == rank_of(mv.from));
    match (same_file, same_rank) {
        (false, _) => coord[..1].to_string(),
        (true, false) => coord[1..].to_string(),
        (true, true) => coord,
    }
}

#[cfg(test)]
#[path = "san_tests.rs"]
mod san_tests;
