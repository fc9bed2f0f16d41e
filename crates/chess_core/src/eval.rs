use crate::{board::Position, types::*};

fn material(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

/// Material plus a small centralisation bonus for minor pieces and pawns,
/// from the side to move's perspective.
pub fn evaluate(pos: &Position) -> i32 {
    let mut score = 0i32;
    for s in 0..64u8 {
        let Some(pc) = pos.piece_at(s) else { continue };
        let mut v = material(pc.kind);
        if matches!(pc.kind, PieceKind::Pawn | PieceKind::Knight | PieceKind::Bishop) {
            let centre_distance = (2 * file_of(s) - 7).abs().max((2 * rank_of(s) - 7).abs());
            v += (7 - centre_distance as i32) * 2;
        }
        score += if pc.color == Color::White { v } else { -v };
    }
    if pos.side_to_move == Color::White {
        score
    } else {
        -score
    }
}
