use crate::{board::Position, types::*};

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Generate all legal moves, returning a freshly allocated vector.
/// Internally delegates to `legal_moves_into`, cloning the position only once.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(pos, out);

    let mover = pos.side_to_move;
    // Filter illegal moves in-place by playing them on the mutable position.
    out.retain(|&mv| {
        let undo = pos.make_move(mv);
        let illegal = pos.in_check(mover);
        pos.unmake_move(mv, undo);
        !illegal
    });
}

/// Legal moves of the piece on `from`, in generation order. Empty when the
/// square is vacant or holds a piece of the side not to move.
pub fn legal_moves_from(pos: &Position, from: u8) -> Vec<Move> {
    let mut moves = legal_moves(pos);
    moves.retain(|mv| mv.from == from);
    moves
}

fn pseudo_moves(pos: &Position, out: &mut Vec<Move>) {
    for from in 0..64u8 {
        let Some(pc) = pos.piece_at(from) else {
            continue;
        };
        if pc.color != pos.side_to_move {
            continue;
        }
        match pc.kind {
            PieceKind::Pawn => gen_pawn(pos, from, pc.color, out),
            PieceKind::Knight => gen_steps(pos, from, pc.color, out, &KNIGHT_DELTAS),
            PieceKind::Bishop => gen_slider(pos, from, pc.color, out, &DIAGONALS),
            PieceKind::Rook => gen_slider(pos, from, pc.color, out, &ORTHOGONALS),
            PieceKind::Queen => {
                gen_slider(pos, from, pc.color, out, &DIAGONALS);
                gen_slider(pos, from, pc.color, out, &ORTHOGONALS);
            }
            PieceKind::King => {
                gen_steps(pos, from, pc.color, out, &KING_DELTAS);
                gen_castle(pos, from, pc.color, out);
            }
        }
    }
}

/// Push a pawn move, expanding it into the four promotions on the last rank.
fn push_pawn_move(from: u8, to: u8, c: Color, out: &mut Vec<Move>) {
    if rank_of(to) == c.promotion_rank() {
        for pk in PROMOTION_KINDS {
            let mut mv = Move::new(from, to);
            mv.promo = Some(pk);
            out.push(mv);
        }
    } else {
        out.push(Move::new(from, to));
    }
}

fn gen_pawn(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    let (dir, start_rank): (i8, i8) = match c {
        Color::White => (1, 1),
        Color::Black => (-1, 6),
    };

    if let Some(to) = sq(f, r + dir)
        && pos.piece_at(to).is_none()
    {
        push_pawn_move(from, to, c, out);
        if r == start_rank
            && let Some(to2) = sq(f, r + 2 * dir)
            && pos.piece_at(to2).is_none()
        {
            out.push(Move::new(from, to2));
        }
    }

    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(target) if target.color != c => push_pawn_move(from, to, c, out),
            None if pos.en_passant == Some(to) => {
                let mut mv = Move::new(from, to);
                mv.is_en_passant = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

/// Single-step movers: knight and king.
fn gen_steps(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>, deltas: &[(i8, i8)]) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in deltas {
        if let Some(to) = sq(f + df, r + dr) {
            match pos.piece_at(to) {
                Some(pc) if pc.color == c => {}
                _ => out.push(Move::new(from, to)),
            }
        }
    }
}

fn gen_slider(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>, dirs: &[(i8, i8)]) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for (df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            match pos.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) if pc.color != c => {
                    out.push(Move::new(from, to));
                    break;
                }
                _ => break,
            }
            f += df;
            r += dr;
        }
    }
}

fn gen_castle(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    // (king home, king side right, queen side right)
    let (home, king_side, queen_side) = match c {
        Color::White => (4u8, pos.castling.wk, pos.castling.wq),
        Color::Black => (60u8, pos.castling.bk, pos.castling.bq),
    };
    if from != home || pos.in_check(c) {
        return;
    }

    let enemy = c.other();
    let empty = |squares: &[u8]| squares.iter().all(|&s| pos.piece_at(s).is_none());
    let safe = |squares: &[u8]| squares.iter().all(|&s| !pos.is_square_attacked(s, enemy));
    // A right from the FEN is void unless the rook still stands in its corner.
    let rook = |s: u8| pos.piece_at(s) == Some(Piece::new(c, PieceKind::Rook));

    // King side: f and g files empty and unattacked.
    if king_side
        && rook(home + 3)
        && empty(&[home + 1, home + 2])
        && safe(&[home + 1, home + 2])
    {
        let mut mv = Move::new(home, home + 2);
        mv.is_castle = true;
        out.push(mv);
    }
    // Queen side: b, c, d files empty; only c and d must be unattacked.
    if queen_side
        && rook(home - 4)
        && empty(&[home - 1, home - 2, home - 3])
        && safe(&[home - 1, home - 2])
    {
        let mut mv = Move::new(home, home - 2);
        mv.is_castle = true;
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
