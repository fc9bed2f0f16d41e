//! UCI move text (`e2e4`, `e7e8q`) and `position` command handling.

use crate::{board::Position, error::FenError, movegen::legal_moves, types::*};

pub fn move_to_uci(mv: Move) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if let Some(p) = mv.promo {
        s.push(p.letter());
    }
    s
}

/// Split coordinate move text into its squares and optional promotion piece
/// without consulting a position. Accepts exactly four or five characters.
pub fn parse_coordinate_move(txt: &str) -> Option<(Square, Square, Option<PieceKind>)> {
    if !txt.is_ascii() || !(4..=5).contains(&txt.len()) {
        return None;
    }
    let from = txt[0..2].parse().ok()?;
    let to = txt[2..4].parse().ok()?;
    let promo = match txt[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_letter(c)? {
            PieceKind::Pawn | PieceKind::King => return None,
            kind => Some(kind),
        },
    };
    Some((from, to, promo))
}

/// Resolve coordinate move text against the legal moves of `pos`, so that
/// castling and en passant flags come out right.
pub fn parse_uci_move(pos: &Position, txt: &str) -> Option<Move> {
    let (from, to, promo) = parse_coordinate_move(txt)?;
    legal_moves(pos).into_iter().find(|m| {
        m.from == from.index()
            && m.to == to.index()
            && (m.promo.is_none() || m.promo == Some(promo.unwrap_or(PieceKind::Queen)))
    })
}

/// Apply the arguments of a UCI `position` command:
/// `startpos [moves ...]` or `fen <fields> [moves ...]`.
/// Unparseable moves stop the replay; a bad FEN leaves `pos` untouched.
pub fn set_position_from_uci(pos: &mut Position, args: &[&str]) -> Result<(), FenError> {
    let moves_at = args.iter().position(|&a| a == "moves");
    let setup = &args[..moves_at.unwrap_or(args.len())];

    let mut next = match setup.first() {
        Some(&"fen") => Position::from_fen(&setup[1..].join(" "))?,
        _ => Position::startpos(),
    };

    if let Some(idx) = moves_at {
        for txt in &args[idx + 1..] {
            match parse_uci_move(&next, txt) {
                Some(mv) => {
                    next.make_move(mv);
                }
                None => break,
            }
        }
    }

    *pos = next;
    Ok(())
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
