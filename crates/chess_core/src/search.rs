//! Fixed-depth negamax with alpha-beta pruning, used by the bundled UCI engine.

use crate::{board::Position, eval::evaluate, movegen::legal_moves_into, types::Move};

const MATE: i32 = 100_000;

/// Score every root move at `depth` plies. Each root move gets a full window
/// so equal scores are exact and callers can choose among ties.
pub fn score_root_moves(pos: &Position, depth: u8) -> Vec<(Move, i32)> {
    let mut tmp = pos.clone();
    let mut moves = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut moves);

    let mut history = Vec::with_capacity(depth as usize + 2);
    history.push(tmp.position_hash());

    moves
        .into_iter()
        .map(|mv| {
            let undo = tmp.make_move(mv);
            history.push(tmp.position_hash());
            let score = -negamax(
                &mut tmp,
                depth.saturating_sub(1),
                -MATE - 1,
                MATE + 1,
                &mut history,
            );
            history.pop();
            tmp.unmake_move(mv, undo);
            (mv, score)
        })
        .collect()
}

/// Best root move and its score, first in generation order on ties.
pub fn pick_best_move(pos: &Position, depth: u8) -> Option<(Move, i32)> {
    score_root_moves(pos, depth)
        .into_iter()
        .fold(None, |best, (mv, score)| match best {
            Some((_, s)) if s >= score => best,
            _ => Some((mv, score)),
        })
}

fn negamax(pos: &mut Position, depth: u8, mut alpha: i32, beta: i32, history: &mut Vec<u64>) -> i32 {
    if pos.is_fifty_move_draw() {
        return 0;
    }
    if let Some(&current) = history.last()
        && history.iter().filter(|&&k| k == current).count() >= 3
    {
        return 0;
    }

    let mut moves = Vec::with_capacity(64);
    legal_moves_into(pos, &mut moves);
    if moves.is_empty() {
        // Prefer faster mates by scoring deeper ones slightly lower.
        return if pos.in_check(pos.side_to_move) {
            -MATE + history.len() as i32
        } else {
            0
        };
    }
    if depth == 0 {
        return evaluate(pos);
    }

    let mut best = -MATE - 1;
    for mv in moves {
        let undo = pos.make_move(mv);
        history.push(pos.position_hash());
        let score = -negamax(pos, depth - 1, -beta, -alpha, history);
        history.pop();
        pos.unmake_move(mv, undo);

        best = best.max(score);
        alpha = alpha.max(best);
        if alpha >= beta {
            break;
        }
    }
    best
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
