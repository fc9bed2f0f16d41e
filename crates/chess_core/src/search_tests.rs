use super::*;
use crate::move_to_uci;

#[test]
fn test_finds_mate_in_one() {
    // Back-rank mate: Ra1-a8#.
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let (mv, score) = pick_best_move(&pos, 2).unwrap();
    assert_eq!(move_to_uci(mv), "a1a8");
    assert!(score > 50_000);
}

#[test]
fn test_takes_hanging_queen() {
    let pos = Position::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
    let (mv, _) = pick_best_move(&pos, 1).unwrap();
    assert_eq!(move_to_uci(mv), "d1d5");
}

#[test]
fn test_no_moves_when_mated() {
    let pos =
        Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
    assert!(pick_best_move(&pos, 2).is_none());
    assert!(score_root_moves(&pos, 2).is_empty());
}
