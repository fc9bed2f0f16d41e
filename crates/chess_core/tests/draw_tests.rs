//! Tests for game termination
//!
//! This module tests all draw conditions:
//! - Stalemate
//! - Fifty-move rule
//! - Threefold repetition
//! - Insufficient material
//!
//! and checkmate versus plain check.

use chess_core::{Color, DrawReason, Game, Position, Square};

fn sq(coord: &str) -> Square {
    coord.parse().unwrap()
}

fn game(fen: &str) -> Game {
    Game::from_fen(fen).expect("valid FEN")
}

// =============================================================================
// Stalemate Tests
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    // Black king in corner, white queen stalemates
    let g = game("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    assert!(g.is_stalemate());
    assert!(!g.is_check());
    assert_eq!(g.draw_reason(), Some(DrawReason::Stalemate));
    assert!(g.is_game_over());
}

#[test]
fn test_stalemate_king_and_pawn_endgame() {
    let g = game("6k1/6P1/6K1/8/8/8/8/8 b - - 0 1");
    assert_eq!(g.draw_reason(), Some(DrawReason::Stalemate));
}

// =============================================================================
// Fifty-Move Rule Tests
// =============================================================================

#[test]
fn test_fifty_move_rule_at_100_halfmoves() {
    let g = game("8/8/8/4k3/8/4K3/8/R7 w - - 100 60");
    assert_eq!(g.draw_reason(), Some(DrawReason::FiftyMoveRule));
}

#[test]
fn test_fifty_move_rule_at_99_halfmoves() {
    let mut g = game("8/8/8/4k3/8/4K3/8/R7 w - - 99 60");
    assert!(!g.is_draw());

    // One more quiet move reaches the limit.
    g.play(sq("a1"), sq("a2"), None).unwrap();
    assert_eq!(g.draw_reason(), Some(DrawReason::FiftyMoveRule));
}

#[test]
fn test_fifty_move_rule_reset_on_pawn_move() {
    let mut g = game("8/8/8/4k3/8/3K4/4P3/8 w - - 99 60");
    g.play(sq("e2"), sq("e3"), None).unwrap();
    assert_eq!(g.position().halfmove_clock, 0);
    assert!(!g.position().is_fifty_move_draw());
}

// =============================================================================
// Insufficient Material Tests
// =============================================================================

#[test]
fn test_insufficient_material_cases() {
    for fen in [
        "8/8/8/4k3/8/4K3/8/8 w - - 0 1",     // K v K
        "8/8/8/4k3/8/4KB2/8/8 w - - 0 1",    // K+B v K
        "8/8/8/4k3/8/4KN2/8/8 w - - 0 1",    // K+N v K
        "8/8/4n3/4k3/8/4K3/8/8 w - - 0 1",   // K v K+N
        "5b2/8/8/4k3/8/4K3/8/2B5 w - - 0 1", // bishops on same colour
    ] {
        assert_eq!(
            game(fen).draw_reason(),
            Some(DrawReason::InsufficientMaterial),
            "{fen}"
        );
    }
}

#[test]
fn test_sufficient_material_cases() {
    for fen in [
        "2b5/8/8/4k3/8/4K3/8/2B5 w - - 0 1", // opposite coloured bishops
        "8/8/8/4k3/8/4K3/4P3/8 w - - 0 1",   // pawn
        "8/8/8/4k3/8/4K3/8/4R3 w - - 0 1",   // rook
        "8/8/8/4k3/8/4K3/8/4Q3 w - - 0 1",   // queen
        "8/8/8/4k3/8/4K3/3NN3/8 w - - 0 1",  // two knights
    ] {
        assert!(
            !Position::from_fen(fen).unwrap().is_insufficient_material(),
            "{fen}"
        );
    }
}

// =============================================================================
// Threefold Repetition Tests
// =============================================================================

#[test]
fn test_threefold_repetition_with_knight_dance() {
    let mut g = Game::new();
    g.play(sq("e2"), sq("e4"), None).unwrap();
    g.play(sq("e7"), sq("e5"), None).unwrap();

    let dance = [("g1", "f3"), ("b8", "c6"), ("f3", "g1"), ("c6", "b8")];
    for (from, to) in dance {
        g.play(sq(from), sq(to), None).unwrap();
    }
    assert!(!g.is_threefold_repetition(), "second occurrence only");

    for (from, to) in dance {
        g.play(sq(from), sq(to), None).unwrap();
    }
    assert_eq!(g.draw_reason(), Some(DrawReason::ThreefoldRepetition));
}

#[test]
fn test_position_hash_different_side_to_move() {
    let w = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let b = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1").unwrap();
    assert_ne!(w.position_hash(), b.position_hash());
}

#[test]
fn test_position_hash_different_castling_rights() {
    let all = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let some = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kq - 0 1").unwrap();
    assert_ne!(all.position_hash(), some.position_hash());
}

// =============================================================================
// Checkmate Tests
// =============================================================================

#[test]
fn test_checkmate_is_not_stalemate() {
    // Scholar's mate
    let g = game("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
    assert!(g.is_checkmate());
    assert!(!g.is_stalemate());
    assert!(!g.is_draw());
    assert_eq!(g.turn(), Color::Black);
}

#[test]
fn test_check_is_not_checkmate() {
    let g = game("rnbqkbnr/ppppp1pp/8/5p1Q/4P3/8/PPPP1PPP/RNB1KBNR b KQkq - 1 2");
    assert!(g.is_check());
    assert!(!g.is_checkmate());
    assert!(!g.is_game_over());
}
