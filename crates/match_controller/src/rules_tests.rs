use super::*;
use chess_core::PieceKind;

fn sq(coord: &str) -> Square {
    coord.parse().unwrap()
}

#[test]
fn test_moves_from_collapses_promotions() {
    let game = Game::from_fen("3r4/4P3/8/8/8/8/k7/7K w - - 0 1").unwrap();
    let targets = RuleEngine::moves_from(&game, sq("e7"));
    assert_eq!(targets.len(), 2, "{targets:?}");
    assert!(targets.iter().all(|t| t.promotion));
    assert!(targets.iter().any(|t| t.to == sq("e8")));
    assert!(targets.iter().any(|t| t.to == sq("d8")));
}

#[test]
fn test_apply_move_reports_san_and_position() {
    let mut game = Game::new();
    let applied = game
        .apply_move(&MoveRequest::new(sq("e2"), sq("e4")))
        .unwrap();
    assert_eq!(applied.notation, "e4");
    assert_eq!(applied.piece.kind, PieceKind::Pawn);
    assert_eq!(applied.captured, None);
    assert_eq!(
        applied.position.as_str(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
    );
    assert_eq!(RuleEngine::turn(&game), Color::Black);
}

#[test]
fn test_apply_move_fills_in_default_promotion() {
    let mut game = Game::from_fen("8/4P3/8/8/8/8/k7/7K w - - 0 1").unwrap();
    let applied = game
        .apply_move(&MoveRequest::new(sq("e7"), sq("e8")))
        .unwrap();
    assert_eq!(applied.request.promotion, Some(PieceKind::Queen));
    assert_eq!(applied.notation, "e8=Q");
}

#[test]
fn test_apply_move_drops_promotion_on_ordinary_move() {
    let mut game = Game::new();
    let request = MoveRequest::new(sq("g1"), sq("f3")).with_promotion(PieceKind::Queen);
    let applied = game.apply_move(&request).unwrap();
    assert_eq!(applied.request.promotion, None);
}

#[test]
fn test_illegal_move_leaves_game_untouched() {
    let mut game = Game::new();
    let before = game.fen();
    let err = game
        .apply_move(&MoveRequest::new(sq("e2"), sq("e5")))
        .unwrap_err();
    assert!(matches!(err, RuleError::Illegal(_)));
    let err = game
        .apply_move(&MoveRequest::new(sq("e4"), sq("e5")))
        .unwrap_err();
    assert!(matches!(err, RuleError::Illegal(_)));
    assert_eq!(game.fen(), before);
}

#[test]
fn test_undo_reset_and_tokens() {
    let mut game = Game::new();
    let initial = game.initial_token();
    game.apply_move(&MoveRequest::new(sq("d2"), sq("d4"))).unwrap();
    game.apply_move(&MoveRequest::new(sq("d7"), sq("d5"))).unwrap();
    assert_eq!(game.notation_history(), vec!["d4", "d5"]);

    assert!(game.undo_last_move());
    assert_eq!(game.notation_history(), vec!["d4"]);

    game.reset_to_initial();
    assert_eq!(game.position_token(), initial);
    assert!(!game.undo_last_move());
}

#[test]
fn test_initial_move_number_follows_fen() {
    let game = Game::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 3 17").unwrap();
    assert_eq!(game.initial_move_number(), (17, Color::Black));
    assert_eq!(Game::new().initial_move_number(), (1, Color::White));
}
