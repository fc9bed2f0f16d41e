//! End-to-end match scenarios through the public controller API.

use std::time::Duration;

use chess_core::{Color, Game, PieceKind, Square};
use match_controller::testing::{RecordingChannel, RecordingRenderer, ScriptedPromotion};
use match_controller::{
    ClickOutcome, Controller, DropOutcome, EngineEvent, EngineOrchestrator, EngineSettings,
    ManualClock, RuleEngine, SelectionState, TerminalReason,
};

type TestController = Controller<Game, RecordingRenderer, ScriptedPromotion>;

fn sq(coord: &str) -> Square {
    coord.parse().unwrap()
}

fn human_game() -> TestController {
    let mut c = Controller::human_vs_human(
        Game::new(),
        RecordingRenderer::new(),
        ScriptedPromotion::default(),
    );
    c.start().unwrap();
    c
}

fn engine_game(settings: EngineSettings) -> (TestController, RecordingChannel, ManualClock) {
    let channel = RecordingChannel::new();
    let clock = ManualClock::new();
    let orchestrator =
        EngineOrchestrator::new(Box::new(channel.clone()), Box::new(clock.clone()), settings);
    let mut c = Controller::human_vs_engine(
        Game::new(),
        RecordingRenderer::new(),
        ScriptedPromotion::default(),
        Color::White,
        orchestrator,
    );
    c.start().unwrap();
    channel.take();
    (c, channel, clock)
}

fn drag(c: &mut TestController, uci: &str) -> DropOutcome {
    let (from, to) = (sq(&uci[0..2]), sq(&uci[2..4]));
    c.drag_start(from);
    c.drop(from, to)
}

/// A short game with a capture, castling and a check.
const GAME: [&str; 10] = [
    "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1", "f6e4", "c4f7", "e8f7",
];

// =============================================================================
// History replay
// =============================================================================

#[test]
fn test_jump_to_any_ply_matches_the_position_reached_live() {
    let mut c = human_game();
    let mut live_positions = vec![c.position_token()];
    for uci in GAME {
        assert!(matches!(drag(&mut c, uci), DropOutcome::Accepted(_)), "{uci}");
        live_positions.push(c.position_token());
    }
    assert_eq!(c.history().len(), GAME.len());

    for ply in (0..=GAME.len()).rev() {
        c.jump_to(ply).unwrap();
        assert_eq!(c.position_token(), live_positions[ply], "ply {ply}");
        assert_eq!(c.history().len(), GAME.len(), "jumping keeps the record");
    }
    c.jump_to(GAME.len()).unwrap();
    assert_eq!(
        c.history().movetext(),
        "1. e4 e5 2. Nf3 Nc6 3. Bc4 Nf6 4. O-O Nxe4 5. Bxf7+ Kxf7"
    );
}

#[test]
fn test_branching_after_a_jump_starts_a_new_timeline() {
    let mut c = human_game();
    for uci in &GAME[..5] {
        drag(&mut c, uci);
    }
    c.jump_to(1).unwrap();
    assert!(matches!(drag(&mut c, "c7c5"), DropOutcome::Accepted(_)));
    assert_eq!(c.history().len(), 2);
    assert_eq!(c.rules().notation_history(), vec!["e4", "c5"]);
    assert!(c.jump_to(3).is_err());
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_rejected_attempts_change_nothing() {
    let mut c = human_game();
    drag(&mut c, "e2e4");
    let position = c.position_token();
    let history = c.history().entries().to_vec();

    for uci in ["e4e5", "e7e4", "d8d1", "a7a4", "e8e7", "b8d7"] {
        c.drag_start(sq(&uci[0..2]));
        let selection = c.selection();
        assert_eq!(c.drop(sq(&uci[0..2]), sq(&uci[2..4])), DropOutcome::SnapBack, "{uci}");
        assert_eq!(c.position_token(), position, "{uci}");
        assert_eq!(c.history().entries(), &history[..], "{uci}");
        assert_eq!(c.selection(), selection, "{uci}");
    }
}

// =============================================================================
// Promotion
// =============================================================================

#[test]
fn test_promotions_always_carry_a_promotable_piece() {
    let choices = [
        (Some(PieceKind::Queen), PieceKind::Queen),
        (Some(PieceKind::Rook), PieceKind::Rook),
        (Some(PieceKind::Bishop), PieceKind::Bishop),
        (Some(PieceKind::Knight), PieceKind::Knight),
        (Some(PieceKind::King), PieceKind::Queen),
        (Some(PieceKind::Pawn), PieceKind::Queen),
        (None, PieceKind::Queen),
    ];
    for (answer, expected) in choices {
        let game = Game::from_fen("1r5k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let mut c = Controller::human_vs_human(
            game,
            RecordingRenderer::new(),
            ScriptedPromotion::new([answer]),
        );
        c.start().unwrap();
        let DropOutcome::Accepted(applied) = drag(&mut c, "a7b8") else {
            panic!("capture-promotion refused");
        };
        assert_eq!(applied.request.promotion, Some(expected), "{answer:?}");
        assert_eq!(
            c.rules().piece_at(sq("b8")).map(|p| p.kind),
            Some(expected)
        );
    }
}

#[test]
fn test_ordinary_moves_never_carry_a_promotion() {
    let mut c = human_game();
    for uci in GAME {
        let DropOutcome::Accepted(applied) = drag(&mut c, uci) else {
            panic!("{uci} refused");
        };
        assert_eq!(applied.request.promotion, None, "{uci}");
    }
}

// =============================================================================
// Engine pacing
// =============================================================================

#[test]
fn test_engine_moves_never_land_before_the_minimum_thinking_time() {
    let settings = EngineSettings {
        search_depth: 6,
        min_thinking: Duration::from_millis(500),
    };
    for reply_after in [0u64, 1, 250, 499, 500, 501, 2_000] {
        let (mut c, channel, clock) = engine_game(settings);
        drag(&mut c, "e2e4");
        assert_eq!(channel.sent().last().map(String::as_str), Some("go depth 6"));

        clock.advance(Duration::from_millis(reply_after));
        let mut elapsed = reply_after;
        let mut event = c.on_engine_line("bestmove e7e5");
        while let EngineEvent::Scheduled(timer) = event {
            clock.advance(timer.delay);
            elapsed += timer.delay.as_millis() as u64;
            event = c.on_timer(timer.id);
        }
        assert!(matches!(event, EngineEvent::Applied(_)), "{reply_after}: {event:?}");
        assert!(elapsed >= 500, "applied after {elapsed}ms");
        assert_eq!(c.history().len(), 2);
    }
}

#[test]
fn test_replies_to_requests_made_before_reset_are_discarded() {
    let (mut c, _channel, clock) = engine_game(EngineSettings::default());
    drag(&mut c, "d2d4");
    c.reset();
    drag(&mut c, "e2e4");

    clock.advance(Duration::from_secs(1));
    // Reply to the d4 request, then to the e4 request.
    assert_eq!(c.on_engine_line("bestmove d7d5"), EngineEvent::Stale);
    assert!(matches!(c.on_engine_line("bestmove e7e5"), EngineEvent::Applied(_)));
    assert_eq!(c.rules().notation_history(), vec!["e4", "e5"]);
}

#[test]
fn test_held_reply_is_dropped_by_jump() {
    let (mut c, _channel, clock) = engine_game(EngineSettings::default());
    drag(&mut c, "e2e4");
    let EngineEvent::Scheduled(timer) = c.on_engine_line("bestmove e7e5") else {
        panic!("reply should be held");
    };
    c.jump_to(0).unwrap();
    clock.advance(Duration::from_secs(1));
    assert_eq!(c.on_timer(timer.id), EngineEvent::Stale);
    assert!(c.rules().notation_history().is_empty());
}

// =============================================================================
// Full games
// =============================================================================

#[test]
fn test_fools_mate_by_clicks() {
    let mut c = human_game();
    for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        c.click(sq(&uci[0..2]));
        assert!(
            matches!(c.click(sq(&uci[2..4])), ClickOutcome::Moved(_)),
            "{uci}"
        );
    }
    let status = c.status();
    assert!(status.terminal);
    assert_eq!(status.reason, TerminalReason::Checkmate);
    assert_eq!(status.turn, Color::White);
    assert_eq!(c.status_line(), "CHECKMATE! White lost.");
    assert_eq!(c.history().movetext(), "1. f3 e5 2. g4 Qh4#");
    assert_eq!(c.click(sq("e2")), ClickOutcome::Ignored);
    assert_eq!(c.selection(), SelectionState::Idle);

    let record = c.record();
    assert_eq!(record.uci_moves, vec!["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert_eq!(record.status, "CHECKMATE! White lost.");
}

#[test]
fn test_engine_game_ends_without_a_further_request() {
    // White to mate in one; the engine plays black and must not be asked.
    let channel = RecordingChannel::new();
    let orchestrator = EngineOrchestrator::new(
        Box::new(channel.clone()),
        Box::new(ManualClock::new()),
        EngineSettings::default(),
    );
    let game = Game::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mut c = Controller::human_vs_engine(
        game,
        RecordingRenderer::new(),
        ScriptedPromotion::default(),
        Color::White,
        orchestrator,
    );
    c.start().unwrap();
    channel.take();

    assert!(matches!(drag(&mut c, "a1a8"), DropOutcome::Accepted(_)));
    assert!(c.status().terminal);
    assert!(channel.sent().is_empty());
}
