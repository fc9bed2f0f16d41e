use super::*;
use crate::clock::ManualClock;
use crate::testing::RecordingChannel;

const FEN: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

fn setup() -> (EngineOrchestrator, RecordingChannel, ManualClock) {
    let channel = RecordingChannel::new();
    let clock = ManualClock::new();
    let orchestrator = EngineOrchestrator::new(
        Box::new(channel.clone()),
        Box::new(clock.clone()),
        EngineSettings::default(),
    );
    (orchestrator, channel, clock)
}

fn e7e5() -> MoveRequest {
    MoveRequest::parse_uci("e7e5").unwrap()
}

#[test]
fn test_start_sends_handshake() {
    let (mut orch, channel, _) = setup();
    orch.start().unwrap();
    assert_eq!(channel.sent(), vec!["uci", "ucinewgame", "isready"]);
    assert!(orch.is_idle());
}

#[test]
fn test_request_sends_position_and_depth() {
    let (mut orch, channel, _) = setup();
    let id = orch.request(&PositionToken::new(FEN)).unwrap();
    assert_eq!(
        channel.sent(),
        vec![format!("position fen {FEN}"), "go depth 12".to_string()]
    );
    assert!(matches!(
        orch.state(),
        OrchestratorState::AwaitingResponse { id: pending, .. } if pending == id
    ));
    assert!(orch.is_busy());

    // Only one request at a time.
    assert_eq!(orch.request(&PositionToken::new(FEN)), None);
    assert_eq!(channel.sent().len(), 2);
}

#[test]
fn test_info_lines_are_not_replies() {
    let (mut orch, _, _) = setup();
    orch.request(&PositionToken::new(FEN)).unwrap();
    assert_eq!(orch.receive("info depth 1 score cp 12"), EngineReply::NotAReply);
    assert!(orch.is_busy());
}

#[test]
fn test_slow_reply_is_ready_immediately() {
    let (mut orch, _, clock) = setup();
    orch.request(&PositionToken::new(FEN)).unwrap();
    clock.advance(Duration::from_millis(900));
    assert_eq!(orch.receive("bestmove e7e5"), EngineReply::Ready(e7e5()));
    assert!(orch.is_idle());
}

#[test]
fn test_fast_reply_is_held_until_minimum_thinking_time() {
    let (mut orch, _, clock) = setup();
    let id = orch.request(&PositionToken::new(FEN)).unwrap();
    clock.advance(Duration::from_millis(200));

    let reply = orch.receive("bestmove e7e5");
    assert_eq!(
        reply,
        EngineReply::Deferred(PendingTimer {
            id,
            delay: Duration::from_millis(480)
        })
    );

    // A timer that fires early is re-armed for the remainder.
    clock.advance(Duration::from_millis(400));
    assert_eq!(
        orch.timer_fired(id),
        TimerOutcome::Rearm(PendingTimer {
            id,
            delay: Duration::from_millis(80)
        })
    );

    clock.advance(Duration::from_millis(80));
    assert_eq!(orch.timer_fired(id), TimerOutcome::Ready(e7e5()));
    assert!(orch.is_idle());
    assert_eq!(orch.timer_fired(id), TimerOutcome::Stale);
}

#[test]
fn test_no_move_returns_to_idle() {
    let (mut orch, _, _) = setup();
    orch.request(&PositionToken::new(FEN)).unwrap();
    assert_eq!(orch.receive("bestmove (none)"), EngineReply::NoMove);
    assert!(orch.is_idle());

    orch.request(&PositionToken::new(FEN)).unwrap();
    assert_eq!(orch.receive("bestmove banana"), EngineReply::NoMove);
    assert!(orch.is_idle());
}

#[test]
fn test_unexpected_reply_is_stale() {
    let (mut orch, _, _) = setup();
    assert_eq!(orch.receive("bestmove e7e5"), EngineReply::Stale);
}

#[test]
fn test_cancel_while_awaiting_skips_the_old_reply() {
    let (mut orch, channel, clock) = setup();
    orch.request(&PositionToken::new(FEN)).unwrap();
    channel.take();

    orch.cancel();
    assert_eq!(channel.sent(), vec!["stop"]);
    assert!(orch.is_idle());

    let id = orch.request(&PositionToken::new(FEN)).unwrap();
    clock.advance(Duration::from_secs(1));
    // First reply belongs to the cancelled search.
    assert_eq!(orch.receive("bestmove d7d5"), EngineReply::Stale);
    assert!(matches!(
        orch.state(),
        OrchestratorState::AwaitingResponse { id: pending, .. } if pending == id
    ));
    assert_eq!(orch.receive("bestmove e7e5"), EngineReply::Ready(e7e5()));
}

#[test]
fn test_cancel_while_scheduled_invalidates_timer() {
    let (mut orch, channel, clock) = setup();
    let id = orch.request(&PositionToken::new(FEN)).unwrap();
    assert!(matches!(orch.receive("bestmove e7e5"), EngineReply::Deferred(_)));
    channel.take();

    orch.cancel();
    assert!(channel.sent().is_empty(), "nothing to stop");
    clock.advance(Duration::from_secs(1));
    assert_eq!(orch.timer_fired(id), TimerOutcome::Stale);

    // A new request gets a new id; the old timer stays stale.
    let next = orch.request(&PositionToken::new(FEN)).unwrap();
    assert_ne!(next, id);
    assert!(matches!(orch.receive("bestmove e7e5"), EngineReply::Deferred(_)));
    assert_eq!(orch.timer_fired(id), TimerOutcome::Stale);
}

#[test]
fn test_channel_failure_makes_engine_unavailable() {
    let (mut orch, channel, _) = setup();
    channel.close();
    assert_eq!(orch.start(), Err(ChannelError::Closed));
    assert_eq!(orch.state(), OrchestratorState::Unavailable);
    assert_eq!(orch.request(&PositionToken::new(FEN)), None);
    assert_eq!(orch.receive("bestmove e7e5"), EngineReply::Stale);
}

#[test]
fn test_disconnect_and_shutdown() {
    let (mut orch, channel, _) = setup();
    orch.shutdown();
    assert_eq!(channel.sent(), vec!["quit"]);
    assert!(!orch.is_available());

    let (mut orch, channel, _) = setup();
    orch.disconnect();
    orch.shutdown();
    assert!(channel.sent().is_empty());
}
