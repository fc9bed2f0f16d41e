use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn session() -> Session<StdRng> {
    Session::new(StdRng::seed_from_u64(7))
}

fn reply(session: &mut Session<StdRng>, line: &str) -> Vec<String> {
    match session.handle(line) {
        Control::Reply(lines) => lines,
        Control::Quit => panic!("unexpected quit on {line:?}"),
    }
}

#[test]
fn test_handshake() {
    let mut s = session();
    let lines = reply(&mut s, "uci");
    assert_eq!(lines.last().map(String::as_str), Some("uciok"));
    assert!(lines.iter().any(|l| l.starts_with("option name Depth")));
    assert_eq!(reply(&mut s, "isready"), vec!["readyok"]);
    assert!(reply(&mut s, "ucinewgame").is_empty());
    assert!(reply(&mut s, "").is_empty());
    assert!(matches!(s.handle("quit"), Control::Quit));
}

#[test]
fn test_go_returns_a_legal_move() {
    let mut s = session();
    reply(&mut s, "position startpos moves e2e4");
    let lines = reply(&mut s, "go depth 2");
    assert_eq!(lines.len(), 1);
    let mv = lines[0].strip_prefix("bestmove ").unwrap();
    assert!(chess_core::parse_uci_move(&s.position, mv).is_some(), "{mv}");
}

#[test]
fn test_go_finds_mate_in_one_from_fen() {
    let mut s = session();
    reply(&mut s, "position fen 6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    assert_eq!(reply(&mut s, "go depth 12"), vec!["bestmove a1a8"]);
}

#[test]
fn test_go_without_moves() {
    let mut s = session();
    reply(
        &mut s,
        "position fen r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
    );
    assert_eq!(reply(&mut s, "go"), vec!["bestmove 0000"]);
}

#[test]
fn test_bad_fen_keeps_position() {
    let mut s = session();
    reply(&mut s, "position startpos moves d2d4");
    let before = s.position.clone();
    reply(&mut s, "position fen this is not a fen");
    assert_eq!(s.position, before);
}

#[test]
fn test_depth_option_caps_requested_depth() {
    let mut s = session();
    reply(&mut s, "setoption name Depth value 20");
    assert_eq!(s.depth, MAX_DEPTH);
    reply(&mut s, "setoption name Depth value 2");
    assert_eq!(s.depth, 2);
    reply(&mut s, "setoption name Hash value 64");
    assert_eq!(s.depth, 2);
}

#[test]
fn test_stop_and_unknown_commands_are_silent() {
    let mut s = session();
    assert!(reply(&mut s, "stop").is_empty());
    assert!(reply(&mut s, "debug on").is_empty());
}
