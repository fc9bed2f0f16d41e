use super::*;

fn sq(coord: &str) -> Square {
    coord.parse().unwrap()
}

#[test]
fn test_square_is_a_click() {
    assert_eq!(parse_command("e2"), Ok(Command::Click(sq("e2"))));
    assert_eq!(parse_command("  H8 "), Ok(Command::Click(sq("h8"))));
}

#[test]
fn test_two_squares_are_a_drag() {
    let drag = Command::Drag {
        from: sq("e2"),
        to: sq("e4"),
    };
    assert_eq!(parse_command("e2 e4"), Ok(drag.clone()));
    assert_eq!(parse_command("e2e4"), Ok(drag.clone()));
    assert_eq!(parse_command("E2 E4"), Ok(drag));
}

#[test]
fn test_keywords() {
    assert_eq!(parse_command("undo"), Ok(Command::Undo));
    assert_eq!(parse_command("reset"), Ok(Command::Reset));
    assert_eq!(parse_command("flip"), Ok(Command::Flip));
    assert_eq!(parse_command("history"), Ok(Command::History));
    assert_eq!(parse_command("status"), Ok(Command::Status));
    assert_eq!(parse_command("help"), Ok(Command::Help));
    assert_eq!(parse_command("QUIT"), Ok(Command::Quit));
    assert_eq!(parse_command("jump 3"), Ok(Command::Jump(3)));
    assert_eq!(
        parse_command("save game.json"),
        Ok(Command::Save(PathBuf::from("game.json")))
    );
}

#[test]
fn test_rejects_garbage() {
    assert!(parse_command("").is_err());
    assert!(parse_command("   ").is_err());
    assert!(parse_command("z9").is_err());
    assert!(parse_command("e2 e9").is_err());
    assert!(parse_command("jump").is_err());
    assert!(parse_command("jump -1").is_err());
    assert!(parse_command("undo twice").is_err());
    assert!(parse_command("castle").is_err());
}

#[test]
fn test_non_ascii_words_are_errors() {
    assert!(parse_command("aé4").is_err());
    assert!(parse_command("é2").is_err());
    assert!(parse_command("e2 é4").is_err());
    assert!(parse_command("é e4").is_err());
    assert_eq!(
        parse_command("save partie-é.json"),
        Ok(Command::Save(PathBuf::from("partie-é.json")))
    );
}
