use super::*;

#[test]
fn test_defaults() {
    let config = ControllerConfig::default();
    assert_eq!(config.mode, ModeKind::HumanVsEngine);
    assert_eq!(config.human_color, Color::White);
    assert_eq!(config.search_depth, 12);
    assert_eq!(config.min_thinking_ms, 680);
    assert_eq!(config.engine_settings(), EngineSettings::default());
    assert_eq!(
        config.match_mode(),
        MatchMode::HumanVsEngine {
            human: Color::White
        }
    );
}

#[test]
fn test_empty_file_uses_defaults() {
    let config = ControllerConfig::from_toml_str("").unwrap();
    assert_eq!(config, ControllerConfig::default());
}

#[test]
fn test_partial_file_overrides() {
    let config = ControllerConfig::from_toml_str(
        r#"
        mode = "human-vs-human"
        min_thinking_ms = 0
        start_fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"
        "#,
    )
    .unwrap();
    assert_eq!(config.match_mode(), MatchMode::HumanVsHuman);
    assert_eq!(config.engine_settings().min_thinking, Duration::ZERO);
    assert_eq!(config.search_depth, 12);

    let game = config.initial_game().unwrap();
    assert_eq!(game.fen(), "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
}

#[test]
fn test_human_color_black() {
    let config = ControllerConfig::from_toml_str(
        r#"
        human_color = "black"
        search_depth = 4
        engine_path = "/opt/engines/stockfish"
        "#,
    )
    .unwrap();
    assert_eq!(
        config.match_mode(),
        MatchMode::HumanVsEngine {
            human: Color::Black
        }
    );
    assert_eq!(config.engine_settings().search_depth, 4);
    assert_eq!(
        config.engine_path.as_deref(),
        Some(Path::new("/opt/engines/stockfish"))
    );
}

#[test]
fn test_zero_depth_is_raised_to_one() {
    let config = ControllerConfig::from_toml_str("search_depth = 0").unwrap();
    assert_eq!(config.engine_settings().search_depth, 1);
}

#[test]
fn test_invalid_values_are_errors() {
    assert!(matches!(
        ControllerConfig::from_toml_str(r#"mode = "engine-vs-engine""#),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        ControllerConfig::from_toml_str("search_depth = -3"),
        Err(ConfigError::Parse(_))
    ));

    let config = ControllerConfig::from_toml_str(r#"start_fen = "not a fen""#).unwrap();
    assert!(matches!(config.initial_game(), Err(ConfigError::StartFen(_))));
}

#[test]
fn test_missing_file() {
    let err = ControllerConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_serializes_back_to_toml() {
    let config = ControllerConfig {
        start_fen: Some("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".to_string()),
        ..Default::default()
    };
    let text = toml::to_string(&config).unwrap();
    assert_eq!(ControllerConfig::from_toml_str(&text).unwrap(), config);
}
