//! Match configuration, loaded from TOML.
//!
//! ```toml
//! mode = "human-vs-engine"
//! human_color = "black"
//! search_depth = 10
//! min_thinking_ms = 500
//! start_fen = "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1"
//! engine_path = "/usr/local/bin/stockfish"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chess_core::{Color, FenError, Game};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::MatchMode;
use crate::orchestrator::EngineSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid start_fen: {0}")]
    StartFen(#[from] FenError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeKind {
    HumanVsHuman,
    HumanVsEngine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub mode: ModeKind,
    /// The human's colour in human-vs-engine mode.
    pub human_color: Color,
    pub search_depth: u8,
    pub min_thinking_ms: u64,
    /// Initial position; the standard start when absent.
    pub start_fen: Option<String>,
    /// UCI engine executable. Hosts fall back to the bundled engine.
    pub engine_path: Option<PathBuf>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            mode: ModeKind::HumanVsEngine,
            human_color: Color::White,
            search_depth: engine.search_depth,
            min_thinking_ms: engine.min_thinking.as_millis() as u64,
            start_fen: None,
            engine_path: None,
        }
    }
}

impl ControllerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn match_mode(&self) -> MatchMode {
        match self.mode {
            ModeKind::HumanVsHuman => MatchMode::HumanVsHuman,
            ModeKind::HumanVsEngine => MatchMode::HumanVsEngine {
                human: self.human_color,
            },
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            search_depth: self.search_depth.max(1),
            min_thinking: Duration::from_millis(self.min_thinking_ms),
        }
    }

    /// Rule engine at the configured start position.
    pub fn initial_game(&self) -> Result<Game, ConfigError> {
        match &self.start_fen {
            Some(fen) => Ok(Game::from_fen(fen)?),
            None => Ok(Game::new()),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
