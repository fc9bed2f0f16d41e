//! Interaction and orchestration controller for a two-party chess match.
//!
//! The [`Controller`] turns raw input (square clicks, drag and drop) into
//! validated moves against a [`RuleEngine`], keeps a ply-indexed
//! [`History`] with jump-to-ply, derives the [`MatchStatus`] shown to the
//! players and, in human-vs-engine mode, drives an out-of-process UCI engine
//! through the [`EngineOrchestrator`].
//!
//! Everything that touches the outside world is a trait seam: the board
//! display ([`BoardRenderer`]), the promotion prompt
//! ([`PromotionChoiceProvider`]), the engine pipe ([`EngineChannel`]) and
//! time ([`Clock`]). Hosts own the event loop and feed the controller one
//! event at a time.

pub mod channel;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod match_state;
pub mod orchestrator;
pub mod promotion;
pub mod renderer;
pub mod request;
pub mod rules;
pub mod selection;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use channel::{parse_bestmove, BestMove, ChannelError, EngineChannel};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ControllerConfig, ModeKind};
pub use controller::{ClickOutcome, Controller, DropOutcome, EngineEvent, MatchMode};
pub use error::ControllerError;
pub use history::{History, HistoryEntry, HistoryError, MatchRecord};
pub use match_state::{MatchState, MatchStatus, Rejected, TerminalReason};
pub use orchestrator::{
    EngineOrchestrator, EngineSettings, OrchestratorState, PendingTimer, RequestId,
};
pub use promotion::{
    needs_promotion, normalize_choice, parse_promotion_choice, AlwaysQueen,
    PromotionChoiceProvider,
};
pub use renderer::{BoardRenderer, HighlightVariant, NullRenderer};
pub use request::{build_move_request, Gesture, MoveRequest};
pub use rules::{AppliedMove, LegalTarget, PositionToken, RuleEngine, RuleError};
pub use selection::{ClickAction, SelectionBoard, SelectionState};
