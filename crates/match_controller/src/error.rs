use thiserror::Error;

use crate::channel::ChannelError;
use crate::history::HistoryError;
use crate::match_state::Rejected;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error(transparent)]
    IllegalMove(#[from] Rejected),
    #[error("cannot jump to ply {requested}: history has {len} plies")]
    OutOfRangeHistoryJump { requested: usize, len: usize },
    #[error("engine channel unavailable: {0}")]
    EngineChannelUnavailable(#[from] ChannelError),
    #[error(transparent)]
    History(#[from] HistoryError),
}
