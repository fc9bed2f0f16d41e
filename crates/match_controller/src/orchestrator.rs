//! Request/response cycle with the opponent engine.
//!
//! One request is outstanding at a time. Replies are only matched to the
//! request that is awaiting; anything else is stale. UCI carries no request
//! ids, so a cancelled search is answered with `stop` and its reply is
//! skipped when it arrives (replies come back in request order).
//!
//! A reply that arrives before the minimum thinking time is held in
//! `Scheduled` until a timer tagged with its [`RequestId`] fires.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::channel::{go_command, parse_bestmove, position_command, BestMove, ChannelError, EngineChannel};
use crate::clock::Clock;
use crate::request::MoveRequest;
use crate::rules::PositionToken;

/// Tags one engine request; timers and replies are validated against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Sent as `go depth N`.
    pub search_depth: u8,
    /// A reply is never applied sooner than this after its request.
    pub min_thinking: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            search_depth: 12,
            min_thinking: Duration::from_millis(680),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    AwaitingResponse {
        id: RequestId,
        requested_at: Instant,
    },
    /// Reply received early; apply it at `due`.
    Scheduled {
        id: RequestId,
        request: MoveRequest,
        due: Instant,
    },
    /// The channel failed. No further requests are made.
    Unavailable,
}

/// Ask the host to call back after `delay` with `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: RequestId,
    pub delay: Duration,
}

/// What one engine output line amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    /// Not a `bestmove` line.
    NotAReply,
    /// Reply to a cancelled request, or nothing was awaited.
    Stale,
    /// The engine had no move (or sent an unreadable one).
    NoMove,
    /// Apply this move now.
    Ready(MoveRequest),
    /// Apply later, when the timer fires.
    Deferred(PendingTimer),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Stale,
    /// Fired early; wait again.
    Rearm(PendingTimer),
    Ready(MoveRequest),
}

pub struct EngineOrchestrator {
    channel: Box<dyn EngineChannel>,
    clock: Box<dyn Clock>,
    settings: EngineSettings,
    state: OrchestratorState,
    next_id: u64,
    /// Replies still to come for cancelled requests.
    skip_replies: usize,
}

impl fmt::Debug for EngineOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOrchestrator")
            .field("settings", &self.settings)
            .field("state", &self.state)
            .field("skip_replies", &self.skip_replies)
            .finish_non_exhaustive()
    }
}

impl EngineOrchestrator {
    pub fn new(
        channel: Box<dyn EngineChannel>,
        clock: Box<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            channel,
            clock,
            settings,
            state: OrchestratorState::Idle,
            next_id: 1,
            skip_replies: 0,
        }
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn is_idle(&self) -> bool {
        self.state == OrchestratorState::Idle
    }

    /// A request is in flight or a reply is waiting to be applied.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            OrchestratorState::AwaitingResponse { .. } | OrchestratorState::Scheduled { .. }
        )
    }

    pub fn is_available(&self) -> bool {
        self.state != OrchestratorState::Unavailable
    }

    /// UCI handshake. Replies (`uciok`, `readyok`) are not waited for.
    pub fn start(&mut self) -> Result<(), ChannelError> {
        info!(depth = self.settings.search_depth, "starting engine session");
        self.send_all(&["uci", "ucinewgame", "isready"])
    }

    pub fn new_game(&mut self) {
        if self.is_available() {
            // Failure already moved us to Unavailable.
            let _ = self.send_all(&["ucinewgame", "isready"]);
        }
    }

    /// Ask for a move in `position`. Returns the new request's id, or `None`
    /// when a request is already pending or the channel is gone.
    pub fn request(&mut self, position: &PositionToken) -> Option<RequestId> {
        if !self.is_idle() {
            debug!(state = ?self.state, "engine busy, request skipped");
            return None;
        }
        let id = RequestId(self.next_id);
        self.next_id += 1;
        let requested_at = self.clock.now();
        let commands = [
            position_command(position),
            go_command(self.settings.search_depth),
        ];
        for command in &commands {
            if self.send(command).is_err() {
                return None;
            }
        }
        debug!(%id, %position, "engine request sent");
        self.state = OrchestratorState::AwaitingResponse { id, requested_at };
        Some(id)
    }

    /// Feed one line of engine output.
    pub fn receive(&mut self, line: &str) -> EngineReply {
        let Some(reply) = parse_bestmove(line) else {
            return EngineReply::NotAReply;
        };
        if self.skip_replies > 0 {
            self.skip_replies -= 1;
            debug!(line, "skipping reply to cancelled request");
            return EngineReply::Stale;
        }
        let OrchestratorState::AwaitingResponse { id, requested_at } = self.state else {
            warn!(line, state = ?self.state, "unexpected engine reply discarded");
            return EngineReply::Stale;
        };

        let request = match reply {
            BestMove::Move(request) => request,
            BestMove::None => {
                info!(%id, "engine has no move");
                self.state = OrchestratorState::Idle;
                return EngineReply::NoMove;
            }
            BestMove::Invalid(text) => {
                warn!(%id, %text, "engine sent an unreadable move");
                self.state = OrchestratorState::Idle;
                return EngineReply::NoMove;
            }
        };

        let now = self.clock.now();
        let due = requested_at + self.settings.min_thinking;
        if now >= due {
            self.state = OrchestratorState::Idle;
            EngineReply::Ready(request)
        } else {
            self.state = OrchestratorState::Scheduled { id, request, due };
            let delay = due - now;
            debug!(%id, %request, ?delay, "engine reply held for minimum thinking time");
            EngineReply::Deferred(PendingTimer { id, delay })
        }
    }

    /// A timer armed for `id` has fired.
    pub fn timer_fired(&mut self, id: RequestId) -> TimerOutcome {
        let OrchestratorState::Scheduled {
            id: scheduled,
            request,
            due,
        } = self.state
        else {
            debug!(%id, "timer for a request that is no longer scheduled");
            return TimerOutcome::Stale;
        };
        if scheduled != id {
            debug!(%id, %scheduled, "timer for an older request");
            return TimerOutcome::Stale;
        }
        let now = self.clock.now();
        if now < due {
            return TimerOutcome::Rearm(PendingTimer {
                id,
                delay: due - now,
            });
        }
        self.state = OrchestratorState::Idle;
        TimerOutcome::Ready(request)
    }

    /// Abandon pending work. A search in flight is stopped and its reply
    /// will be skipped; a held reply is dropped.
    pub fn cancel(&mut self) {
        match self.state {
            OrchestratorState::AwaitingResponse { id, .. } => {
                debug!(%id, "cancelling engine search");
                self.skip_replies += 1;
                self.state = OrchestratorState::Idle;
                // Failure already moved us to Unavailable.
                let _ = self.send("stop");
            }
            OrchestratorState::Scheduled { id, .. } => {
                debug!(%id, "dropping held engine reply");
                self.state = OrchestratorState::Idle;
            }
            OrchestratorState::Idle | OrchestratorState::Unavailable => {}
        }
    }

    /// The host lost the engine process.
    pub fn disconnect(&mut self) {
        if self.state != OrchestratorState::Unavailable {
            warn!("engine disconnected; continuing without opponent moves");
        }
        self.state = OrchestratorState::Unavailable;
        self.skip_replies = 0;
    }

    pub fn shutdown(&mut self) {
        if self.is_available() {
            let _ = self.channel.send("quit");
        }
        self.state = OrchestratorState::Unavailable;
    }

    fn send_all(&mut self, commands: &[&str]) -> Result<(), ChannelError> {
        commands.iter().try_for_each(|command| self.send(command))
    }

    fn send(&mut self, command: &str) -> Result<(), ChannelError> {
        self.channel.send(command).map_err(|err| {
            warn!(command, %err, "engine channel failed");
            self.state = OrchestratorState::Unavailable;
            err
        })
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
