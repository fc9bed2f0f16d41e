//! The controller: routes input and engine events through selection, move
//! validation, history and the engine orchestrator.
//!
//! Every accepted move, human or engine, goes through the same path:
//! `MatchState::attempt_move`, history append, renderer resync, and then an
//! engine request if the engine is now on move.

use chess_core::{Color, Square};
use tracing::{debug, info, warn};

use crate::error::ControllerError;
use crate::history::{History, HistoryEntry, MatchRecord};
use crate::match_state::{MatchState, MatchStatus, Rejected};
use crate::orchestrator::{
    EngineOrchestrator, EngineReply, OrchestratorState, PendingTimer, RequestId, TimerOutcome,
};
use crate::promotion::PromotionChoiceProvider;
use crate::renderer::{BoardRenderer, HighlightVariant};
use crate::request::{build_move_request, Gesture, MoveRequest};
use crate::rules::{AppliedMove, PositionToken, RuleEngine};
use crate::selection::{ClickAction, SelectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    HumanVsHuman,
    HumanVsEngine { human: Color },
}

impl MatchMode {
    pub fn engine_color(self) -> Option<Color> {
        match self {
            MatchMode::HumanVsHuman => None,
            MatchMode::HumanVsEngine { human } => Some(human.other()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Square),
    Moved(AppliedMove),
    Deselected,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Accepted(AppliedMove),
    /// Move refused; the piece goes back to its square.
    SnapBack,
    /// Dropped where it was picked up.
    Ignored,
}

/// Result of feeding an engine line or timer expiry to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Nothing for the controller in this line.
    Ignored,
    /// Reply or timer for a request that no longer matters.
    Stale,
    /// The engine had no move to offer.
    NoMove,
    /// Reply arrived early; call [`Controller::on_timer`] after the delay.
    Scheduled(PendingTimer),
    Applied(AppliedMove),
    /// The engine's move was illegal and was not played.
    Rejected(Rejected),
}

#[derive(Debug)]
struct EngineSeat {
    orchestrator: EngineOrchestrator,
    color: Color,
}

#[derive(Debug)]
pub struct Controller<R, V, P> {
    state: MatchState<R>,
    selection: SelectionState,
    history: History,
    renderer: V,
    promotion: P,
    mode: MatchMode,
    engine: Option<EngineSeat>,
    orientation: Color,
}

impl<R, V, P> Controller<R, V, P>
where
    R: RuleEngine,
    V: BoardRenderer,
    P: PromotionChoiceProvider,
{
    pub fn human_vs_human(rules: R, renderer: V, promotion: P) -> Self {
        Self::build(rules, renderer, promotion, MatchMode::HumanVsHuman, None)
    }

    pub fn human_vs_engine(
        rules: R,
        renderer: V,
        promotion: P,
        human: Color,
        orchestrator: EngineOrchestrator,
    ) -> Self {
        let seat = EngineSeat {
            orchestrator,
            color: human.other(),
        };
        Self::build(
            rules,
            renderer,
            promotion,
            MatchMode::HumanVsEngine { human },
            Some(seat),
        )
    }

    fn build(
        mut rules: R,
        renderer: V,
        promotion: P,
        mode: MatchMode,
        engine: Option<EngineSeat>,
    ) -> Self {
        rules.reset_to_initial();
        let (first_move_number, first_to_move) = rules.initial_move_number();
        let orientation = match mode {
            MatchMode::HumanVsHuman => Color::White,
            MatchMode::HumanVsEngine { human } => human,
        };
        Self {
            state: MatchState::new(rules),
            selection: SelectionState::Idle,
            history: History::new(first_move_number, first_to_move),
            renderer,
            promotion,
            mode,
            engine,
            orientation,
        }
    }

    /// Draw the initial board and, in engine mode, open the engine session.
    /// A failed handshake is reported but the match stays playable.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        self.renderer.set_orientation(self.orientation);
        self.resync_board();
        info!(mode = ?self.mode, status = %self.status(), "match started");
        if let Some(seat) = self.engine.as_mut() {
            seat.orchestrator.start()?;
        }
        self.request_engine_if_due();
        Ok(())
    }

    /// Close the engine session.
    pub fn shutdown(mut self) {
        if let Some(seat) = self.engine.as_mut() {
            seat.orchestrator.cancel();
            seat.orchestrator.shutdown();
        }
        info!(plies = self.history.cursor(), "match closed");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn status(&self) -> MatchStatus {
        self.state.status()
    }

    /// Status text with an engine note appended when relevant.
    pub fn status_line(&self) -> String {
        let mut line = self.status().to_string();
        if let Some(seat) = &self.engine {
            if !seat.orchestrator.is_available() {
                line.push_str(" (engine unavailable)");
            } else if seat.orchestrator.is_busy() {
                line.push_str(" (engine thinking...)");
            }
        }
        line
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn orientation(&self) -> Color {
        self.orientation
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn rules(&self) -> &R {
        self.state.rules()
    }

    pub fn position_token(&self) -> PositionToken {
        self.state.position_token()
    }

    pub fn renderer(&self) -> &V {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut V {
        &mut self.renderer
    }

    /// `None` in human-vs-human mode.
    pub fn engine_state(&self) -> Option<OrchestratorState> {
        self.engine.as_ref().map(|seat| seat.orchestrator.state())
    }

    pub fn record(&self) -> MatchRecord {
        self.history
            .record(&self.state.initial_token(), &self.state.status())
    }

    // =========================================================================
    // Player input
    // =========================================================================

    pub fn click(&mut self, square: Square) -> ClickOutcome {
        if !self.human_may_move() {
            debug!(%square, "click ignored, not the human's move");
            return ClickOutcome::Ignored;
        }
        match self.selection.on_click(square, &self.state) {
            ClickAction::Attempt { from, to } => {
                let request = build_move_request(
                    self.state.rules(),
                    Gesture::ClickPair { from, to },
                    &mut self.promotion,
                );
                match self.commit(&request) {
                    Ok(applied) => ClickOutcome::Moved(applied),
                    Err(rejected) => {
                        warn!(%rejected, "move refused");
                        let follow_up = SelectionState::after_rejection(square, &self.state);
                        self.perform(follow_up)
                    }
                }
            }
            action => self.perform(action),
        }
    }

    /// Pick up the piece on `source`. Refused when the match is over, the
    /// piece is not the mover's, or it is the engine's move.
    pub fn drag_start(&mut self, source: Square) -> bool {
        if !self.human_may_move() {
            return false;
        }
        let turn = self.state.turn();
        match self.state.piece_at(source) {
            Some(piece) if piece.color == turn => {
                self.select(source);
                true
            }
            _ => false,
        }
    }

    pub fn drop(&mut self, source: Square, target: Square) -> DropOutcome {
        if source == target {
            return DropOutcome::Ignored;
        }
        if !self.human_may_move() {
            return DropOutcome::SnapBack;
        }
        let request = build_move_request(
            self.state.rules(),
            Gesture::DragDrop { source, target },
            &mut self.promotion,
        );
        match self.commit(&request) {
            Ok(applied) => DropOutcome::Accepted(applied),
            Err(rejected) => {
                debug!(%rejected, "drop refused");
                DropOutcome::SnapBack
            }
        }
    }

    /// The drop animation finished; redraw from the rule engine so castling,
    /// en passant and promotion show correctly.
    pub fn snap_end(&mut self) {
        self.resync_board();
    }

    /// Take back moves. In engine mode any pending engine work is dropped
    /// and enough plies are reverted to put the human back on move.
    pub fn undo(&mut self) -> usize {
        let plies = match self.engine.as_mut() {
            Some(seat) if seat.orchestrator.is_available() => {
                seat.orchestrator.cancel();
                if self.state.turn() == seat.color {
                    1
                } else {
                    2
                }
            }
            _ => 1,
        };
        let reverted = self.state.undo(plies);
        self.history.undo(reverted);
        self.resync_board();
        info!(reverted, ply = self.history.cursor(), "undo");
        self.request_engine_if_due();
        reverted
    }

    /// Back to the initial position with an empty history.
    pub fn reset(&mut self) {
        if let Some(seat) = self.engine.as_mut() {
            seat.orchestrator.cancel();
            seat.orchestrator.new_game();
        }
        self.state.reset();
        self.history.clear();
        self.resync_board();
        info!("match reset");
        self.request_engine_if_due();
    }

    /// Show the position after `ply` by replaying the recorded moves. Later
    /// entries are kept until a new move is played from here.
    pub fn jump_to(&mut self, ply: usize) -> Result<(), ControllerError> {
        let len = self.history.len();
        if ply > len {
            return Err(ControllerError::OutOfRangeHistoryJump {
                requested: ply,
                len,
            });
        }
        let requests = self.history.requests_to(ply)?;
        self.state.replay(&requests)?;
        self.history.set_cursor(ply)?;
        if let Some(seat) = self.engine.as_mut() {
            seat.orchestrator.cancel();
        }
        self.resync_board();
        debug!(ply, len, "jumped in history");
        self.request_engine_if_due();
        Ok(())
    }

    pub fn flip(&mut self) {
        self.orientation = self.orientation.other();
        self.clear_selection();
        self.renderer.set_orientation(self.orientation);
    }

    // =========================================================================
    // Engine events
    // =========================================================================

    /// One line of engine output.
    pub fn on_engine_line(&mut self, line: &str) -> EngineEvent {
        let Some(seat) = self.engine.as_mut() else {
            return EngineEvent::Ignored;
        };
        match seat.orchestrator.receive(line) {
            EngineReply::NotAReply => EngineEvent::Ignored,
            EngineReply::Stale => EngineEvent::Stale,
            EngineReply::NoMove => EngineEvent::NoMove,
            EngineReply::Deferred(timer) => EngineEvent::Scheduled(timer),
            EngineReply::Ready(request) => self.apply_engine_move(request),
        }
    }

    /// A timer requested through [`EngineEvent::Scheduled`] fired.
    pub fn on_timer(&mut self, id: RequestId) -> EngineEvent {
        let Some(seat) = self.engine.as_mut() else {
            return EngineEvent::Ignored;
        };
        match seat.orchestrator.timer_fired(id) {
            TimerOutcome::Stale => EngineEvent::Stale,
            TimerOutcome::Rearm(timer) => EngineEvent::Scheduled(timer),
            TimerOutcome::Ready(request) => self.apply_engine_move(request),
        }
    }

    /// The engine process went away.
    pub fn on_engine_disconnected(&mut self) {
        if let Some(seat) = self.engine.as_mut() {
            seat.orchestrator.disconnect();
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn engine_color(&self) -> Option<Color> {
        self.engine.as_ref().map(|seat| seat.color)
    }

    /// The human may act: the match is live and, with a working engine, it
    /// is neither the engine's move nor is the engine busy. Without a working
    /// engine both sides are played by hand.
    fn human_may_move(&self) -> bool {
        let status = self.state.status();
        if status.terminal {
            return false;
        }
        match &self.engine {
            Some(seat) if seat.orchestrator.is_available() => {
                status.turn != seat.color && !seat.orchestrator.is_busy()
            }
            _ => true,
        }
    }

    fn perform(&mut self, action: ClickAction) -> ClickOutcome {
        match action {
            ClickAction::Select(square) => {
                self.select(square);
                ClickOutcome::Selected(square)
            }
            ClickAction::Deselect => {
                self.clear_selection();
                ClickOutcome::Deselected
            }
            ClickAction::Ignore | ClickAction::Attempt { .. } => ClickOutcome::Ignored,
        }
    }

    fn select(&mut self, square: Square) {
        self.selection.select(square);
        self.renderer.clear_highlights();
        self.renderer
            .highlight_square(square, HighlightVariant::for_square(square));
        for target in self.state.moves_from(square) {
            self.renderer.mark_possible_destination(target.to);
        }
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
        self.renderer.clear_highlights();
    }

    fn resync_board(&mut self) {
        self.clear_selection();
        self.renderer.set_position(&self.state.position_token());
    }

    /// Apply and record one move. On failure nothing has changed.
    fn commit(&mut self, request: &MoveRequest) -> Result<AppliedMove, Rejected> {
        let applied = self.state.attempt_move(request)?;
        let entry = HistoryEntry {
            ply: self.history.next_ply(),
            request: applied.request,
            notation: applied.notation.clone(),
            position: applied.position.clone(),
        };
        if let Err(err) = self.history.append(entry) {
            self.state.undo(1);
            return Err(Rejected::Internal {
                request: *request,
                message: err.to_string(),
            });
        }

        self.clear_selection();
        self.renderer.set_position(&applied.position);
        let status = self.state.status();
        info!(
            ply = self.history.cursor(),
            san = %applied.notation,
            uci = %applied.request,
            "move played"
        );
        if status.terminal {
            info!(%status, "match over");
        }
        self.request_engine_if_due();
        Ok(applied)
    }

    fn apply_engine_move(&mut self, request: MoveRequest) -> EngineEvent {
        if self.engine_color() != Some(self.state.turn()) {
            warn!(%request, "engine reply arrived off turn, discarded");
            return EngineEvent::Stale;
        }
        match self.commit(&request) {
            Ok(applied) => EngineEvent::Applied(applied),
            Err(rejected) => {
                warn!(%rejected, "engine suggested an illegal move");
                EngineEvent::Rejected(rejected)
            }
        }
    }

    fn request_engine_if_due(&mut self) {
        let Some(seat) = self.engine.as_mut() else {
            return;
        };
        if !seat.orchestrator.is_idle() {
            return;
        }
        let status = self.state.status();
        if status.terminal || status.turn != seat.color {
            return;
        }
        let position = self.state.position_token();
        if let Some(id) = seat.orchestrator.request(&position) {
            info!(%id, "engine thinking");
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
