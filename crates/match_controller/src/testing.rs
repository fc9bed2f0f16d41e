//! Deterministic stand-ins for the controller's collaborators, for tests and
//! for hosts that want to replay a match headless.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chess_core::{Color, PieceKind, Square};

use crate::channel::{ChannelError, EngineChannel};
use crate::promotion::PromotionChoiceProvider;
use crate::renderer::{BoardRenderer, HighlightVariant};
use crate::rules::PositionToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    SetPosition(PositionToken),
    Highlight(Square, HighlightVariant),
    MarkDestination(Square),
    ClearHighlights,
    SetOrientation(Color),
}

/// Remembers every renderer call and the resulting board state.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
    pub position: Option<PositionToken>,
    pub highlighted: Vec<(Square, HighlightVariant)>,
    pub destinations: Vec<Square>,
    pub orientation: Option<Color>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_highlighted(&self, square: Square) -> bool {
        self.highlighted.iter().any(|(s, _)| *s == square)
    }

    pub fn is_destination(&self, square: Square) -> bool {
        self.destinations.contains(&square)
    }
}

impl BoardRenderer for RecordingRenderer {
    fn set_position(&mut self, position: &PositionToken) {
        self.calls.push(RenderCall::SetPosition(position.clone()));
        self.position = Some(position.clone());
    }

    fn highlight_square(&mut self, square: Square, variant: HighlightVariant) {
        self.calls.push(RenderCall::Highlight(square, variant));
        self.highlighted.push((square, variant));
    }

    fn mark_possible_destination(&mut self, square: Square) {
        self.calls.push(RenderCall::MarkDestination(square));
        self.destinations.push(square);
    }

    fn clear_highlights(&mut self) {
        self.calls.push(RenderCall::ClearHighlights);
        self.highlighted.clear();
        self.destinations.clear();
    }

    fn set_orientation(&mut self, color: Color) {
        self.calls.push(RenderCall::SetOrientation(color));
        self.orientation = Some(color);
    }
}

/// Answers promotion prompts from a script; once it runs out, dismisses
/// them. Clones share the script and the prompt log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPromotion {
    answers: Rc<RefCell<VecDeque<Option<PieceKind>>>>,
    prompts: Rc<RefCell<Vec<Color>>>,
}

impl ScriptedPromotion {
    pub fn new(answers: impl IntoIterator<Item = Option<PieceKind>>) -> Self {
        Self {
            answers: Rc::new(RefCell::new(answers.into_iter().collect())),
            prompts: Rc::default(),
        }
    }

    /// Colours of the pawns the provider was asked about, in order.
    pub fn prompts(&self) -> Vec<Color> {
        self.prompts.borrow().clone()
    }
}

impl PromotionChoiceProvider for ScriptedPromotion {
    fn choose(&mut self, color: Color) -> Option<PieceKind> {
        self.prompts.borrow_mut().push(color);
        self.answers.borrow_mut().pop_front().flatten()
    }
}

/// Engine channel that records sent commands. Clones share the log, so a
/// test can keep one while the orchestrator owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    sent: Rc<RefCell<Vec<String>>>,
    closed: Rc<RefCell<bool>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    /// Forget what has been sent so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }

    /// Make every later send fail.
    pub fn close(&self) {
        *self.closed.borrow_mut() = true;
    }
}

impl EngineChannel for RecordingChannel {
    fn send(&mut self, command: &str) -> Result<(), ChannelError> {
        if *self.closed.borrow() {
            return Err(ChannelError::Closed);
        }
        self.sent.borrow_mut().push(command.to_string());
        Ok(())
    }
}
