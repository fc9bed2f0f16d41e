//! Stdin reader thread and the promotion prompt that borrows its lines.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc};
use std::thread;

use chess_core::{Color, PieceKind};
use match_controller::{parse_promotion_choice, PromotionChoiceProvider};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::app::AppEvent;

/// Asks the player at the terminal which piece a pawn becomes. The next
/// typed line is the answer; anything unrecognised means queen.
#[derive(Debug)]
pub struct StdinPromotion {
    waiting: Arc<AtomicBool>,
    answers: std_mpsc::Receiver<String>,
}

/// Reader-side half: while a prompt is open, lines go to the prompt instead
/// of the event loop.
#[derive(Debug)]
pub struct PromptRouter {
    waiting: Arc<AtomicBool>,
    answers: std_mpsc::Sender<String>,
}

pub fn promotion_prompt() -> (StdinPromotion, PromptRouter) {
    let waiting = Arc::new(AtomicBool::new(false));
    let (tx, rx) = std_mpsc::channel();
    (
        StdinPromotion {
            waiting: waiting.clone(),
            answers: rx,
        },
        PromptRouter {
            waiting,
            answers: tx,
        },
    )
}

impl StdinPromotion {
    /// Start claiming typed lines. Answers left over from an earlier prompt
    /// are dropped first.
    fn open(&self) {
        while self.answers.try_recv().is_ok() {}
        self.waiting.store(true, Ordering::SeqCst);
    }

    fn wait_for_answer(&self) -> Option<PieceKind> {
        let answer = self.answers.recv();
        self.waiting.store(false, Ordering::SeqCst);
        // A closed stdin dismisses the prompt.
        answer.ok().map(|text| parse_promotion_choice(&text))
    }
}

impl PromotionChoiceProvider for StdinPromotion {
    fn choose(&mut self, color: Color) -> Option<PieceKind> {
        self.open();
        print!("{color} pawn promotes to (q/r/b/n) [q]: ");
        let _ = io::stdout().flush();
        tokio::task::block_in_place(|| self.wait_for_answer())
    }
}

impl PromptRouter {
    /// Hand `line` to the open prompt, or give it back when none is open.
    pub fn route(&self, line: String) -> Option<String> {
        if !self.waiting.load(Ordering::SeqCst) {
            return Some(line);
        }
        if self.answers.send(line).is_err() {
            debug!("promotion prompt gone; answer dropped");
        }
        None
    }
}

pub fn spawn_stdin_reader(
    events: UnboundedSender<AppEvent>,
    router: PromptRouter,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(command) = router.route(line) else {
                continue;
            };
            if events.send(AppEvent::Input(command)).is_err() {
                break;
            }
        }
        debug!("stdin closed");
        let _ = events.send(AppEvent::InputClosed);
    })
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod input_tests;
