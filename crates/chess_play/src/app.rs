//! Event loop glue between the terminal, the engine process and the
//! controller.

use chess_core::Game;
use match_controller::{
    ClickOutcome, Controller, DropOutcome, EngineEvent, MatchMode, PendingTimer, RequestId,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::cli::print_commands;
use crate::command::{parse_command, Command};
use crate::input::StdinPromotion;
use crate::terminal::TerminalRenderer;

pub type TerminalController = Controller<Game, TerminalRenderer, StdinPromotion>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Input(String),
    InputClosed,
    EngineLine(String),
    EngineExited,
    Timer(RequestId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    controller: TerminalController,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(controller: TerminalController, events: UnboundedSender<AppEvent>) -> Self {
        Self { controller, events }
    }

    pub fn start(&mut self) {
        if let Err(err) = self.controller.start() {
            warn!(error = %err, "engine handshake failed");
        }
        if let MatchMode::HumanVsEngine { human } = self.controller.mode() {
            println!("You play {human}. Type `help` for commands.");
        }
        self.redraw();
    }

    pub fn shutdown(self) {
        self.controller.shutdown();
    }

    pub fn update(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Input(line) => {
                if line.trim().is_empty() {
                    return Flow::Continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => return Flow::Quit,
                    Ok(command) => self.handle_command(command),
                    Err(err) => println!("{err}"),
                }
            }
            AppEvent::InputClosed => return Flow::Quit,
            AppEvent::EngineLine(line) => {
                let event = self.controller.on_engine_line(&line);
                self.handle_engine_event(event);
            }
            AppEvent::Timer(id) => {
                let event = self.controller.on_timer(id);
                self.handle_engine_event(event);
            }
            AppEvent::EngineExited => {
                warn!("engine process exited");
                self.controller.on_engine_disconnected();
                println!("The engine has gone away; you now move for both sides.");
                self.print_status();
            }
        }
        Flow::Continue
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Click(square) => match self.controller.click(square) {
                ClickOutcome::Selected(_) | ClickOutcome::Deselected => self.redraw(),
                ClickOutcome::Moved(applied) => {
                    println!("{}", applied.notation);
                    self.redraw();
                }
                ClickOutcome::Ignored => println!("Nothing to do on {square}."),
            },
            Command::Drag { from, to } => {
                if !self.controller.drag_start(from) {
                    println!("You cannot pick up {from}.");
                    return;
                }
                match self.controller.drop(from, to) {
                    DropOutcome::Accepted(applied) => {
                        self.controller.snap_end();
                        println!("{}", applied.notation);
                    }
                    DropOutcome::SnapBack => println!("Illegal move {from}{to}."),
                    DropOutcome::Ignored => {}
                }
                self.redraw();
            }
            Command::Undo => {
                let reverted = self.controller.undo();
                if reverted == 0 {
                    println!("Nothing to undo.");
                }
                self.redraw();
            }
            Command::Reset => {
                self.controller.reset();
                self.redraw();
            }
            Command::Flip => {
                self.controller.flip();
                self.redraw();
            }
            Command::Jump(ply) => match self.controller.jump_to(ply) {
                Ok(()) => self.redraw(),
                Err(err) => println!("{err}"),
            },
            Command::History => self.print_history(),
            Command::Save(path) => match self.controller.record().save(&path) {
                Ok(()) => {
                    info!(path = %path.display(), "game saved");
                    println!("Saved to {}.", path.display());
                }
                Err(err) => println!("{err}"),
            },
            Command::Status => self.print_status(),
            Command::Help => print_commands(),
            Command::Quit => {}
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Ignored | EngineEvent::Stale => {}
            EngineEvent::Scheduled(timer) => self.schedule(timer),
            EngineEvent::Applied(applied) => {
                println!("Engine plays {}", applied.notation);
                self.redraw();
            }
            EngineEvent::NoMove => {
                println!("The engine has no move.");
                self.print_status();
            }
            EngineEvent::Rejected(rejected) => {
                println!("The engine tried {}, which is illegal.", rejected.request());
                self.print_status();
            }
        }
    }

    /// Deliver [`AppEvent::Timer`] once the delay has passed.
    fn schedule(&self, timer: PendingTimer) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timer.delay).await;
            let _ = events.send(AppEvent::Timer(timer.id));
        });
    }

    fn print_history(&self) {
        let history = self.controller.history();
        println!("{}", history.movetext());
        if history.cursor() < history.len() {
            println!("(showing ply {} of {})", history.cursor(), history.len());
        }
    }

    fn print_status(&self) {
        println!("{}", self.controller.status_line());
    }

    fn redraw(&self) {
        print!("{}", self.controller.renderer().draw());
        self.print_status();
    }
}
