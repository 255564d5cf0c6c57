use crate::engine::Command;
use crate::game::{Outcome, Phase, TableView};
use crate::hand::Role;
use crate::tui::logger::LogBuffer;
use std::time::Instant;
use tokio::sync::{mpsc, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    OpenTable,
    ToggleMenu,
    ToggleHelp,
    ToggleLog,
    Deal,
    Hit,
    Stand,
}

/// Results of the rounds played this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome.winner() {
            Some(Role::Player) => self.wins += 1,
            Some(Role::Dealer) => self.losses += 1,
            None => self.pushes += 1,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.wins + self.losses + self.pushes
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub started: Instant,
    /// Latest table snapshot published by the engine task.
    pub view: TableView,
    pub tally: Tally,
    pub source_label: String,
    pub dealer_delay_ms: u64,
    commands: mpsc::UnboundedSender<Command>,
    views: watch::Receiver<TableView>,
    log_buffer: Option<LogBuffer>,
    logs: Vec<String>,
    // a command was sent and its first view has not arrived yet
    in_flight: bool,
    // last round whose result went into the tally
    tallied_round: u64,
    help_open: bool,
    log_open: bool,
    action_error: Option<String>,
}

impl AppState {
    pub const LOG_LINES: usize = 50;

    pub fn new(
        commands: mpsc::UnboundedSender<Command>,
        views: watch::Receiver<TableView>,
        source_label: impl Into<String>,
    ) -> Self {
        let view = views.borrow().clone();
        let tallied_round = view.round;
        Self {
            scene: Scene::Menu,
            started: Instant::now(),
            view,
            tally: Tally::default(),
            source_label: source_label.into(),
            dealer_delay_ms: 0,
            commands,
            views,
            log_buffer: None,
            logs: Vec::new(),
            in_flight: false,
            tallied_round,
            help_open: false,
            log_open: true,
            action_error: None,
        }
    }

    pub fn with_log_buffer(mut self, buffer: LogBuffer) -> Self {
        self.log_buffer = Some(buffer);
        self
    }

    pub fn with_dealer_delay(mut self, ms: u64) -> Self {
        self.dealer_delay_ms = ms;
        self
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn log_open(&self) -> bool {
        self.log_open
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    /// Waiting for the engine: a command is in flight, cards are being dealt,
    /// or the dealer is playing.
    pub fn busy(&self) -> bool {
        self.in_flight || self.view.phase.is_busy()
    }

    pub fn can_deal(&self) -> bool {
        !self.busy() && self.view.phase.can_start()
    }

    pub fn can_play(&self) -> bool {
        !self.busy() && self.view.phase == Phase::Playing
    }

    /// Pull the newest table view and log lines. Returns true if the view changed.
    ///
    /// Views in between may have been skipped, so a result is counted by
    /// round number, never by phase change.
    pub fn sync(&mut self) -> bool {
        self.sync_logs();
        if !self.views.has_changed().unwrap_or(false) {
            return false;
        }
        let next = self.views.borrow_and_update().clone();
        if next.phase == Phase::Finished && next.round != self.tallied_round {
            self.tallied_round = next.round;
            if let Some(outcome) = next.outcome {
                self.tally.record(outcome);
            }
        }
        self.view = next;
        self.in_flight = false;
        true
    }

    fn sync_logs(&mut self) {
        let Some(buffer) = &self.log_buffer else {
            return;
        };
        let drained: Vec<String> = match buffer.lock() {
            Ok(mut b) => b.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        self.logs.extend(drained);
        if self.logs.len() > Self::LOG_LINES {
            let excess = self.logs.len() - Self::LOG_LINES;
            self.logs.drain(..excess);
        }
    }

    fn send(&mut self, cmd: Command) -> bool {
        if self.commands.send(cmd).is_err() {
            self.action_error = Some("game engine stopped".to_string());
            return false;
        }
        self.action_error = None;
        self.in_flight = true;
        true
    }

    /// Apply an input. Returns true when a command was sent to the engine.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::OpenTable => {
                self.scene = Scene::Table;
                false
            }
            InputAction::ToggleMenu => {
                self.help_open = false;
                self.scene = match self.scene {
                    Scene::Menu => Scene::Table,
                    Scene::Table => Scene::Menu,
                };
                false
            }
            InputAction::ToggleHelp => {
                self.help_open = !self.help_open;
                false
            }
            InputAction::ToggleLog => {
                self.log_open = !self.log_open;
                false
            }
            InputAction::Deal => {
                if self.scene != Scene::Table || !self.can_deal() {
                    return false;
                }
                self.send(Command::StartRound)
            }
            InputAction::Hit | InputAction::Stand => {
                if self.scene != Scene::Table || !self.can_play() {
                    return false;
                }
                let cmd = if action == InputAction::Hit { Command::Hit } else { Command::Stand };
                self.send(cmd)
            }
        }
    }
}
