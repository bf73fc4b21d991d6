//! Application state and key handling.

use super::input::{digit_position, move_cursor};
use crate::agent::{AgentCommand, AgentError};
use crate::games::tictactoe::{GameOutcome, GameSnapshot, Player, Position};
use crate::session::{Phase, SessionView};
use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use tracing::debug;

/// Main application state.
#[derive(Debug)]
pub struct App {
    view: SessionView,
    cursor: Position,
    dialog_dismissed: bool,
    should_quit: bool,
    tick: usize,
    last_area: Rect,
}

impl App {
    /// Creates a new application.
    pub fn new() -> Self {
        Self {
            view: SessionView::new(),
            cursor: Position::Center,
            dialog_dismissed: false,
            should_quit: false,
            tick: 0,
            last_area: Rect::default(),
        }
    }

    /// Session view-model.
    pub fn view(&self) -> &SessionView {
        &self.view
    }

    /// Square under the keyboard cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Requests the opening game.
    pub fn start(&mut self) -> Option<AgentCommand> {
        self.new_game()
    }

    /// Applies a finished request.
    pub fn apply(&mut self, outcome: Result<GameSnapshot, AgentError>) {
        self.view.complete(outcome);
        self.dialog_dismissed = false;
    }

    /// Advances the loading animation.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Remembers the frame size for mouse hit-testing.
    pub fn set_area(&mut self, area: Rect) {
        self.last_area = area;
    }

    /// End-of-game dialog, unless dismissed.
    pub fn dialog(&self) -> Option<GameOutcome> {
        if self.dialog_dismissed {
            None
        } else {
            self.view.result_dialog()
        }
    }

    /// Handles a key press, returning a command to send if any.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<AgentCommand> {
        debug!(?key, "Handling key");

        if self.dialog().is_some() {
            return match key {
                KeyCode::Enter | KeyCode::Char('n') => self.new_game(),
                KeyCode::Esc => {
                    self.dialog_dismissed = true;
                    None
                }
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    None
                }
                _ => None,
            };
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('n') => self.new_game(),
            KeyCode::Enter | KeyCode::Char(' ') => self.select(self.cursor),
            code => {
                if let Some(position) = digit_position(code) {
                    self.select(position)
                } else {
                    self.cursor = move_cursor(self.cursor, code);
                    None
                }
            }
        }
    }

    /// Handles a left click at terminal coordinates.
    pub fn handle_click(&mut self, column: u16, row: u16) -> Option<AgentCommand> {
        if self.dialog().is_some() {
            return None;
        }
        let position = super::ui::cell_at(self.last_area, column, row)?;
        debug!(%position, "Clicked square");
        self.select(position)
    }

    fn select(&mut self, position: Position) -> Option<AgentCommand> {
        self.cursor = position;
        self.view.begin_move(position)
    }

    fn new_game(&mut self) -> Option<AgentCommand> {
        let command = self.view.begin_new_game();
        if command.is_some() {
            self.dialog_dismissed = false;
        }
        command
    }

    /// Text for the status bar.
    pub fn status_line(&self) -> String {
        match self.view.phase() {
            Phase::Idle => "Connecting to the agent...".to_string(),
            Phase::Loading(command) => {
                let dots = ".".repeat(self.tick / 3 % 4);
                match command {
                    AgentCommand::NewGame => format!("Starting a new game{}", dots),
                    AgentCommand::Move(_) => format!("The agent is thinking{}", dots),
                }
            }
            Phase::Failed(reason) => format!("Error: {}", reason),
            Phase::Loaded => {
                let mut line = self.view.status_message().to_string();
                if let Some(snapshot) = self.view.snapshot() {
                    if let Some(last) = snapshot.last_move() {
                        if let (Some(Player::O), Some(position)) = (last.player, last.position) {
                            line = format!("Agent played {}. {}", position, line);
                        }
                    }
                    if let Some(count) = snapshot.metadata().as_ref().and_then(|m| m.move_count) {
                        line = format!("{} (move {})", line.trim_end(), count);
                    }
                }
                line
            }
        }
    }
}
