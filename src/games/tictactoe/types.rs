//! Core domain types for tic-tac-toe, as mirrored from the agent.

use super::position::Position;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::instrument;

/// Player in the game. The human plays X, the agent plays O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// Player X (the human).
    X,
    /// Player O (the agent).
    O,
}

/// A square on the board.
///
/// The agent sends an empty square as its own number (1-9) and an
/// occupied square as `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireCell", into = "WireCell")]
pub enum Cell {
    /// Empty square, labelled with its position.
    Empty(Position),
    /// Square occupied by a player.
    Mark(Player),
}

impl Cell {
    /// Checks if the square is empty.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty(_))
    }

    /// Text shown for this square.
    pub fn symbol(self) -> String {
        match self {
            Cell::Empty(position) => position.number().to_string(),
            Cell::Mark(player) => player.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WireCell {
    Number(u8),
    Text(String),
}

impl TryFrom<WireCell> for Cell {
    type Error = GameStateError;

    fn try_from(wire: WireCell) -> Result<Self, Self::Error> {
        match wire {
            WireCell::Number(n) => Position::new(n)
                .map(Cell::Empty)
                .ok_or_else(|| GameStateError::new(format!("cell number {} is outside 1-9", n))),
            WireCell::Text(text) => match text.trim() {
                "X" => Ok(Cell::Mark(Player::X)),
                "O" => Ok(Cell::Mark(Player::O)),
                other => other
                    .parse::<u8>()
                    .ok()
                    .and_then(Position::new)
                    .map(Cell::Empty)
                    .ok_or_else(|| GameStateError::new(format!("unrecognized cell {:?}", other))),
            },
        }
    }
}

impl From<Cell> for WireCell {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty(position) => WireCell::Number(position.number()),
            Cell::Mark(player) => WireCell::Text(player.to_string()),
        }
    }
}

/// Status of the game as reported by the agent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    /// Game is ongoing.
    #[default]
    InProgress,
    /// Game ended in a win.
    Won,
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Whether the game is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Draw)
    }
}

/// Winner field of the payload, meaningful only once the game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    /// X won.
    X,
    /// O won.
    O,
    /// Nobody won.
    #[serde(rename = "none", alias = "None")]
    None,
}

impl Winner {
    /// The winning player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Winner::X => Some(Player::X),
            Winner::O => Some(Player::O),
            Winner::None => None,
        }
    }
}

/// Board plus the moves still open.
///
/// A position is in `available_moves` iff its cell is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: [Cell; 9],
    available_moves: BTreeSet<Position>,
}

impl GameState {
    /// Creates an empty board with every move available.
    pub fn new() -> Self {
        Self {
            board: Position::ALL.map(Cell::Empty),
            available_moves: Position::ALL.into_iter().collect(),
        }
    }

    /// Builds a state from the agent's board and move list, checking
    /// that they agree.
    #[instrument(skip_all, fields(cells = board.len(), available = available_moves.len()))]
    pub fn from_parts(
        board: Vec<Cell>,
        available_moves: Vec<Position>,
    ) -> Result<Self, GameStateError> {
        let board: [Cell; 9] = board.try_into().map_err(|cells: Vec<Cell>| {
            GameStateError::new(format!("board has {} cells, expected 9", cells.len()))
        })?;

        for (position, cell) in Position::ALL.iter().zip(board.iter()) {
            match cell {
                Cell::Empty(label) if label != position => {
                    return Err(GameStateError::new(format!(
                        "empty cell at {} is labelled {}",
                        position, label
                    )));
                }
                _ => {}
            }
        }

        let available_moves: BTreeSet<Position> = available_moves.into_iter().collect();
        let empty: BTreeSet<Position> = Position::ALL
            .into_iter()
            .filter(|position| board[position.to_index()].is_empty())
            .collect();

        if available_moves != empty {
            return Err(GameStateError::new(format!(
                "available moves {:?} do not match empty cells {:?}",
                available_moves, empty
            )));
        }

        Ok(Self {
            board,
            available_moves,
        })
    }

    /// Returns all squares.
    pub fn board(&self) -> &[Cell; 9] {
        &self.board
    }

    /// Gets the square at the given position.
    pub fn cell(&self, position: Position) -> Cell {
        self.board[position.to_index()]
    }

    /// Positions still open for play.
    pub fn available_moves(&self) -> &BTreeSet<Position> {
        &self.available_moves
    }

    /// Checks if a position is open for play.
    pub fn is_available(&self, position: Position) -> bool {
        self.available_moves.contains(&position)
    }

    /// Marked squares with their owner.
    pub fn marks(&self) -> impl Iterator<Item = (Position, Player)> + '_ {
        Position::ALL
            .into_iter()
            .filter_map(|position| match self.cell(position) {
                Cell::Mark(player) => Some((position, player)),
                Cell::Empty(_) => None,
            })
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                result.push_str(&self.board[row * 3 + col].symbol());
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Game state that cannot be mirrored as received.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid game state: {} at {}:{}", message, file, line)]
pub struct GameStateError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GameStateError {
    /// Creates a new game state error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
