//! Board positions for tic-tac-toe moves.
//!
//! The agent numbers squares 1-9 in row-major order, so that is the
//! wire representation. Internally the board is indexed 0-8.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// A position on the tic-tac-toe board (1-9 on the wire).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Position {
    /// Top-left (position 1)
    TopLeft,
    /// Top-center (position 2)
    TopCenter,
    /// Top-right (position 3)
    TopRight,
    /// Middle-left (position 4)
    MiddleLeft,
    /// Center (position 5)
    Center,
    /// Middle-right (position 6)
    MiddleRight,
    /// Bottom-left (position 7)
    BottomLeft,
    /// Bottom-center (position 8)
    BottomCenter,
    /// Bottom-right (position 9)
    BottomRight,
}

impl Position {
    /// All 9 positions in board order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Creates a position from its 1-based number.
    #[instrument]
    pub fn new(number: u8) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::from_index(index as usize))
    }

    /// Creates position from board index (0-8).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// The 1-based number the agent uses for this square.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Row on the board (0-2).
    pub fn row(self) -> usize {
        self.to_index() / 3
    }

    /// Column on the board (0-2).
    pub fn col(self) -> usize {
        self.to_index() % 3
    }

    /// Creates a position from a row and column (0-2 each).
    pub fn from_row_col(row: usize, col: usize) -> Option<Self> {
        if row < 3 && col < 3 {
            Self::from_index(row * 3 + col)
        } else {
            None
        }
    }

    /// Get label for this position (for display).
    pub fn label(self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Parse from a number (1-9) or a label such as "center".
    #[instrument]
    pub fn from_label_or_number(s: &str) -> Option<Position> {
        let s = s.trim();
        if let Ok(num) = s.parse::<u8>() {
            return Self::new(num);
        }

        let s_lower = s.to_lowercase();
        Position::iter().find(|pos| pos.label().to_lowercase() == s_lower)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> Self {
        position.number()
    }
}

impl TryFrom<u8> for Position {
    type Error = PositionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Position::new(value).ok_or(PositionError { value })
    }
}

/// A square number outside 1-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("position {} is outside 1-9", value)]
pub struct PositionError {
    /// The rejected number.
    pub value: u8,
}
