//! Game payload as sent by the agent inside the response envelope.
//!
//! Only the board, the open moves and the status are required. Everything
//! else is informational, so a value that does not fit its type is read
//! as absent rather than failing the whole update.

use super::position::Position;
use super::types::{Cell, GameStatus, Player, Winner};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// The agent's view of one game after a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePayload {
    /// Board and open moves.
    pub game_state: WireGameState,
    /// The most recent move, if any was made.
    #[serde(default, deserialize_with = "lenient")]
    pub last_move: Option<LastMove>,
    /// Whether the game is still going.
    pub game_status: GameStatus,
    /// Winner once the game is over.
    #[serde(default)]
    pub winner: Option<Winner>,
    /// Text for the status line.
    #[serde(default)]
    pub message: String,
    /// Move bookkeeping.
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<MoveMetadata>,
}

/// Board section of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireGameState {
    /// Nine cells in row-major order.
    pub board: Vec<Cell>,
    /// Pre-rendered board, in whatever shape the agent chose.
    #[serde(default)]
    pub board_display: Option<Value>,
    /// Filled squares, in whatever shape the agent chose.
    #[serde(default)]
    pub positions_filled: Option<Value>,
    /// Positions still open.
    pub available_moves: Vec<Position>,
}

/// A move reported by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    /// Who moved.
    #[serde(default, deserialize_with = "lenient")]
    pub player: Option<Player>,
    /// Where.
    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<Position>,
    /// Free-form result text.
    #[serde(default, deserialize_with = "lenient")]
    pub result: Option<String>,
}

/// Move count and time of the last update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveMetadata {
    /// Moves played so far.
    #[serde(default, deserialize_with = "lenient")]
    pub move_count: Option<u32>,
    /// Agent-side timestamp, passed through untouched.
    #[serde(default)]
    pub timestamp: Option<Value>,
}

/// Reads any JSON value, keeping it only if it fits `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(%value, error = %e, "Ignoring informational field");
            None
        }
    }))
}
