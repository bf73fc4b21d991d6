//! Tic-tac-toe types mirrored from the remote agent.

mod payload;
mod position;
mod snapshot;
mod types;

pub use payload::{GamePayload, LastMove, MoveMetadata, WireGameState};
pub use position::{Position, PositionError};
pub use snapshot::{GameOutcome, GameSnapshot};
pub use types::{Cell, GameState, GameStateError, GameStatus, Player, Winner};
