//! Canonical client-side copy of the last good agent response.

use super::payload::{GamePayload, LastMove, MoveMetadata};
use super::types::{GameState, GameStateError, GameStatus, Player, Winner};
use derive_getters::Getters;
use tracing::{debug, instrument};

/// Everything the client shows about a game, rebuilt on every response.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct GameSnapshot {
    /// Board and open moves.
    state: GameState,
    /// Game status.
    status: GameStatus,
    /// Winner, set only when the game is over.
    winner: Option<Winner>,
    /// Status line text from the agent.
    message: String,
    /// The most recent move.
    last_move: Option<LastMove>,
    /// Move bookkeeping.
    metadata: Option<MoveMetadata>,
}

impl GameSnapshot {
    /// Clears the outcome while a new game is being requested.
    pub(crate) fn reset_outcome(&mut self) {
        self.status = GameStatus::InProgress;
        self.winner = None;
    }

    /// The finished game's result, if it is over.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.status.is_terminal() {
            return None;
        }
        Some(match (self.status, self.winner.and_then(Winner::player)) {
            (GameStatus::Draw, _) => GameOutcome::Draw,
            (_, Some(player)) => GameOutcome::Win(player),
            (_, None) => GameOutcome::Over,
        })
    }
}

impl TryFrom<GamePayload> for GameSnapshot {
    type Error = GameStateError;

    #[instrument(skip_all, fields(status = %payload.game_status))]
    fn try_from(payload: GamePayload) -> Result<Self, Self::Error> {
        let state = GameState::from_parts(
            payload.game_state.board,
            payload.game_state.available_moves,
        )?;

        let winner = if payload.game_status.is_terminal() {
            payload.winner
        } else {
            None
        };

        debug!(
            available = state.available_moves().len(),
            ?winner,
            "Built game snapshot"
        );

        Ok(Self {
            state,
            status: payload.game_status,
            winner,
            message: payload.message,
            last_move: payload.last_move,
            metadata: payload.metadata,
        })
    }
}

/// How a finished game ended, from the human's (X) point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// A player won.
    Win(Player),
    /// Nobody won.
    Draw,
    /// Reported as won without naming a winner.
    Over,
}

impl GameOutcome {
    /// Text for the end-of-game dialog.
    pub fn message(self) -> &'static str {
        match self {
            GameOutcome::Win(Player::X) => "You win!",
            GameOutcome::Win(Player::O) => "The agent wins!",
            GameOutcome::Draw => "It's a draw!",
            GameOutcome::Over => "Game over.",
        }
    }
}
