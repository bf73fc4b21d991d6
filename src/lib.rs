//! Agent tic-tac-toe - terminal client for a remote game-playing agent
//!
//! All game rules and AI moves live in the agent service. This crate
//! mirrors the agent's state and forwards the player's commands.
//!
//! # Architecture
//!
//! - **Agent**: request types, reqwest transport, response normalization
//! - **Session**: the view-model deriving UI state from agent replies
//! - **Games**: tic-tac-toe types as the agent describes them
//! - **TUI**: ratatui front end
//!
//! # Example
//!
//! ```no_run
//! use agent_tictactoe::{ClientConfig, HttpAgentClient, SessionView};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = HttpAgentClient::new(&ClientConfig::default())?;
//! let mut view = SessionView::new();
//! view.start_new_game(&client).await;
//! println!("{}", view.status_message());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agent;
mod client_config;
mod games;
mod session;
mod tui;

// Crate-level exports - Agent transport
pub use agent::{
    AgentClient, AgentCommand, AgentError, AgentErrorKind, ChatRequest, CommandParseError,
    Envelope, HttpAgentClient, ResponsePayload, normalize,
};

// Crate-level exports - Configuration
pub use client_config::{AGENT_ID_ENV, BASE_URL_ENV, ClientConfig, ConfigError};

// Crate-level exports - Session view-model
pub use session::{Phase, SessionView};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Cell, GameOutcome, GamePayload, GameSnapshot, GameState, GameStateError, GameStatus, LastMove,
    MoveMetadata, Player, Position, PositionError, WireGameState, Winner,
};

// Crate-level exports - Terminal UI
pub use tui::{App, LOG_FILE, run_tui};
