//! Everything that crosses the network boundary to the agent.

mod client;
mod command;
mod envelope;
mod error;

pub use client::{AgentClient, HttpAgentClient};
pub use command::{AgentCommand, ChatRequest, CommandParseError};
pub use envelope::{Envelope, ResponsePayload, normalize};
pub use error::{AgentError, AgentErrorKind};
