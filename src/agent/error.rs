//! Agent request error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Reply shown when the agent sent something we could not read.
const UNREADABLE_RESPONSE: &str = "The agent sent a response that could not be read.";

/// What went wrong talking to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AgentErrorKind {
    /// The request never produced a successful HTTP response.
    #[display("Network failure: {}", _0)]
    NetworkFailure(String),
    /// The agent answered but reported failure in its envelope.
    #[display("Agent failure: {}", _0)]
    EnvelopeFailure(String),
    /// The response was not valid JSON, or not the expected shape.
    #[display("Parse failure: {}", _0)]
    ParseFailure(String),
}

/// Agent error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Agent error: {} at {}:{}", kind, file, line)]
pub struct AgentError {
    /// Error kind and detail.
    pub kind: AgentErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl AgentError {
    /// Creates a new agent error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: AgentErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Network failure.
    #[track_caller]
    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::NetworkFailure(detail.into()))
    }

    /// Failure reported by the agent.
    #[track_caller]
    pub fn envelope(message: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::EnvelopeFailure(message.into()))
    }

    /// Unreadable response.
    #[track_caller]
    pub fn parse(detail: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::ParseFailure(detail.into()))
    }

    /// Message suitable for the status bar.
    ///
    /// Parse details stay in the logs; the user sees a generic line.
    pub fn user_message(&self) -> String {
        match &self.kind {
            AgentErrorKind::NetworkFailure(detail) => {
                format!("Could not reach the agent: {}", detail)
            }
            AgentErrorKind::EnvelopeFailure(message) => message.clone(),
            AgentErrorKind::ParseFailure(_) => UNREADABLE_RESPONSE.to_string(),
        }
    }
}

impl From<reqwest::Error> for AgentError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::network(err.to_string())
    }
}

impl From<serde_json::Error> for AgentError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

impl From<crate::games::tictactoe::GameStateError> for AgentError {
    #[track_caller]
    fn from(err: crate::games::tictactoe::GameStateError) -> Self {
        Self::parse(err.message)
    }
}
