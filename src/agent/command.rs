//! Commands the client sends to the agent.

use crate::games::tictactoe::Position;
use derive_more::{Display, Error};
use derive_new::new;
use serde::Serialize;
use std::str::FromStr;

/// One of the two requests the client can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AgentCommand {
    /// Start over with an empty board.
    #[display("new game")]
    NewGame,
    /// Play X at a position.
    #[display("move {}", _0)]
    Move(Position),
}

impl FromStr for AgentCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            [first, second]
                if first.eq_ignore_ascii_case("new") && second.eq_ignore_ascii_case("game") =>
            {
                Ok(AgentCommand::NewGame)
            }
            [verb, target] if verb.eq_ignore_ascii_case("move") => {
                Position::from_label_or_number(target)
                    .map(AgentCommand::Move)
                    .ok_or_else(|| CommandParseError::new(s.to_string()))
            }
            _ => Err(CommandParseError::new(s.to_string())),
        }
    }
}

/// Text that is neither `new game` nor `move <1-9>`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, new)]
#[display("unrecognized command {:?}; expected \"new game\" or \"move <1-9>\"", input)]
pub struct CommandParseError {
    /// The rejected input.
    pub input: String,
}

/// Body of the agent chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct ChatRequest {
    /// Command text.
    message: String,
    /// Which agent should answer.
    agent_id: String,
}
