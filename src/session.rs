//! Client-side view-model for one game session against the agent.
//!
//! The view-model mirrors server state; it never predicts a move
//! locally. At most one request is in flight at a time: while the phase
//! is [`Phase::Loading`], further requests are ignored.

use crate::agent::{AgentClient, AgentCommand, AgentError};
use crate::games::tictactoe::{
    GameOutcome, GameSnapshot, GameState, GameStatus, Position, Winner,
};
use tracing::{debug, info, instrument, warn};

/// Request lifecycle of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading(AgentCommand),
    /// The last request succeeded.
    Loaded,
    /// The last request failed; the text is shown to the user.
    Failed(String),
}

/// Session state read by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    snapshot: Option<GameSnapshot>,
    phase: Phase,
}

impl SessionView {
    /// Creates an idle session with no board yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last good snapshot from the agent.
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    /// Board and open moves, once the agent has sent one.
    pub fn game_state(&self) -> Option<&GameState> {
        self.snapshot.as_ref().map(GameSnapshot::state)
    }

    /// Request lifecycle.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading(_))
    }

    /// The command currently in flight.
    pub fn pending(&self) -> Option<AgentCommand> {
        match self.phase {
            Phase::Loading(command) => Some(command),
            _ => None,
        }
    }

    /// Error text from the last failed request.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Game status; in progress until the agent says otherwise.
    pub fn status(&self) -> GameStatus {
        self.snapshot
            .as_ref()
            .map(|s| *s.status())
            .unwrap_or_default()
    }

    /// Winner, set only when the game is over.
    pub fn winner(&self) -> Option<Winner> {
        self.snapshot.as_ref().and_then(|s| *s.winner())
    }

    /// Agent's status line.
    pub fn status_message(&self) -> &str {
        self.snapshot
            .as_ref()
            .map(|s| s.message().as_str())
            .unwrap_or("")
    }

    /// Whether selecting this square would send a move.
    pub fn is_clickable(&self, position: Position) -> bool {
        !self.is_loading()
            && !self.status().is_terminal()
            && self
                .game_state()
                .is_some_and(|state| state.is_available(position))
    }

    /// Result to show in the end-of-game dialog.
    pub fn result_dialog(&self) -> Option<GameOutcome> {
        if self.is_loading() {
            return None;
        }
        self.snapshot.as_ref().and_then(GameSnapshot::outcome)
    }

    /// Enters the loading phase for a new game.
    ///
    /// Returns the command to send, or `None` if a request is already in
    /// flight.
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn begin_new_game(&mut self) -> Option<AgentCommand> {
        if self.is_loading() {
            debug!("Request in flight, ignoring new game");
            return None;
        }
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.reset_outcome();
        }
        Some(self.enter_loading(AgentCommand::NewGame))
    }

    /// Enters the loading phase for a move.
    ///
    /// Returns the command to send, or `None` if the square is not
    /// clickable (request in flight, game over, or square taken).
    #[instrument(skip(self), fields(phase = ?self.phase))]
    pub fn begin_move(&mut self, position: Position) -> Option<AgentCommand> {
        if !self.is_clickable(position) {
            debug!(%position, "Square not clickable, ignoring move");
            return None;
        }
        Some(self.enter_loading(AgentCommand::Move(position)))
    }

    fn enter_loading(&mut self, command: AgentCommand) -> AgentCommand {
        info!(%command, "Request started");
        self.phase = Phase::Loading(command);
        command
    }

    /// Applies the outcome of the request in flight and leaves the
    /// loading phase.
    ///
    /// On failure the previous snapshot is kept so the board does not
    /// blank out.
    #[instrument(skip_all, fields(pending = ?self.pending(), ok = outcome.is_ok()))]
    pub fn complete(&mut self, outcome: Result<GameSnapshot, AgentError>) {
        if !self.is_loading() {
            warn!("Response arrived with no request in flight, ignoring");
            return;
        }

        match outcome {
            Ok(snapshot) => {
                info!(
                    status = %snapshot.status(),
                    winner = ?snapshot.winner(),
                    "Request succeeded"
                );
                self.snapshot = Some(snapshot);
                self.phase = Phase::Loaded;
            }
            Err(err) => {
                warn!(error = %err, "Request failed");
                self.phase = Phase::Failed(err.user_message());
            }
        }
    }

    /// Requests a new game and waits for the reply.
    ///
    /// Returns `false` without sending anything if a request is already
    /// in flight.
    pub async fn start_new_game(&mut self, client: &dyn AgentClient) -> bool {
        let command = self.begin_new_game();
        self.run(client, command).await
    }

    /// Requests a move and waits for the reply.
    ///
    /// Returns `false` without sending anything if the square is not
    /// clickable.
    pub async fn make_move(&mut self, client: &dyn AgentClient, position: Position) -> bool {
        let command = self.begin_move(position);
        self.run(client, command).await
    }

    async fn run(&mut self, client: &dyn AgentClient, command: Option<AgentCommand>) -> bool {
        let Some(command) = command else {
            return false;
        };
        let guard = LoadingGuard { view: self };
        let outcome = client.exchange(command).await;
        guard.view.complete(outcome);
        true
    }
}

/// Leaves the loading phase if a request future is dropped before it
/// completes.
struct LoadingGuard<'a> {
    view: &'a mut SessionView,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.view.is_loading() {
            warn!("Request abandoned before completion");
            self.view.phase = Phase::Failed("The request was interrupted.".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::normalize;

    fn opening() -> GameSnapshot {
        normalize(
            r#"{"success": true, "response": {
                "game_state": {"board": [1,2,3,4,5,6,7,8,9], "available_moves": [1,2,3,4,5,6,7,8,9]},
                "game_status": "in_progress", "message": "Your move"}}"#,
        )
        .unwrap()
    }

    #[test]
    fn begin_is_guarded_while_loading() {
        let mut view = SessionView::new();
        assert_eq!(view.begin_new_game(), Some(AgentCommand::NewGame));
        assert!(view.is_loading());
        assert_eq!(view.begin_new_game(), None);
        assert_eq!(view.begin_move(Position::Center), None);
    }

    #[test]
    fn stray_completion_is_ignored() {
        let mut view = SessionView::new();
        view.complete(Ok(opening()));
        assert!(view.snapshot().is_none());
        assert_eq!(view.phase(), &Phase::Idle);
    }

    #[test]
    fn failure_replaces_loading_and_keeps_board() {
        let mut view = SessionView::new();
        view.begin_new_game();
        view.complete(Ok(opening()));
        view.begin_move(Position::TopLeft);
        view.complete(Err(AgentError::network("connection refused")));

        assert!(!view.is_loading());
        assert!(view.error().is_some_and(|e| e.contains("connection refused")));
        assert_eq!(view.game_state(), Some(opening().state()));
    }
}
