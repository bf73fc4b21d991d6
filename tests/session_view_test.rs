//! Tests for the session view-model against a scripted agent.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use agent_tictactoe::{
    AgentClient, AgentCommand, AgentError, Cell, GameOutcome, GameStatus, Phase, Player, Position,
    SessionView, Winner,
};
use serde_json::{Value, json};

/// Agent stand-in that replays canned bodies and records what it was sent.
#[derive(Default)]
struct ScriptedAgent {
    replies: Mutex<VecDeque<Result<String, AgentError>>>,
    sent: Mutex<Vec<AgentCommand>>,
}

impl ScriptedAgent {
    fn replying(replies: Vec<Result<String, AgentError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<AgentCommand> {
        self.sent.lock().expect("sent lock").clone()
    }
}

#[async_trait::async_trait]
impl AgentClient for ScriptedAgent {
    async fn send(&self, command: AgentCommand) -> Result<String, AgentError> {
        self.sent.lock().expect("sent lock").push(command);
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::network("no scripted reply")))
    }
}

/// Agent that never answers.
struct SilentAgent;

#[async_trait::async_trait]
impl AgentClient for SilentAgent {
    async fn send(&self, _command: AgentCommand) -> Result<String, AgentError> {
        std::future::pending().await
    }
}

fn payload(board: Value, available: Value, status: &str, winner: &str, message: &str) -> Value {
    json!({
        "game_state": {
            "board": board,
            "board_display": "",
            "positions_filled": [],
            "available_moves": available,
        },
        "last_move": null,
        "game_status": status,
        "winner": winner,
        "message": message,
        "metadata": {"move_count": 0, "timestamp": "2024-01-01T00:00:00Z"},
    })
}

fn success(payload: Value) -> Result<String, AgentError> {
    Ok(json!({"success": true, "response": payload}).to_string())
}

fn opening() -> Result<String, AgentError> {
    success(payload(
        json!([1, 2, 3, 4, 5, 6, 7, 8, 9]),
        json!([1, 2, 3, 4, 5, 6, 7, 8, 9]),
        "in_progress",
        "none",
        "Your move",
    ))
}

fn after_center_and_corner() -> Result<String, AgentError> {
    success(payload(
        json!(["O", 2, 3, 4, "X", 6, 7, 8, 9]),
        json!([2, 3, 4, 6, 7, 8, 9]),
        "in_progress",
        "none",
        "Agent played 1. Your move",
    ))
}

#[tokio::test]
async fn test_new_game_shows_nine_clickable_cells() {
    let agent = ScriptedAgent::replying(vec![opening()]);
    let mut view = SessionView::new();

    assert!(view.start_new_game(&agent).await);

    assert_eq!(agent.sent(), vec![AgentCommand::NewGame]);
    assert!(!view.is_loading());
    assert_eq!(view.error(), None);
    assert_eq!(view.status(), GameStatus::InProgress);
    assert_eq!(view.status_message(), "Your move");
    for position in Position::ALL {
        assert!(view.is_clickable(position), "{} should be clickable", position);
    }
    assert_eq!(view.result_dialog(), None);
}

#[tokio::test]
async fn test_available_moves_partition_the_board() {
    let agent = ScriptedAgent::replying(vec![after_center_and_corner()]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;

    let state = view.game_state().expect("state after success");
    let marked: BTreeSet<Position> = state.marks().map(|(p, _)| p).collect();
    let available = state.available_moves().clone();

    assert!(marked.is_disjoint(&available));
    let union: BTreeSet<Position> = marked.union(&available).copied().collect();
    assert_eq!(union, Position::ALL.into_iter().collect());
}

#[tokio::test]
async fn test_move_marks_cell_and_disables_it() {
    let agent = ScriptedAgent::replying(vec![
        opening(),
        success(payload(
            json!([1, 2, 3, 4, "X", 6, 7, 8, 9]),
            json!([1, 2, 3, 4, 6, 7, 8, 9]),
            "in_progress",
            "none",
            "Your move",
        )),
    ]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;

    assert!(view.make_move(&agent, Position::Center).await);

    assert_eq!(
        agent.sent(),
        vec![AgentCommand::NewGame, AgentCommand::Move(Position::Center)]
    );
    let state = view.game_state().expect("state after move");
    assert_eq!(state.cell(Position::Center), Cell::Mark(Player::X));
    assert!(!view.is_clickable(Position::Center));
    for position in Position::ALL.into_iter().filter(|p| *p != Position::Center) {
        assert!(view.is_clickable(position));
    }
}

#[tokio::test]
async fn test_move_while_loading_sends_nothing() {
    let agent = ScriptedAgent::replying(vec![opening()]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;

    assert_eq!(view.begin_new_game(), Some(AgentCommand::NewGame));
    assert!(!view.make_move(&agent, Position::TopLeft).await);
    assert!(!view.start_new_game(&agent).await);

    assert_eq!(agent.sent(), vec![AgentCommand::NewGame]);
    assert!(view.is_loading());
}

#[tokio::test]
async fn test_move_on_taken_square_sends_nothing() {
    let agent = ScriptedAgent::replying(vec![after_center_and_corner()]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;

    assert!(!view.make_move(&agent, Position::TopLeft).await);
    assert!(!view.make_move(&agent, Position::Center).await);
    assert_eq!(agent.sent().len(), 1);
}

#[tokio::test]
async fn test_win_shows_dialog_and_locks_board() {
    let agent = ScriptedAgent::replying(vec![
        opening(),
        success(payload(
            json!(["X", "X", "X", "O", "O", 6, 7, 8, 9]),
            json!([6, 7, 8, 9]),
            "won",
            "X",
            "You won!",
        )),
    ]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;
    view.make_move(&agent, Position::TopRight).await;

    assert_eq!(view.status(), GameStatus::Won);
    assert_eq!(view.winner(), Some(Winner::X));
    let dialog = view.result_dialog().expect("dialog after win");
    assert_eq!(dialog, GameOutcome::Win(Player::X));
    assert_eq!(dialog.message(), "You win!");
    for position in Position::ALL {
        assert!(!view.is_clickable(position));
    }
}

#[tokio::test]
async fn test_draw_dialog() {
    let agent = ScriptedAgent::replying(vec![success(payload(
        json!(["X", "O", "X", "X", "O", "O", "O", "X", "X"]),
        json!([]),
        "draw",
        "none",
        "Draw",
    ))]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;

    assert_eq!(view.result_dialog(), Some(GameOutcome::Draw));
}

#[tokio::test]
async fn test_new_game_after_win_resets_outcome() {
    let agent = ScriptedAgent::replying(vec![success(payload(
        json!(["O", "O", "O", "X", "X", 6, 7, 8, 9]),
        json!([6, 7, 8, 9]),
        "won",
        "O",
        "The agent won",
    ))]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;
    assert_eq!(view.result_dialog(), Some(GameOutcome::Win(Player::O)));

    view.begin_new_game();

    assert_eq!(view.status(), GameStatus::InProgress);
    assert_eq!(view.winner(), None);
    assert_eq!(view.result_dialog(), None);
    assert!(view.game_state().is_some());
}

#[tokio::test]
async fn test_malformed_json_keeps_previous_state() {
    let agent = ScriptedAgent::replying(vec![
        opening(),
        Ok("{not json".to_string()),
        Ok(json!({"success": true, "response": "{also not json"}).to_string()),
    ]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;
    let before = view.game_state().cloned();

    view.make_move(&agent, Position::Center).await;
    assert!(!view.is_loading());
    assert!(view.error().is_some_and(|e| !e.is_empty()));
    assert_eq!(view.game_state().cloned(), before);

    view.make_move(&agent, Position::Center).await;
    assert!(!view.is_loading());
    assert!(view.error().is_some_and(|e| !e.is_empty()));
    assert_eq!(view.game_state().cloned(), before);
}

#[tokio::test]
async fn test_network_failure_sets_error_and_keeps_state() {
    let agent = ScriptedAgent::replying(vec![
        opening(),
        Err(AgentError::network("connection refused")),
    ]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;
    let before = view.game_state().cloned();

    assert!(view.make_move(&agent, Position::BottomLeft).await);

    assert!(!view.is_loading());
    assert!(view.error().is_some_and(|e| e.contains("connection refused")));
    assert_eq!(view.game_state().cloned(), before);
}

#[tokio::test]
async fn test_first_request_failure_leaves_no_board() {
    let agent = ScriptedAgent::replying(vec![Ok(
        json!({"success": false, "error": "Agent not found"}).to_string(),
    )]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;

    assert_eq!(view.error(), Some("Agent not found"));
    assert!(view.game_state().is_none());
    assert!(!view.is_clickable(Position::Center));
}

#[tokio::test]
async fn test_error_clears_when_next_request_starts() {
    let agent = ScriptedAgent::replying(vec![Err(AgentError::network("down")), opening()]);
    let mut view = SessionView::new();
    view.start_new_game(&agent).await;
    assert!(view.error().is_some());

    view.begin_new_game();
    assert_eq!(view.error(), None);
    assert!(view.is_loading());
}

#[tokio::test]
async fn test_abandoned_request_releases_loading() {
    let mut view = SessionView::new();

    let result = tokio::time::timeout(
        Duration::from_millis(20),
        view.start_new_game(&SilentAgent),
    )
    .await;

    assert!(result.is_err());
    assert!(!view.is_loading());
    assert!(matches!(view.phase(), Phase::Failed(_)));
}
