//! Terminal UI for playing against the agent.

mod app;
mod input;
mod ui;

pub use app::App;

use crate::agent::{AgentClient, AgentCommand, AgentError, HttpAgentClient};
use crate::client_config::ClientConfig;
use crate::games::tictactoe::GameSnapshot;
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

/// Log file for the TUI; logging to stdout would corrupt the screen.
pub const LOG_FILE: &str = "agent_tictactoe.log";

type Outcome = Result<GameSnapshot, AgentError>;
type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the TUI client
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    let log_file = std::fs::File::create(LOG_FILE).context("Failed to create log file")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(
        url = %config.endpoint_url(),
        agent_id = %config.agent_id(),
        "Starting agent tic-tac-toe TUI"
    );

    let client: Arc<dyn AgentClient> = Arc::new(HttpAgentClient::new(&config)?);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, client).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

async fn run_app(terminal: &mut Term, client: Arc<dyn AgentClient>) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<Outcome>();
    let mut app = App::new();

    if let Some(command) = app.start() {
        dispatch(&client, command, &outcome_tx);
    }

    loop {
        let frame = terminal.draw(|f| ui::draw(f, &app))?;
        app.set_area(frame.area);

        while let Ok(outcome) = outcome_rx.try_recv() {
            app.apply(outcome);
        }

        if event::poll(Duration::from_millis(100))? {
            let command = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    app.handle_click(mouse.column, mouse.row)
                }
                _ => None,
            };
            if let Some(command) = command {
                dispatch(&client, command, &outcome_tx);
            }
        }

        if app.should_quit() {
            info!("User quit");
            return Ok(());
        }

        app.on_tick();
    }
}

/// Sends a command on a background task; the outcome comes back through
/// the channel.
#[instrument(skip(client, outcome_tx))]
fn dispatch(
    client: &Arc<dyn AgentClient>,
    command: AgentCommand,
    outcome_tx: &mpsc::UnboundedSender<Outcome>,
) {
    let client = Arc::clone(client);
    let outcome_tx = outcome_tx.clone();
    tokio::spawn(async move {
        let outcome = client.exchange(command).await;
        debug!(%command, ok = outcome.is_ok(), "Request finished");
        if outcome_tx.send(outcome).is_err() {
            debug!("UI gone before response arrived");
        }
    });
}
