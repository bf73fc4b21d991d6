//! Agent tic-tac-toe - CLI entry point

#![warn(missing_docs)]

mod cli;

use agent_tictactoe::{
    AgentClient, AgentCommand, ClientConfig, GameSnapshot, HttpAgentClient, run_tui,
};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, ConnectionArgs};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli.connection)?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(config).await,
        Command::Send { message } => {
            // One-shot mode logs to stderr so stdout carries only the board
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();

            run_send(config, message.join(" ")).await
        }
    }
}

/// File, then environment, then flags.
fn load_config(args: &ConnectionArgs) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?
        .apply_env();

    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(agent_id) = &args.agent_id {
        config = config.with_agent_id(agent_id.clone());
    }
    Ok(config)
}

/// Send one command and print what the agent made of it.
#[instrument(skip(config), fields(url = %config.endpoint_url()))]
async fn run_send(config: ClientConfig, message: String) -> Result<()> {
    let command: AgentCommand = message.parse()?;
    let client = HttpAgentClient::new(&config)?;

    info!(%command, "Sending one-shot command");
    match client.exchange(command).await {
        Ok(snapshot) => {
            print_snapshot(&snapshot);
            Ok(())
        }
        Err(err) => {
            let message = err.user_message();
            Err(err).context(message)
        }
    }
}

fn print_snapshot(snapshot: &GameSnapshot) {
    println!("{}", snapshot.state().display());
    println!();
    println!("Status: {}", snapshot.status());
    if let Some(result) = snapshot.outcome() {
        println!("{}", result.message());
    }
    if !snapshot.message().is_empty() {
        println!("{}", snapshot.message());
    }
}
