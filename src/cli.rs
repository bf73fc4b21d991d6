//! Command-line interface for agent_tictactoe.

use clap::{Args, Parser, Subcommand};

/// Play tic-tac-toe against a remote AI agent
#[derive(Parser, Debug)]
#[command(name = "agent_tictactoe")]
#[command(about = "Terminal client for a tic-tac-toe playing agent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Connection settings
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Subcommand to run (defaults to the terminal UI)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Where to find the agent.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Path to client config file
    #[arg(short, long, global = true, default_value = "agent_client.toml")]
    pub config: std::path::PathBuf,

    /// Agent service URL, overriding config and environment
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Agent identifier, overriding config and environment
    #[arg(long, global = true)]
    pub agent_id: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the terminal UI client
    Tui,

    /// Send one command ("new game" or "move <1-9>") and print the result
    Send {
        /// Command words, e.g. `move 5`
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}
