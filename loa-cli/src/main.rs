//! LOA CLI - Command-line interface
//!
//! Commands:
//! - show: Print a position
//! - moves: List legal moves
//! - choose: Ask the engine for a move

mod choose_cmd;
mod inspect;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "loa")]
#[command(about = "Lines of Action engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the board
    Show(inspect::PositionArgs),
    /// List legal moves for the side to move
    Moves(inspect::MovesArgs),
    /// Search for a move
    Choose(choose_cmd::ChooseArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show(args) => inspect::run_show(args),
        Commands::Moves(args) => inspect::run_moves(args),
        Commands::Choose(args) => choose_cmd::run(args),
    }
}
