//! Show and moves commands - inspect a position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_show(), run_moves() - orchestration
//! - Level 2: load_position()
//! - Level 3: render_moves()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use loa_core::{Move, Position, Setup};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PositionArgs {
    /// Position setup JSON file (standard layout if omitted)
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Override the move limit
    #[arg(long)]
    pub move_limit: Option<usize>,
}

#[derive(Args)]
pub struct MovesArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    /// Output moves as a JSON array
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Print the board dump
pub fn run_show(args: PositionArgs) -> Result<()> {
    let position = load_position(&args)?;
    println!("{position}");
    Ok(())
}

/// Print every legal move in canonical order
pub fn run_moves(args: MovesArgs) -> Result<()> {
    let position = load_position(&args.position)?;
    let moves = position.legal_moves();

    tracing::info!(
        "{} legal moves for {}",
        moves.len(),
        position.turn().full_name()
    );

    println!("{}", render_moves(&moves, args.json)?);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build the position named by the arguments
pub fn load_position(args: &PositionArgs) -> Result<Position> {
    let setup = match &args.setup {
        Some(path) => Setup::load(path)?,
        None => Setup::standard(),
    };

    let mut position = setup
        .to_position()
        .with_context(|| format!("invalid setup {:?}", setup.name))?;

    if let Some(limit) = args.move_limit {
        position.set_move_limit(limit);
    }

    tracing::debug!(name = %setup.name, "loaded position");
    Ok(position)
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn render_moves(moves: &[Move], json: bool) -> Result<String> {
    let names: Vec<String> = moves.iter().map(Move::to_string).collect();
    if json {
        Ok(serde_json::to_string(&names)?)
    } else {
        Ok(names.join("\n"))
    }
}
