//! Choose command - run the search on a position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), report()

use anyhow::Result;
use clap::{Args, ValueEnum};

use loa_core::{MachinePlayer, Position, Scoring, SearchConfig, SearchResult, Winner};

use crate::inspect::{load_position, PositionArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ChooseArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    /// Search depth in plies
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// How best-so-far values are tracked
    #[arg(long, value_enum, default_value = "minimax")]
    pub scoring: ScoringArg,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScoringArg {
    Minimax,
    Immediate,
}

impl From<ScoringArg> for Scoring {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::Minimax => Scoring::Minimax,
            ScoringArg::Immediate => Scoring::Immediate,
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run choose command
pub fn run(args: ChooseArgs) -> Result<()> {
    let position = load_position(&args.position)?;
    let config = build_config(&args);

    tracing::info!(
        "Searching for {} (depth={}, scoring={:?})",
        position.turn().full_name(),
        config.depth,
        config.scoring
    );

    let mut player = MachinePlayer::new(config);
    let result = player.search(&position);
    let stats = player.stats();

    tracing::info!("Searched {} nodes, {} cutoffs", stats.nodes, stats.cutoffs);

    println!("{}", report(&position, &result, args.json)?);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &ChooseArgs) -> SearchConfig {
    SearchConfig {
        depth: args.depth,
        scoring: args.scoring.into(),
    }
}

fn report(position: &Position, result: &SearchResult, json: bool) -> Result<String> {
    let outcome = match position.winner() {
        Some(Winner::Side(side)) => format!("{} wins", side.full_name()),
        Some(Winner::Tie) => "tie".to_string(),
        None => match result.best_move {
            Some(mv) => mv.to_string(),
            None => format!("no move for {}", position.turn().full_name()),
        },
    };

    if json {
        let value = serde_json::json!({
            "turn": position.turn(),
            "move": result.best_move.map(|m| m.to_string()),
            "value": result.value,
            "outcome": outcome,
        });
        return Ok(serde_json::to_string(&value)?);
    }
    Ok(outcome)
}
