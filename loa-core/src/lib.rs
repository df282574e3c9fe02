//! LOA Core - Lines of Action engine and AI
//!
//! This crate provides the core game logic for Lines of Action:
//! - Board geometry (8x8 squares, 8 directions)
//! - Position state with in-place apply/undo and legal move generation
//! - Connectivity-based win and move-limit tie detection
//! - Position evaluation
//! - Fixed-depth alpha-beta AI

pub mod board;
pub mod pieces;
pub mod game;
pub mod eval;
pub mod ai;
pub mod setup;
pub mod error;

// Re-exports for convenient access
pub use board::{Square, ALL_SQUARES, BOARD_SIZE, DIRECTIONS};
pub use pieces::Piece;
pub use game::{Move, Position, Winner, DEFAULT_MOVE_LIMIT};
pub use eval::{heuristic_est, static_eval, WINNING_VALUE};
pub use ai::{MachinePlayer, Scoring, SearchConfig, SearchResult, SearchStats};
pub use setup::Setup;
pub use error::LoaError;
