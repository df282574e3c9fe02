//! Errors raised at the notation and setup boundary

/// Recoverable errors from parsing squares, moves and position setups
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoaError {
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    #[error("invalid move: {0:?}")]
    InvalidMove(String),

    #[error("invalid piece character: {0:?}")]
    InvalidPiece(char),

    #[error("setup must have {expected} rows of {expected} cells, got {got}")]
    BadDimensions { expected: usize, got: usize },

    #[error("side to move must be black or white")]
    EmptyTurn,
}

pub type Result<T> = std::result::Result<T, LoaError>;
