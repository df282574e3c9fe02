//! Position evaluation
//!
//! Scores are from White's point of view: White maximises, Black minimises.

use crate::board::Square;
use crate::game::{Position, Winner};
use crate::pieces::Piece;

/// Score of a position White has won (negated for Black)
pub const WINNING_VALUE: i32 = i32::MAX - 20;

/// Bound larger than any score the evaluator produces
pub const INFTY: i32 = i32::MAX;

/// Below this many pieces a side is rewarded for its largest cluster
pub const ENDGAME_PIECES: usize = 6;

/// Rows and columns 2..6 (c3 to f6)
const CENTER: std::ops::Range<usize> = 2..6;

/// Side whose wins score positive
pub const MAXIMIZING_SIDE: Piece = Piece::White;

/// Static value of `position`: win sentinels for finished games, else the heuristic
pub fn static_eval(position: &Position) -> i32 {
    match position.winner() {
        Some(Winner::Side(Piece::White)) => WINNING_VALUE,
        Some(Winner::Side(_)) => -WINNING_VALUE,
        Some(Winner::Tie) => 0,
        None => heuristic_est(position),
    }
}

/// Centre control plus a consolidation bonus for sides with few pieces left
pub fn heuristic_est(position: &Position) -> i32 {
    let mut est = 0;
    for col in CENTER {
        for row in CENTER {
            est += sign(position.get(Square::new(col, row)));
        }
    }

    for side in [Piece::White, Piece::Black] {
        let regions = position.region_sizes(side);
        let total: usize = regions.iter().sum();
        if total < ENDGAME_PIECES {
            let largest = regions.first().copied().unwrap_or(0) as i32;
            est += sign(side) * largest;
        }
    }

    est
}

fn sign(piece: Piece) -> i32 {
    match piece {
        Piece::White => 1,
        Piece::Black => -1,
        Piece::Empty => 0,
    }
}
