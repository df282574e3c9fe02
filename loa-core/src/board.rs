//! Square geometry for the 8x8 board

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoaError;

/// Board width and height
pub const BOARD_SIZE: usize = 8;

/// Number of adjacency directions
pub const NUM_DIRECTIONS: usize = 8;

/// Direction vectors (dcol, drow)
/// Index: 0=N, 1=NE, 2=E, 3=SE, 4=S, 5=SW, 6=W, 7=NW
pub const DIRECTIONS: [(i8, i8); NUM_DIRECTIONS] = [
    (0, 1),   // N
    (1, 1),   // NE
    (1, 0),   // E
    (1, -1),  // SE
    (0, -1),  // S
    (-1, -1), // SW
    (-1, 0),  // W
    (-1, 1),  // NW
];

/// Direction pointing the other way along the same line
pub const fn opposite_direction(dir: usize) -> usize {
    (dir + 4) % NUM_DIRECTIONS
}

/// A square, stored as `row * 8 + col`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square(u8);

/// Every square in canonical order: a1, b1, ..., h1, a2, ..., h8
pub const ALL_SQUARES: [Square; BOARD_SIZE * BOARD_SIZE] = {
    let mut squares = [Square(0); BOARD_SIZE * BOARD_SIZE];
    let mut i = 0;
    while i < squares.len() {
        squares[i] = Square(i as u8);
        i += 1;
    }
    squares
};

impl Square {
    /// Square at column `col`, row `row` (both 0-based)
    pub const fn new(col: usize, row: usize) -> Self {
        assert!(col < BOARD_SIZE && row < BOARD_SIZE);
        Square((row * BOARD_SIZE + col) as u8)
    }

    /// Square at column `col`, row `row`, or None if off the board
    pub fn checked(col: i8, row: i8) -> Option<Self> {
        let size = BOARD_SIZE as i8;
        if (0..size).contains(&col) && (0..size).contains(&row) {
            Some(Square::new(col as usize, row as usize))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn col(self) -> usize {
        self.index() % BOARD_SIZE
    }

    pub const fn row(self) -> usize {
        self.index() / BOARD_SIZE
    }

    /// Neighbour one step in `dir`
    pub fn step(self, dir: usize) -> Option<Square> {
        let (dc, dr) = DIRECTIONS[dir];
        Square::checked(self.col() as i8 + dc, self.row() as i8 + dr)
    }

    /// All 8 neighbours indexed by direction; None past the edge
    pub fn adjacent(self) -> [Option<Square>; NUM_DIRECTIONS] {
        std::array::from_fn(|dir| self.step(dir))
    }

    /// Square reached by `steps` moves in `dir`; None if off board
    pub fn move_dest(self, dir: usize, steps: usize) -> Option<Square> {
        if steps >= BOARD_SIZE {
            return None;
        }
        let (dc, dr) = DIRECTIONS[dir];
        let steps = steps as i8;
        Square::checked(
            self.col() as i8 + dc * steps,
            self.row() as i8 + dr * steps,
        )
    }

    /// True if `to` is a different square on the same row, column or diagonal
    pub fn is_valid_move(self, to: Square) -> bool {
        if self == to {
            return false;
        }
        let dc = to.col() as i8 - self.col() as i8;
        let dr = to.row() as i8 - self.row() as i8;
        dc == 0 || dr == 0 || dc.abs() == dr.abs()
    }

    /// Direction from `self` towards `to`; only meaningful if `is_valid_move(to)`
    pub fn direction_to(self, to: Square) -> Option<usize> {
        if !self.is_valid_move(to) {
            return None;
        }
        let dc = (to.col() as i8 - self.col() as i8).signum();
        let dr = (to.row() as i8 - self.row() as i8).signum();
        DIRECTIONS.iter().position(|&d| d == (dc, dr))
    }

    /// Number of single steps between two aligned squares
    pub fn distance_to(self, to: Square) -> usize {
        let dc = self.col().abs_diff(to.col());
        let dr = self.row().abs_diff(to.row());
        dc.max(dr)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col = (b'a' + self.col() as u8) as char;
        write!(f, "{}{}", col, self.row() + 1)
    }
}

impl FromStr for Square {
    type Err = LoaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        match bytes {
            [c @ b'a'..=b'h', r @ b'1'..=b'8'] => {
                Ok(Square::new((c - b'a') as usize, (r - b'1') as usize))
            }
            _ => Err(LoaError::InvalidSquare(s.to_string())),
        }
    }
}
