//! Cell contents and sides

use serde::{Deserialize, Serialize};

use crate::error::LoaError;

/// Contents of a cell; `Black` and `White` double as the two sides
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    Black,
    White,
    #[default]
    Empty,
}

impl Piece {
    /// The other side. Empty stays empty.
    pub fn opposite(self) -> Self {
        match self {
            Piece::Black => Piece::White,
            Piece::White => Piece::Black,
            Piece::Empty => Piece::Empty,
        }
    }

    /// Single-character board abbreviation
    pub fn abbrev(self) -> &'static str {
        match self {
            Piece::Black => "b",
            Piece::White => "w",
            Piece::Empty => "-",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Piece::Black => "Black",
            Piece::White => "White",
            Piece::Empty => "-",
        }
    }

    pub fn is_empty(self) -> bool {
        self == Piece::Empty
    }

    /// Parse a board character (`b`, `w`, `-`, case-insensitive)
    pub fn from_char(c: char) -> Result<Self, LoaError> {
        match c.to_ascii_lowercase() {
            'b' => Ok(Piece::Black),
            'w' => Ok(Piece::White),
            '-' | '.' => Ok(Piece::Empty),
            _ => Err(LoaError::InvalidPiece(c)),
        }
    }
}
