//! Setup - position description loaded from JSON

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Square, BOARD_SIZE};
use crate::error::{LoaError, Result};
use crate::game::{Position, INITIAL_PIECES};
use crate::pieces::Piece;

/// Board layout, side to move and move limit
///
/// `rows` are written top row (row 8) first, one character per cell:
/// `b`, `w` or `-`. Spaces are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    #[serde(default = "default_name")]
    pub name: String,
    pub rows: Vec<String>,
    pub turn: Piece,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_limit: Option<usize>,
}

fn default_name() -> String {
    "unnamed".to_string()
}

impl Setup {
    /// The standard starting layout
    pub fn standard() -> Self {
        let rows = INITIAL_PIECES
            .iter()
            .rev()
            .map(|row| row.iter().map(|p| p.abbrev()).collect::<String>())
            .collect();
        Self {
            name: "standard".to_string(),
            rows,
            turn: Piece::Black,
            move_limit: None,
        }
    }

    /// Describe an existing position (history is not recorded)
    pub fn from_position(name: &str, position: &Position) -> Self {
        let rows = (0..BOARD_SIZE)
            .rev()
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| position.get(Square::new(col, row)).abbrev())
                    .collect::<String>()
            })
            .collect();
        Self {
            name: name.to_string(),
            rows,
            turn: position.turn(),
            move_limit: Some(position.move_limit()),
        }
    }

    /// Convert to a Position
    pub fn to_position(&self) -> Result<Position> {
        if self.turn.is_empty() {
            return Err(LoaError::EmptyTurn);
        }
        if self.rows.len() != BOARD_SIZE {
            return Err(LoaError::BadDimensions {
                expected: BOARD_SIZE,
                got: self.rows.len(),
            });
        }

        let mut contents = [[Piece::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (i, line) in self.rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != BOARD_SIZE {
                return Err(LoaError::BadDimensions {
                    expected: BOARD_SIZE,
                    got: cells.len(),
                });
            }
            let row = BOARD_SIZE - 1 - i;
            for (col, &c) in cells.iter().enumerate() {
                contents[row][col] = Piece::from_char(c)?;
            }
        }

        let mut position = Position::from_rows(&contents, self.turn);
        if let Some(limit) = self.move_limit {
            position.set_move_limit(limit);
        }
        Ok(position)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let setup = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(setup)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self::standard()
    }
}
