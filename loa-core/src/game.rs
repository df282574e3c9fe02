//! Position state, move generation and terminal detection

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{opposite_direction, Square, ALL_SQUARES, BOARD_SIZE, NUM_DIRECTIONS};
use crate::error::LoaError;
use crate::pieces::Piece;
use crate::pieces::Piece::{Black as BP, Empty as EMP, White as WP};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Moves (both sides together) after which an unconnected game is a tie
pub const DEFAULT_MOVE_LIMIT: usize = 60;

const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// The standard starting layout, bottom row (row 1) first
pub const INITIAL_PIECES: [[Piece; BOARD_SIZE]; BOARD_SIZE] = [
    [EMP, BP, BP, BP, BP, BP, BP, EMP],
    [WP, EMP, EMP, EMP, EMP, EMP, EMP, WP],
    [WP, EMP, EMP, EMP, EMP, EMP, EMP, WP],
    [WP, EMP, EMP, EMP, EMP, EMP, EMP, WP],
    [WP, EMP, EMP, EMP, EMP, EMP, EMP, WP],
    [WP, EMP, EMP, EMP, EMP, EMP, EMP, WP],
    [WP, EMP, EMP, EMP, EMP, EMP, EMP, WP],
    [EMP, BP, BP, BP, BP, BP, BP, EMP],
];

// ============================================================================
// CORE TYPES
// ============================================================================

/// A move from one square to another.
///
/// `capture` is filled in by [`Position::apply`] and only matters for undo;
/// equality and hashing look at `from` and `to` alone.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    #[serde(default)]
    pub capture: bool,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to, capture: false }
    }

    pub fn is_capture(&self) -> bool {
        self.capture
    }

    fn with_capture(self, capture: bool) -> Self {
        Self { capture, ..self }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = LoaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LoaError::InvalidMove(s.to_string());
        let (from, to) = s.trim().split_once('-').ok_or_else(invalid)?;
        let from = from.trim().parse().map_err(|_| invalid())?;
        let to = to.trim().parse().map_err(|_| invalid())?;
        Ok(Move::new(from, to))
    }
}

/// Outcome of a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    /// All of this side's pieces form one cluster
    Side(Piece),
    /// Move limit reached with neither side connected
    Tie,
}

/// Cluster sizes per side, largest first
#[derive(Clone, Debug, Default)]
struct Regions {
    white: Vec<usize>,
    black: Vec<usize>,
}

// ============================================================================
// POSITION
// ============================================================================

/// Board contents plus the undo history (mutate in place with apply/undo)
#[derive(Clone, Debug)]
pub struct Position {
    cells: [Piece; NUM_SQUARES],
    turn: Piece,
    history: Vec<Move>,
    move_limit: usize,

    /// Lazily computed; reset on every mutation
    winner: OnceCell<Option<Winner>>,
    regions: OnceCell<Regions>,
}

impl Position {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard starting layout, Black to move
    pub fn new() -> Self {
        Self::from_rows(&INITIAL_PIECES, Piece::Black)
    }

    /// Position with `contents[row][col]`, bottom row first, and `turn` to move
    pub fn from_rows(contents: &[[Piece; BOARD_SIZE]; BOARD_SIZE], turn: Piece) -> Self {
        let mut position = Self {
            cells: [Piece::Empty; NUM_SQUARES],
            turn,
            history: Vec::new(),
            move_limit: DEFAULT_MOVE_LIMIT,
            winner: OnceCell::new(),
            regions: OnceCell::new(),
        };
        position.initialize(contents, turn);
        position
    }

    /// Reset to `contents` with `turn` to move, clearing history and move limit
    pub fn initialize(&mut self, contents: &[[Piece; BOARD_SIZE]; BOARD_SIZE], turn: Piece) {
        debug_assert!(!turn.is_empty(), "side to move must be black or white");
        for (row, cells) in contents.iter().enumerate() {
            for (col, &piece) in cells.iter().enumerate() {
                self.cells[Square::new(col, row).index()] = piece;
            }
        }
        self.turn = turn;
        self.move_limit = DEFAULT_MOVE_LIMIT;
        self.history.clear();
        self.invalidate();
    }

    /// Back to the standard starting layout
    pub fn clear(&mut self) {
        self.initialize(&INITIAL_PIECES, Piece::Black);
    }

    /// Overwrite this position with a copy of `other`
    pub fn copy_from(&mut self, other: &Position) {
        if std::ptr::eq(self, other) {
            return;
        }
        self.cells = other.cells;
        self.history.clone_from(&other.history);
        self.turn = other.turn;
        self.move_limit = other.move_limit;
        self.invalidate();
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn get(&self, sq: Square) -> Piece {
        self.cells[sq.index()]
    }

    /// Put `piece` on `sq`; if `next` is given it becomes the side to move
    pub fn set(&mut self, sq: Square, piece: Piece, next: Option<Piece>) {
        self.cells[sq.index()] = piece;
        if let Some(next) = next {
            self.turn = next;
        }
        self.invalidate();
    }

    /// Side to move
    pub fn turn(&self) -> Piece {
        self.turn
    }

    pub fn move_limit(&self) -> usize {
        self.move_limit
    }

    pub fn set_move_limit(&mut self, limit: usize) {
        self.move_limit = limit;
        self.invalidate();
    }

    /// Number of applied, unretracted moves
    pub fn moves_made(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Occupied squares in canonical order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        ALL_SQUARES
            .iter()
            .map(|&sq| (sq, self.get(sq)))
            .filter(|(_, piece)| !piece.is_empty())
    }

    pub fn piece_count(&self, side: Piece) -> usize {
        self.pieces().filter(|&(_, piece)| piece == side).count()
    }

    fn invalidate(&mut self) {
        self.winner.take();
        self.regions.take();
    }

    // ========================================================================
    // MOVE LEGALITY
    // ========================================================================

    /// True iff `from`-`to` is a legal move for the side to move
    pub fn is_legal(&self, from: Square, to: Square) -> bool {
        let Some(dir) = from.direction_to(to) else {
            return false;
        };
        if self.blocked(from, to, dir) {
            return false;
        }
        from.move_dest(dir, self.line_of_action(from, dir)) == Some(to)
    }

    /// Like [`Position::is_legal`]; the capture tag is ignored
    pub fn is_legal_move(&self, mv: &Move) -> bool {
        self.is_legal(mv.from, mv.to)
    }

    /// Pieces on the whole line through `from` along `dir`
    pub fn line_of_action(&self, from: Square, dir: usize) -> usize {
        (self.count_occupied(from, dir) + self.count_occupied(from, opposite_direction(dir)))
            .saturating_sub(1)
    }

    /// Occupied cells from `from` (inclusive) to the edge in `dir`
    fn count_occupied(&self, from: Square, dir: usize) -> usize {
        let mut count = 0;
        let mut sq = Some(from);
        while let Some(s) = sq {
            if !self.get(s).is_empty() {
                count += 1;
            }
            sq = s.step(dir);
        }
        count
    }

    /// Friendly piece on `to`, or an enemy piece strictly between
    fn blocked(&self, from: Square, to: Square, dir: usize) -> bool {
        if self.get(to) == self.turn {
            return true;
        }
        let enemy = self.turn.opposite();
        let mut sq = from.step(dir);
        while let Some(s) = sq {
            if s == to {
                break;
            }
            if self.get(s) == enemy {
                return true;
            }
            sq = s.step(dir);
        }
        false
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All legal moves, sources then destinations in canonical square order
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for &from in ALL_SQUARES.iter() {
            if self.get(from) != self.turn {
                continue;
            }
            self.generate_piece_moves(from, &mut moves);
        }
        moves
    }

    fn generate_piece_moves(&self, from: Square, moves: &mut Vec<Move>) {
        let start = moves.len();
        // Opposite directions share a line, so count each line once
        let mut lengths = [0usize; NUM_DIRECTIONS];
        for dir in 0..NUM_DIRECTIONS / 2 {
            let length = self.line_of_action(from, dir);
            lengths[dir] = length;
            lengths[opposite_direction(dir)] = length;
        }

        for (dir, &length) in lengths.iter().enumerate() {
            let Some(to) = from.move_dest(dir, length) else {
                continue;
            };
            if !self.blocked(from, to, dir) {
                moves.push(Move::new(from, to));
            }
        }

        moves[start..].sort_unstable_by_key(|mv| mv.to.index());
    }

    // ========================================================================
    // APPLY / UNDO
    // ========================================================================

    /// Make `mv`, which must be legal. The capture tag is computed here.
    pub fn apply(&mut self, mv: Move) {
        debug_assert!(self.is_legal_move(&mv), "illegal move {mv}");
        let capture = !self.get(mv.to).is_empty();
        self.history.push(mv.with_capture(capture));
        self.cells[mv.from.index()] = Piece::Empty;
        self.cells[mv.to.index()] = self.turn;
        self.turn = self.turn.opposite();
        self.invalidate();
    }

    /// Retract the last move. Requires `moves_made() > 0`.
    pub fn undo_last(&mut self) {
        let last = self.history.pop().expect("undo_last with no moves made");
        let mover = self.turn.opposite();
        self.cells[last.to.index()] = if last.capture { self.turn } else { Piece::Empty };
        self.cells[last.from.index()] = mover;
        self.turn = mover;
        self.invalidate();
    }

    // ========================================================================
    // TERMINAL DETECTION
    // ========================================================================

    /// Result of the game, or None while it is still going
    pub fn winner(&self) -> Option<Winner> {
        *self.winner.get_or_init(|| {
            let black = self.pieces_connected(Piece::Black);
            let white = self.pieces_connected(Piece::White);
            if self.moves_made() >= self.move_limit && !black && !white {
                Some(Winner::Tie)
            } else if black && white {
                // The side that just moved completed both clusters
                Some(Winner::Side(self.turn.opposite()))
            } else if black {
                Some(Winner::Side(Piece::Black))
            } else if white {
                Some(Winner::Side(Piece::White))
            } else {
                None
            }
        })
    }

    pub fn game_over(&self) -> bool {
        self.winner().is_some()
    }

    /// True iff all of `side`'s pieces form exactly one cluster
    pub fn pieces_connected(&self, side: Piece) -> bool {
        self.region_sizes(side).len() == 1
    }

    /// Sizes of `side`'s 8-connected clusters, largest first
    pub fn region_sizes(&self, side: Piece) -> &[usize] {
        let regions = self.regions.get_or_init(|| self.compute_regions());
        match side {
            Piece::White => &regions.white,
            Piece::Black => &regions.black,
            Piece::Empty => &[],
        }
    }

    fn compute_regions(&self) -> Regions {
        let mut regions = Regions::default();
        let mut visited = [false; NUM_SQUARES];
        let mut stack = Vec::with_capacity(NUM_SQUARES);

        for &sq in ALL_SQUARES.iter() {
            let side = self.get(sq);
            if visited[sq.index()] || side.is_empty() {
                continue;
            }
            let size = self.flood_fill(sq, side, &mut visited, &mut stack);
            match side {
                Piece::White => regions.white.push(size),
                Piece::Black => regions.black.push(size),
                Piece::Empty => unreachable!(),
            }
        }

        regions.white.sort_unstable_by(|a, b| b.cmp(a));
        regions.black.sort_unstable_by(|a, b| b.cmp(a));
        regions
    }

    /// Size of the unvisited `side` cluster containing `start`
    fn flood_fill(
        &self,
        start: Square,
        side: Piece,
        visited: &mut [bool; NUM_SQUARES],
        stack: &mut Vec<Square>,
    ) -> usize {
        let mut size = 0;
        visited[start.index()] = true;
        stack.push(start);
        while let Some(sq) = stack.pop() {
            size += 1;
            for adj in sq.adjacent().into_iter().flatten() {
                if !visited[adj.index()] && self.get(adj) == side {
                    visited[adj.index()] = true;
                    stack.push(adj);
                }
            }
        }
        size
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// Equal iff cells and side to move match; history and caches are ignored
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells && self.turn == other.turn
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
        self.turn.hash(state);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===")?;
        for row in (0..BOARD_SIZE).rev() {
            write!(f, "    ")?;
            for col in 0..BOARD_SIZE {
                write!(f, "{} ", self.get(Square::new(col, row)).abbrev())?;
            }
            writeln!(f)?;
        }
        writeln!(f, "Next move: {}", self.turn.full_name())?;
        write!(f, "===")
    }
}

// ============================================================================
// TESTS
// ============================================================================
