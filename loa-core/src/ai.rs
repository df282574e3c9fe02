//! Fixed-depth alpha-beta search

use serde::{Deserialize, Serialize};

use crate::eval::{heuristic_est, static_eval, INFTY, MAXIMIZING_SIDE, WINNING_VALUE};
use crate::game::{Move, Position, Winner};
use crate::pieces::Piece;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Plies searched per decision
pub const DEFAULT_DEPTH: u32 = 3;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// How a node's best-so-far value is tracked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
    /// Best-so-far is the recursively searched value (plain minimax)
    #[default]
    Minimax,
    /// Best-so-far is the raw heuristic right after the candidate move,
    /// while acceptance and pruning use the recursive value. Ties on the
    /// recursive value replace the earlier candidate. Leaves return a win
    /// sentinel for a decided game, else the best one-ply heuristic.
    Immediate,
}

/// Search settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    pub depth: u32,
    #[serde(default)]
    pub scoring: Scoring,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            scoring: Scoring::default(),
        }
    }
}

/// Counters from the last search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

/// Move chosen by a search and its value (White positive)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub value: i32,
}

// ============================================================================
// MACHINE PLAYER
// ============================================================================

/// Computer player. White maximises the evaluation, Black minimises it.
#[derive(Clone, Debug, Default)]
pub struct MachinePlayer {
    pub config: SearchConfig,
    stats: SearchStats,
    found_move: Option<Move>,
}

impl MachinePlayer {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            stats: SearchStats::default(),
            found_move: None,
        }
    }

    pub fn with_depth(depth: u32) -> Self {
        Self::new(SearchConfig {
            depth,
            ..SearchConfig::default()
        })
    }

    /// Pick a move for the side to move. None if the game is over or there
    /// is nothing to play.
    pub fn choose_move(&mut self, position: &Position) -> Option<Move> {
        self.search(position).best_move
    }

    /// Search `position` on a private copy; the caller's position is untouched
    pub fn search(&mut self, position: &Position) -> SearchResult {
        self.stats = SearchStats::default();
        self.found_move = None;

        if position.game_over() {
            return SearchResult {
                best_move: None,
                value: static_eval(position),
            };
        }

        let mut work = position.clone();
        let sense = if work.turn() == MAXIMIZING_SIDE { 1 } else { -1 };
        let depth = self.config.depth.max(1);
        let value = self.find_move(&mut work, depth, true, sense, -INFTY, INFTY);
        debug_assert_eq!(work, *position);

        tracing::debug!(
            side = work.turn().full_name(),
            best_move = ?self.found_move.map(|m| m.to_string()),
            value,
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            "search finished"
        );

        SearchResult {
            best_move: self.found_move,
            value,
        }
    }

    /// Counters from the most recent search
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Value of `board` searched `depth` plies. Records the best move in
    /// `found_move` iff `save_move`. `sense` is 1 where White moves, -1
    /// where Black does.
    fn find_move(
        &mut self,
        board: &mut Position,
        depth: u32,
        save_move: bool,
        sense: i32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.stats.nodes += 1;

        let scoring = self.config.scoring;
        if depth == 0 || board.game_over() {
            return match scoring {
                Scoring::Minimax => static_eval(board),
                Scoring::Immediate => self.scan_replies(board, sense, alpha, beta),
            };
        }

        let mut best = -sense * INFTY;

        for mv in board.legal_moves() {
            board.apply(mv);
            let immediate = match scoring {
                Scoring::Immediate => heuristic_est(board),
                Scoring::Minimax => 0,
            };
            let response = self.find_move(board, depth - 1, false, -sense, alpha, beta);
            board.undo_last();

            let improved = match scoring {
                Scoring::Minimax => sense * response > sense * best,
                Scoring::Immediate => sense * response >= sense * best,
            };

            if improved {
                best = match scoring {
                    Scoring::Minimax => response,
                    Scoring::Immediate => immediate,
                };
                if save_move {
                    self.found_move = Some(mv);
                }
                if sense == 1 {
                    alpha = alpha.max(response);
                } else {
                    beta = beta.min(response);
                }
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                tracing::trace!(depth, %mv, alpha, beta, "cutoff");
                break;
            }
        }

        best
    }

    /// Leaf value under `Scoring::Immediate`: the win sentinel if a side has
    /// won, otherwise the best heuristic one move ahead. A tie is not a
    /// sentinel here, its replies are scanned like any other position.
    fn scan_replies(
        &mut self,
        board: &mut Position,
        sense: i32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        match board.winner() {
            Some(Winner::Side(Piece::White)) => return WINNING_VALUE,
            Some(Winner::Side(_)) => return -WINNING_VALUE,
            _ => {}
        }

        let mut best = -sense * INFTY;
        for mv in board.legal_moves() {
            board.apply(mv);
            let next = heuristic_est(board);
            board.undo_last();

            if sense * next >= sense * best {
                best = next;
                if sense == 1 {
                    alpha = alpha.max(next);
                } else {
                    beta = beta.min(next);
                }
            }
            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }
        best
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Square, ALL_SQUARES, BOARD_SIZE};
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn position_with(white: &[&str], black: &[&str], turn: Piece) -> Position {
        let mut pos = Position::from_rows(&[[Piece::Empty; BOARD_SIZE]; BOARD_SIZE], turn);
        for s in white {
            pos.set(sq(s), Piece::White, None);
        }
        for s in black {
            pos.set(sq(s), Piece::Black, None);
        }
        pos
    }

    /// Plain minimax over the full tree; first strictly better move wins ties
    fn brute_force(pos: &mut Position, depth: u32) -> (i32, Option<Move>) {
        if depth == 0 || pos.game_over() {
            return (static_eval(pos), None);
        }
        let maximizing = pos.turn() == MAXIMIZING_SIDE;
        let mut best = if maximizing { -INFTY } else { INFTY };
        let mut best_move = None;
        for mv in pos.legal_moves() {
            pos.apply(mv);
            let (value, _) = brute_force(pos, depth - 1);
            pos.undo_last();
            let better = if maximizing { value > best } else { value < best };
            if better {
                best = value;
                best_move = Some(mv);
            }
        }
        (best, best_move)
    }

    /// Step-by-step rendition of the parity search: one-ply heuristic kept as
    /// best-so-far, ties accepted, leaves scan one move ahead
    fn parity_search(
        pos: &mut Position,
        depth: u32,
        sense: i32,
        mut alpha: i32,
        mut beta: i32,
        found: &mut Option<Move>,
        save: bool,
    ) -> i32 {
        if depth == 0 || pos.game_over() {
            match pos.winner() {
                Some(Winner::Side(Piece::Black)) => return -WINNING_VALUE,
                Some(Winner::Side(Piece::White)) => return WINNING_VALUE,
                _ => {}
            }
            let mut best = if sense == 1 { -INFTY } else { INFTY };
            for mv in pos.legal_moves() {
                pos.apply(mv);
                let next = heuristic_est(pos);
                pos.undo_last();
                if sense == 1 && next >= best {
                    best = next;
                    alpha = alpha.max(next);
                } else if sense == -1 && next <= best {
                    best = next;
                    beta = beta.min(next);
                }
                if beta <= alpha {
                    break;
                }
            }
            return best;
        }

        let mut best = if sense == 1 { -INFTY } else { INFTY };
        for mv in pos.legal_moves() {
            pos.apply(mv);
            let next = heuristic_est(pos);
            let response = parity_search(pos, depth - 1, -sense, alpha, beta, found, false);
            pos.undo_last();
            if sense == 1 && response >= best {
                if save {
                    *found = Some(mv);
                }
                best = next;
                alpha = alpha.max(response);
            } else if sense == -1 && response <= best {
                if save {
                    *found = Some(mv);
                }
                best = next;
                beta = beta.min(response);
            }
            if beta <= alpha {
                break;
            }
        }
        best
    }

    fn parity_choice(pos: &Position, depth: u32) -> (i32, Option<Move>) {
        let sense = if pos.turn() == Piece::White { 1 } else { -1 };
        let mut found = None;
        let value = parity_search(&mut pos.clone(), depth, sense, -INFTY, INFTY, &mut found, true);
        (value, found)
    }

    fn immediate(depth: u32) -> MachinePlayer {
        MachinePlayer::new(SearchConfig {
            depth,
            scoring: Scoring::Immediate,
        })
    }

    /// A sparse random position that is not already decided
    fn random_position(rng: &mut ChaCha8Rng) -> Position {
        loop {
            let mut squares = ALL_SQUARES.to_vec();
            squares.shuffle(rng);
            let white = rng.gen_range(3..=5);
            let black = rng.gen_range(3..=5);
            let turn = if rng.gen_bool(0.5) { Piece::White } else { Piece::Black };
            let mut pos = Position::from_rows(&[[Piece::Empty; BOARD_SIZE]; BOARD_SIZE], turn);
            for &s in &squares[..white] {
                pos.set(s, Piece::White, None);
            }
            for &s in &squares[white..white + black] {
                pos.set(s, Piece::Black, None);
            }
            if !pos.game_over() && !pos.legal_moves().is_empty() {
                return pos;
            }
        }
    }

    #[test]
    fn test_initial_move_is_legal_and_repeatable() {
        let pos = Position::new();
        let mut ai = MachinePlayer::default();
        let first = ai.choose_move(&pos).unwrap();
        assert!(pos.is_legal_move(&first));
        assert_eq!(first, "c1-c3".parse().unwrap());
        assert!(ai.stats().nodes > 0);

        let second = ai.choose_move(&pos).unwrap();
        assert_eq!(first, second);
        let mut other = MachinePlayer::default();
        assert_eq!(other.choose_move(&pos), Some(first));
    }

    #[test]
    fn test_search_leaves_caller_position_alone() {
        let mut pos = Position::new();
        pos.apply("b1-b3".parse().unwrap());
        let before = pos.clone();
        let mut ai = MachinePlayer::with_depth(2);
        ai.choose_move(&pos);
        assert_eq!(pos, before);
        assert_eq!(pos.moves_made(), 1);
    }

    #[test]
    fn test_finds_connecting_move() {
        // a3-b2 joins White's two pieces; Black is spread out
        let pos = position_with(&["a1", "a3"], &["h8", "h6", "f8"], Piece::White);
        let mut ai = MachinePlayer::with_depth(1);
        let result = ai.search(&pos);
        assert_eq!(result.best_move, Some("a3-b2".parse().unwrap()));
        assert_eq!(result.value, WINNING_VALUE);

        // Deeper search also sees a win, but through the earlier a1-c3
        let mut deep = MachinePlayer::default();
        let result = deep.search(&pos);
        assert_eq!(result.value, WINNING_VALUE);
        assert_eq!(result.best_move, Some("a1-c3".parse().unwrap()));
    }

    #[test]
    fn test_black_minimizes() {
        let pos = position_with(&["a1", "c1", "e1"], &["h8", "h6"], Piece::Black);
        let mut ai = MachinePlayer::with_depth(1);
        let result = ai.search(&pos);
        // h6-g7 is the only move that joins Black's pieces
        assert_eq!(result.value, -WINNING_VALUE);
        assert_eq!(result.best_move, Some("h6-g7".parse().unwrap()));
    }

    #[test]
    fn test_game_over_returns_none() {
        let mut pos = Position::new();
        pos.set_move_limit(0);
        let mut ai = MachinePlayer::default();
        let result = ai.search(&pos);
        assert_eq!(result.best_move, None);
        assert_eq!(result.value, 0);
    }

    #[test]
    fn test_alpha_beta_matches_brute_force() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for _ in 0..12 {
            let pos = random_position(&mut rng);
            for depth in 1..=3 {
                let mut ai = MachinePlayer::with_depth(depth);
                let result = ai.search(&pos);
                let (value, best_move) = brute_force(&mut pos.clone(), depth);
                assert_eq!(result.value, value, "depth {depth}\n{pos}");
                assert_eq!(result.best_move, best_move, "depth {depth}\n{pos}");
            }
        }
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let pos = Position::new();
        let mut ai = MachinePlayer::with_depth(2);
        ai.choose_move(&pos);
        let stats = ai.stats();
        // 1 root + 36 children + 36 * 36 grandchildren without pruning
        assert!(stats.nodes < 1 + 36 + 36 * 36);
        assert!(stats.cutoffs > 0);
    }

    #[test]
    fn test_immediate_scoring_returns_legal_move() {
        let pos = Position::new();
        let mut ai = MachinePlayer::new(SearchConfig {
            depth: 3,
            scoring: Scoring::Immediate,
        });
        let mv = ai.choose_move(&pos).unwrap();
        assert!(pos.is_legal_move(&mv));
        assert_eq!(mv, "c1-c3".parse().unwrap());
        assert_eq!(ai.choose_move(&pos), Some(mv));
    }

    #[test]
    fn test_scoring_modes_can_disagree() {
        let pos = position_with(
            &["b3", "e5", "g7", "d7"],
            &["a7", "e1", "a3", "h1", "h4"],
            Piece::Black,
        );
        let mut minimax = MachinePlayer::with_depth(2);
        let result = minimax.search(&pos);
        assert_eq!(result.best_move, Some("e1-g1".parse().unwrap()));
        assert_eq!(result.value, 2);

        let mut immediate = MachinePlayer::new(SearchConfig {
            depth: 2,
            scoring: Scoring::Immediate,
        });
        let result = immediate.search(&pos);
        assert_eq!(result.best_move, Some("e1-c1".parse().unwrap()));
        assert_eq!(result.value, 1);
    }

    #[test]
    fn test_immediate_keeps_raw_heuristic() {
        // a3-b2 wins on the spot, but its stored value is only the heuristic,
        // so the later a3-c5 (also answered by a win) replaces it
        let pos = position_with(&["a1", "a3"], &["h8", "h6", "f8"], Piece::White);
        let result = immediate(1).search(&pos);
        assert_eq!(result.best_move, Some("a3-c5".parse().unwrap()));
        assert_eq!(result.value, 1);

        let result = immediate(1).search(&Position::new());
        assert_eq!(result.best_move, Some("c1-c3".parse().unwrap()));
        assert_eq!(result.value, -1);
    }

    #[test]
    fn test_immediate_matches_step_by_step_search() {
        let mut positions = vec![
            Position::new(),
            position_with(&["a1", "a3"], &["h8", "h6", "f8"], Piece::White),
            position_with(&["a1", "c1", "e1"], &["h8", "h6"], Piece::Black),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        positions.extend((0..10).map(|_| random_position(&mut rng)));

        for pos in &positions {
            for depth in 1..=3 {
                let result = immediate(depth).search(pos);
                let (value, best_move) = parity_choice(pos, depth);
                assert_eq!(result.value, value, "depth {depth}\n{pos}");
                assert_eq!(result.best_move, best_move, "depth {depth}\n{pos}");
            }
        }
    }

    #[test]
    fn test_config_serde() {
        let config: SearchConfig = serde_json::from_str(r#"{"depth": 2}"#).unwrap();
        assert_eq!(config.depth, 2);
        assert_eq!(config.scoring, Scoring::Minimax);

        let config: SearchConfig =
            serde_json::from_str(r#"{"depth": 3, "scoring": "immediate"}"#).unwrap();
        assert_eq!(config.scoring, Scoring::Immediate);
    }
}
