use crate::board::{Move, PawnBoard, Side};
use crate::evaluation::Evaluator;
use std::collections::HashMap;
use std::time::Instant;

/// Value of a forced win at the search horizon
pub const MAX_SCORE: f32 = 1_000_000.0;
/// Value of a forced loss at the search horizon
pub const MIN_SCORE: f32 = -1_000_000.0;

/// Iterative deepening never goes beyond this many plies
const DEFAULT_MAX_DEPTH: u32 = 20;
/// Fraction of the per-move time slice actually spent searching
const TIME_SAFETY_FACTOR: f64 = 0.85;
/// Deepening stops once the best value is within 10% of a forced win
const NEAR_WIN_FRACTION: f32 = 0.9;

/// Cached search result for a (layout, side-to-move) position
#[derive(Debug, Clone, Copy)]
struct TtEntry {
    depth: u32,
    value: f32,
}

/// Time-bounded iterative-deepening alpha-beta search for one side.
///
/// The engine owns the remaining-time budget for the rest of the game and a
/// transposition table that intentionally survives across `get_best_move`
/// calls. State carries no synchronization; one engine instance serves one
/// side and must be driven from one thread at a time.
pub struct SearchEngine {
    /// Seconds left for all of this side's future moves
    remaining_time: f64,
    transposition_table: HashMap<String, TtEntry>,
    evaluator: Evaluator,
    nodes_visited: u64,
    max_depth_reached: u32,
}

impl SearchEngine {
    /// Create an engine with a total game time budget in minutes
    pub fn new(total_time_minutes: u64) -> Self {
        Self {
            remaining_time: total_time_minutes as f64 * 60.0,
            transposition_table: HashMap::new(),
            evaluator: Evaluator::new(),
            nodes_visited: 0,
            max_depth_reached: 0,
        }
    }

    /// Nodes visited by the most recent `get_best_move` call
    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited
    }

    /// Deepest fully completed iteration of the most recent search
    pub fn max_depth_reached(&self) -> u32 {
        self.max_depth_reached
    }

    /// Seconds left in the game budget
    pub fn remaining_time(&self) -> f64 {
        self.remaining_time
    }

    /// Pick the best move for `side`, spending a slice of the remaining game
    /// budget. Returns `None` only when `side` has no legal move at all.
    ///
    /// The caller's board is never mutated; every candidate is explored on an
    /// independent clone.
    pub fn get_best_move(&mut self, board: &PawnBoard, side: Side) -> Option<Move> {
        let start = Instant::now();
        self.nodes_visited = 0;

        let estimated_moves_left = Self::estimate_remaining_moves(board);
        let time_for_move = (self.remaining_time / (estimated_moves_left + 2) as f64).max(1.0);
        let allowed_time = time_for_move * TIME_SAFETY_FACTOR;

        let all_moves = board.moves_for(side);
        if all_moves.is_empty() {
            return None;
        }
        if all_moves.len() == 1 {
            return Some(all_moves[0]);
        }

        let mut best_move: Option<Move> = None;
        let mut best_value = MIN_SCORE;
        let mut sorted_moves = self.pre_sort_moves(board, side, all_moves.clone());

        'deepening: for depth in 1..=DEFAULT_MAX_DEPTH {
            if start.elapsed().as_secs_f64() >= allowed_time {
                break;
            }

            let mut current_best_move: Option<Move> = None;
            let mut current_best_value = MIN_SCORE;
            let mut alpha = MIN_SCORE;
            let beta = MAX_SCORE;

            // Principal-variation ordering: last depth's winner goes first
            if let Some(pv) = best_move {
                if let Some(pos) = sorted_moves.iter().position(|&m| m == pv) {
                    sorted_moves.remove(pos);
                    sorted_moves.insert(0, pv);
                }
            }

            for &mv in &sorted_moves {
                if start.elapsed().as_secs_f64() >= allowed_time {
                    break;
                }

                let mut child = board.clone();
                child.compute_move(mv, side);

                let value = self.minimax(&child, depth - 1, false, alpha, beta, side);

                if value > current_best_value {
                    current_best_value = value;
                    current_best_move = Some(mv);
                }
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }

            if let Some(mv) = current_best_move {
                if board.is_valid_move(&mv, side) {
                    best_move = Some(mv);
                    best_value = current_best_value;
                    if best_value >= MAX_SCORE * NEAR_WIN_FRACTION {
                        break 'deepening;
                    }
                }
            }

            self.max_depth_reached = depth;
            log::debug!(
                "depth {} done: best {:?} value {:.1} nodes {}",
                depth,
                best_move.map(|m| m.to_algebraic()),
                best_value,
                self.nodes_visited
            );

            // Re-sort with full static evaluation before the next iteration
            if depth < DEFAULT_MAX_DEPTH {
                sorted_moves = self.evaluation_sorted_moves(board, side);
            }
        }

        self.remaining_time -= start.elapsed().as_secs_f64();

        // The board the caller holds is the source of truth; a stale cache
        // hit can surface a move that no longer applies
        if let Some(mv) = best_move {
            if !board.is_valid_move(&mv, side) {
                self.transposition_table.remove(&Self::tt_key(board, side));
                log::warn!(
                    "discarding stale best move {}; falling back to first legal move",
                    mv
                );
                best_move = all_moves
                    .iter()
                    .copied()
                    .find(|m| board.is_valid_move(m, side));
            }
        }

        best_move
    }

    /// Alpha-beta minimax; `maximizing` means `root_side` is to move
    fn minimax(
        &mut self,
        board: &PawnBoard,
        depth: u32,
        maximizing: bool,
        mut alpha: f32,
        mut beta: f32,
        root_side: Side,
    ) -> f32 {
        self.nodes_visited += 1;

        let side_to_move = if maximizing {
            root_side
        } else {
            root_side.opponent()
        };

        // Exact-value cache with no bound tags; a value computed under a
        // different (alpha, beta) window may be returned as-is, occasionally
        // skewing pruning
        let key = Self::tt_key(board, side_to_move);
        if let Some(entry) = self.transposition_table.get(&key) {
            if entry.depth >= depth {
                return entry.value;
            }
        }

        if board.check_win(Side::White) || board.check_win(Side::Black) {
            return self.terminal_value(board, root_side);
        }
        if depth == 0 {
            return self.evaluator.evaluate(board, root_side);
        }

        let moves = board.moves_for(side_to_move);
        if moves.is_empty() {
            return if maximizing { MIN_SCORE } else { MAX_SCORE };
        }
        let moves = self.pre_sort_moves(board, side_to_move, moves);

        let value = if maximizing {
            let mut value = MIN_SCORE;
            for mv in moves {
                let mut child = board.clone();
                child.compute_move(mv, side_to_move);
                value = value.max(self.minimax(&child, depth - 1, false, alpha, beta, root_side));
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        } else {
            let mut value = MAX_SCORE;
            for mv in moves {
                let mut child = board.clone();
                child.compute_move(mv, side_to_move);
                value = value.min(self.minimax(&child, depth - 1, true, alpha, beta, root_side));
                beta = beta.min(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        };

        self.transposition_table.insert(key, TtEntry { depth, value });
        value
    }

    fn terminal_value(&self, board: &PawnBoard, root_side: Side) -> f32 {
        if board.check_win(root_side) {
            MAX_SCORE
        } else if board.check_win(root_side.opponent()) {
            MIN_SCORE
        } else {
            0.0
        }
    }

    /// Light ordering heuristic: captures first, then advancement toward the
    /// goal rank, with a large bonus for reaching it
    fn pre_sort_moves(&self, board: &PawnBoard, side: Side, moves: Vec<Move>) -> Vec<Move> {
        let mut scored: Vec<(Move, i32)> = moves
            .into_iter()
            .map(|mv| {
                let mut score = 0;
                if board.piece_at(mv.to_row, mv.to_col).is_some() {
                    score += 50;
                }
                match side {
                    Side::White => {
                        score += 7 - mv.to_row as i32;
                        if mv.to_row == 0 {
                            score += 100;
                        }
                    }
                    Side::Black => {
                        score += mv.to_row as i32;
                        if mv.to_row == 7 {
                            score += 100;
                        }
                    }
                }
                (mv, score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(mv, _)| mv).collect()
    }

    /// Heavier ordering used between iterations: apply each move and rank by
    /// the actual static evaluation, wins pinned to the front
    fn evaluation_sorted_moves(&self, board: &PawnBoard, side: Side) -> Vec<Move> {
        let moves = board.moves_for(side);
        let mut scored: Vec<(Move, f32)> = moves
            .into_iter()
            .map(|mv| {
                let mut child = board.clone();
                child.compute_move(mv, side);
                let score = if child.check_win(side) {
                    MAX_SCORE
                } else {
                    self.evaluator.evaluate(&child, side)
                };
                (mv, score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(mv, _)| mv).collect()
    }

    fn estimate_remaining_moves(board: &PawnBoard) -> usize {
        (board.total_pawns() * 2).max(6)
    }

    fn tt_key(board: &PawnBoard, side_to_move: Side) -> String {
        format!("{}:{}", side_to_move.as_char(), board.layout_key())
    }
}
