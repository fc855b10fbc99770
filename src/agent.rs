use crate::board::{Move, PawnBoard, Side};
use crate::search::SearchEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stalemate fallback strings, kept verbatim from the reference behavior.
/// Known gap: in some positions these are themselves illegal; callers that
/// care must validate before applying.
const WHITE_FALLBACK: &str = "a2a3";
const BLACK_FALLBACK: &str = "a7a6";

/// Thin adapter between the search engine and algebraic-notation callers.
///
/// Owns one [`SearchEngine`] (one agent per side) and a seedable RNG for the
/// rare fallback path, so fallback behavior is reproducible under test.
pub struct Agent {
    engine: SearchEngine,
    rng: StdRng,
}

impl Agent {
    /// Agent with a total game time budget in minutes
    pub fn new(total_time_minutes: u64) -> Self {
        Self {
            engine: SearchEngine::new(total_time_minutes),
            rng: StdRng::from_entropy(),
        }
    }

    /// Agent with deterministic fallback selection
    pub fn with_seed(total_time_minutes: u64, seed: u64) -> Self {
        Self {
            engine: SearchEngine::new(total_time_minutes),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose a move for `side` and render it in algebraic notation.
    ///
    /// A search that comes back empty is disambiguated: no legal moves at all
    /// yields the fixed fallback string, while moves-exist-but-none-chosen is
    /// resolved by a uniform random pick among the real legal moves so a
    /// latent engine bug never masquerades as a game-ending condition.
    pub fn get_move(&mut self, board: &PawnBoard, side: Side) -> String {
        if let Some(mv) = self.engine.get_best_move(board, side) {
            return mv.to_algebraic();
        }

        let all_moves = board.moves_for(side);
        if all_moves.is_empty() {
            log::warn!("no legal moves for {:?}; using fixed fallback", side);
            return match side {
                Side::White => WHITE_FALLBACK.to_string(),
                Side::Black => BLACK_FALLBACK.to_string(),
            };
        }

        log::warn!(
            "search returned no move but {} exist; picking one at random",
            all_moves.len()
        );
        let pick = self.rng.gen_range(0..all_moves.len());
        all_moves[pick].to_algebraic()
    }

    /// The best move as coordinates, for callers that apply moves themselves
    pub fn get_best_move(&mut self, board: &PawnBoard, side: Side) -> Option<Move> {
        self.engine.get_best_move(board, side)
    }

    /// Seconds left in this agent's game budget
    pub fn remaining_time(&self) -> f64 {
        self.engine.remaining_time()
    }
}
