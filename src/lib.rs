//! # Two Flags Engine
//!
//! Decision engine for the Two Flags game, a pawns-only capture/race variant
//! on an 8x8 grid: each side advances pawns toward the opposing edge and wins
//! by reaching the far rank, eliminating every enemy pawn, or leaving the
//! opponent without a legal move.
//!
//! ## Features
//!
//! - **Board model**: full rule set including double steps, diagonal
//!   captures, en passant, and win detection
//! - **Static evaluation**: eight weighted heuristics (material, advancement,
//!   center control, structure, mobility, safety, attacking, breakthrough)
//! - **Time-bounded search**: iterative-deepening alpha-beta with
//!   principal-variation move ordering, a transposition cache, and a
//!   per-game wall-clock budget
//! - **Agent facade**: algebraic-notation surface with validated fallbacks
//!
//! ## Quick Start
//!
//! ```rust
//! use two_flags_engine::{Agent, PawnBoard, Side};
//!
//! // One agent per side, 30 minutes of total thinking time
//! let mut agent = Agent::new(30);
//!
//! // Lone pawn one step from the goal rank: the winning push is found
//! let mut board = PawnBoard::empty();
//! board.set_piece(1, 3, Some(Side::White));
//! let notation = agent.get_move(&board, Side::White);
//! assert_eq!(notation, "d7d8");
//! ```
//!
//! Rendering, networking, clocks, and argument parsing live outside this
//! crate; collaborators consume the engine through a board value, a
//! "get best move" call, and an "apply move" call.

pub mod agent;
pub mod board;
pub mod errors;
pub mod evaluation;
pub mod search;

pub use agent::Agent;
pub use board::{Move, MoveOutcome, PawnBoard, Side};
pub use errors::EngineError;
pub use evaluation::{EvalWeights, Evaluator};
pub use search::SearchEngine;
