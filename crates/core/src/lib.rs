//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and the fair
//! dealer. It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for AI training)
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//! - **Fast**: Copy-on-write boards and zero-allocation hot paths
//!
//! # Module Structure
//!
//! - [`board`]: 8x8 game board with fit checks, stamping, and line clearing
//! - [`dealer`]: Fair three-piece deals backed by an exact joint-placement solver
//! - [`placement`]: Anchor enumeration shared by the dealer and stuck detection
//! - [`session`]: Complete game session including scoring, streaks, and re-deals
//! - [`shapes`]: The 17-entry shape catalog with tight bounding boxes
//! - [`rng`]: Small deterministic generator behind the `RandomSource` trait
//! - [`scoring`]: Clear scoring with streak multipliers and praise tiers
//!
//! # Game Rules
//!
//! This implementation follows the classic 8x8 block puzzle formula:
//!
//! - **Fair Deals**: Every batch of three shapes is jointly placeable at the
//!   moment it is dealt, verified by exhaustive backtracking
//! - **No Gravity**: Pieces sit where they are placed; nothing falls
//! - **Line Clears**: Full rows and full columns clear simultaneously, and a
//!   cell at a row/column crossing counts once
//! - **Streaks**: Consecutive clearing placements grow the multiplier by 0.1;
//!   a quiet placement resets it to 1.0
//! - **Game Over**: The game ends when the dealer cannot produce a fair batch
//!   or none of the remaining pieces fits anywhere
//!
//! # Example
//!
//! ```
//! use block_breeze_core::{enumerate_placements, GameSession};
//!
//! // Create and start a session
//! let mut game = GameSession::new(12345);
//! game.start();
//! assert!(game.playable());
//!
//! // Place the first piece of the batch at its first legal anchor
//! let piece = game.batch().unwrap().pieces()[0];
//! let spot = enumerate_placements(game.board(), piece.shape.shape())[0];
//! let report = game.place(0, spot.row, spot.col).unwrap();
//! assert_eq!(report.new_score, game.score());
//! ```

pub mod board;
pub mod dealer;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod shapes;
pub mod snapshot;

pub use block_breeze_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use dealer::{deal_fair, find_joint_placement, Assignment, DealBatch, DealPiece};
pub use placement::{enumerate_placements, fits_anywhere};
pub use rng::{RandomSource, SimpleRng};
pub use scoring::{clear_score, streak_multiplier};
pub use session::{GameSession, PlaceError};
pub use shapes::{catalog, random_shape, Shape, ShapeId};
pub use snapshot::{GameSnapshot, PieceSnapshot};
