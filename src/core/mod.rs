//! Core module - pure game logic with no external dependencies
//!
//! This module contains all the board rules, piece geometry, scoring, and
//! state management. It has zero dependencies on UI, timing, or I/O.

pub mod board;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

// Re-export commonly used types
pub use board::{Board, LockOutcome};
pub use pieces::{rotation_count, rotation_states, Piece};
pub use rng::SimpleRng;
pub use snapshot::{BoardSnapshot, PieceSnapshot, SessionSnapshot};
