//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Board dimensions
pub const BOARD_WIDTH: u8 = 10;
pub const BOARD_HEIGHT: u8 = 20;

/// Main loop cadence (milliseconds)
pub const TICK_MS: u32 = 16;

/// Fall timing: base delay at level 1, per-level speedup, and the floor the
/// delay never drops below.
pub const BASE_FALL_MS: u32 = 1000;
pub const FALL_STEP_MS: u32 = 50;
pub const FALL_FLOOR_MS: u32 = 100;

/// Global slowdown: fall delay is scaled by 6/5 (20% slower) for a fixed
/// duration, then reverts. The floor above is applied before the scale.
pub const SLOWDOWN_NUMERATOR: u32 = 6;
pub const SLOWDOWN_DENOMINATOR: u32 = 5;
pub const SLOWDOWN_DURATION_MS: u64 = 10_000;

/// Delay between the machine player's search and the execution of its moves.
pub const THINKING_DELAY_MS: u64 = 500;

/// Rainbow display mode: on for a fixed window at a fixed interval.
pub const RAINBOW_INTERVAL_MS: u64 = 120_000;
pub const RAINBOW_DURATION_MS: u64 = 20_000;

/// Line clear scoring: escalating bonus for multi-line clears. A single piece
/// can never clear more than four rows.
pub const LINE_SCORES: [u32; 5] = [0, 50, 150, 250, 500];

/// Flat bonus for locking a special piece, independent of lines cleared.
pub const SPECIAL_PIECE_BONUS: u32 = 100;

/// Points accumulated since the last special piece before the next queued
/// piece is forced to be special.
pub const SPECIAL_PIECE_THRESHOLD: u32 = 3000;

/// Score per level step.
pub const LEVEL_SCORE_STEP: u32 = 1000;

/// Piece kinds: the seven standard tetrominoes plus two special shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
    Heart,
    Star,
}

impl PieceKind {
    /// The seven standard kinds, used for uniform random draws.
    pub const STANDARD: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Bonus-scoring kinds injected at the accumulator threshold.
    pub const SPECIAL: [PieceKind; 2] = [PieceKind::Heart, PieceKind::Star];

    /// The simplest kinds, used for the cross-board gift rule.
    pub const EASY: [PieceKind; 2] = [PieceKind::O, PieceKind::I];

    pub fn is_special(self) -> bool {
        matches!(self, PieceKind::Heart | PieceKind::Star)
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
            PieceKind::Heart => "heart",
            PieceKind::Star => "star",
        }
    }
}

/// Gameplay commands, applicable to the keyboard-driven board only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
}

/// Which of the two boards a timer or effect targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Human,
    Machine,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Machine,
            Side::Machine => Side::Human,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Human => "human",
            Side::Machine => "machine",
        }
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Running,
    Paused,
    Terminated,
}

/// Cell on the board (None = empty, Some = filled with piece kind)
pub type Cell = Option<PieceKind>;
