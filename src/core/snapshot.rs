//! Read-only snapshot types for render consumers.
//!
//! Plain values taken between ticks; a board is never observed in a
//! partially-locked state.

use crate::core::pieces::Piece;
use crate::types::{Cell, PieceKind, SessionState, Side, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl From<Piece> for PieceSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

impl PieceSnapshot {
    /// Absolute occupied cells of the snapshotted piece.
    pub fn cells(&self) -> arrayvec::ArrayVec<(i8, i8), { crate::core::pieces::MAX_PIECE_CELLS }> {
        Piece {
            kind: self.kind,
            rotation: self.rotation,
            x: self.x,
            y: self.y,
        }
        .cells()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub grid: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub current: Option<PieceSnapshot>,
    pub queued: Option<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub rainbow: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub human: BoardSnapshot,
    pub machine: BoardSnapshot,
    pub state: SessionState,
    pub winner: Option<Side>,
    /// Session clock, used by the view to animate the rainbow effect.
    pub now_ms: u64,
}

impl SessionSnapshot {
    pub fn board(&self, side: Side) -> &BoardSnapshot {
        match side {
            Side::Human => &self.human,
            Side::Machine => &self.machine,
        }
    }
}
