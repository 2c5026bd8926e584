//! Pieces module - shape tables and the falling piece value type
//!
//! Each kind maps to an ordered list of rotation states; each state is a
//! fixed list of (column, row) offsets relative to the piece anchor. The
//! tables are immutable; only a piece's rotation index and anchor move.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, BOARD_WIDTH};

/// Offset of a single cell relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// Largest cell count of any kind (the star shape).
pub const MAX_PIECE_CELLS: usize = 6;

const I_STATES: [&[MinoOffset]; 2] = [
    &[(0, 0), (0, 1), (0, 2), (0, 3)],
    &[(0, 0), (1, 0), (2, 0), (3, 0)],
];

const J_STATES: [&[MinoOffset]; 4] = [
    &[(0, 0), (1, 0), (1, 1), (1, 2)],
    &[(0, 0), (0, 1), (1, 0), (2, 0)],
    &[(0, 0), (0, 1), (0, 2), (1, 2)],
    &[(0, 1), (1, 1), (2, 0), (2, 1)],
];

const L_STATES: [&[MinoOffset]; 4] = [
    &[(0, 0), (0, 1), (0, 2), (1, 0)],
    &[(0, 0), (1, 0), (2, 0), (2, 1)],
    &[(1, 0), (1, 1), (1, 2), (0, 2)],
    &[(0, 0), (0, 1), (1, 1), (2, 1)],
];

const O_STATES: [&[MinoOffset]; 1] = [&[(0, 0), (0, 1), (1, 0), (1, 1)]];

const S_STATES: [&[MinoOffset]; 2] = [
    &[(0, 1), (0, 2), (1, 0), (1, 1)],
    &[(0, 0), (1, 0), (1, 1), (2, 1)],
];

const T_STATES: [&[MinoOffset]; 4] = [
    &[(0, 1), (1, 0), (1, 1), (1, 2)],
    &[(0, 0), (1, 0), (2, 0), (1, 1)],
    &[(0, 0), (0, 1), (0, 2), (1, 1)],
    &[(1, 0), (0, 1), (1, 1), (2, 1)],
];

const Z_STATES: [&[MinoOffset]; 2] = [
    &[(0, 0), (0, 1), (1, 1), (1, 2)],
    &[(0, 1), (1, 0), (1, 1), (2, 0)],
];

const HEART_STATES: [&[MinoOffset]; 1] = [&[(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)]];

const STAR_STATES: [&[MinoOffset]; 1] = [&[(0, 1), (1, 0), (1, 1), (1, 2), (2, 0), (2, 2)]];

/// Rotation states for a kind, in rotation order.
pub fn rotation_states(kind: PieceKind) -> &'static [&'static [MinoOffset]] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::Heart => &HEART_STATES,
        PieceKind::Star => &STAR_STATES,
    }
}

/// Number of distinct rotation states for a kind.
pub fn rotation_count(kind: PieceKind) -> u8 {
    rotation_states(kind).len() as u8
}

/// Spawn anchor for new pieces (x, y)
pub const SPAWN_POSITION: (i8, i8) = (BOARD_WIDTH as i8 / 2 - 1, 0);

/// Active falling piece: immutable shape, mutable rotation index and anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a new piece at the spawn anchor
    pub fn new(kind: PieceKind) -> Self {
        let (x, y) = SPAWN_POSITION;
        Self {
            kind,
            rotation: 0,
            x,
            y,
        }
    }

    /// Cell offsets of the active rotation state
    pub fn offsets(&self) -> &'static [MinoOffset] {
        let states = rotation_states(self.kind);
        states[self.rotation as usize % states.len()]
    }

    /// Absolute occupied cells: anchor + active state offsets
    pub fn cells(&self) -> ArrayVec<(i8, i8), MAX_PIECE_CELLS> {
        self.offsets()
            .iter()
            .map(|&(dx, dy)| (self.x + dx, self.y + dy))
            .collect()
    }

    /// Advance to the next rotation state (modulo the state count).
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 1) % rotation_count(self.kind);
    }

    pub fn translate(&mut self, dx: i8, dy: i8) {
        self.x += dx;
        self.y += dy;
    }
}
