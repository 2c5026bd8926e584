//! Board module - one player's grid, pieces, and rules
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a
//! piece kind. Uses a flat array for better cache locality.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom). A falling piece may extend above the visible grid
//! (negative y); such cells are valid but never written on lock.

use arrayvec::ArrayVec;

use crate::core::pieces::Piece;
use crate::core::rng::SimpleRng;
use crate::core::scoring::{fall_delay_for_level, level_for_score, lock_points, slowed_delay};
use crate::core::snapshot::{BoardSnapshot, PieceSnapshot};
use crate::types::{
    Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, LEVEL_SCORE_STEP, SPECIAL_PIECE_THRESHOLD,
};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// What a lock produced, for score display and cross-board rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub lines_cleared: u32,
    pub score_before: u32,
    pub score_after: u32,
    pub was_special: bool,
}

impl LockOutcome {
    /// True when this lock pushed the score across a multiple of 1000.
    pub fn crossed_level_step(&self) -> bool {
        self.score_after / LEVEL_SCORE_STEP > self.score_before / LEVEL_SCORE_STEP
    }
}

/// One player's board: grid, active and queued pieces, score and speed state.
#[derive(Debug, Clone)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
    current: Option<Piece>,
    queued: Option<Piece>,
    score: u32,
    level: u32,
    fall_delay_ms: u32,
    slowed: bool,
    rainbow: bool,
    /// Points since the last special piece was queued.
    special_accumulator: u32,
    game_over: bool,
    rng: SimpleRng,
}

impl Board {
    /// Create a new empty board with a seeded piece RNG
    pub fn new(seed: u32) -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            current: None,
            queued: None,
            score: 0,
            level: 1,
            fall_delay_ms: fall_delay_for_level(1),
            slowed: false,
            rainbow: false,
            special_accumulator: 0,
            game_over: false,
            rng: SimpleRng::new(seed),
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether a piece cell may occupy (x, y): inside the side and bottom
    /// walls, and over an empty grid cell. Rows above the visible grid are
    /// open so pieces can spawn partially off-screen.
    fn cell_open(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        if y < 0 {
            return true;
        }
        self.cells[(y as usize) * (BOARD_WIDTH as usize) + (x as usize)].is_none()
    }

    /// Whether the piece, translated by (dx, dy), fits on this board.
    pub fn piece_fits(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(x, y)| self.cell_open(x + dx, y + dy))
    }

    /// Attempt to translate the current piece. The move is applied only when
    /// the resulting position is valid.
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.game_over {
            return false;
        }
        let Some(mut piece) = self.current else {
            return false;
        };
        if !self.piece_fits(&piece, dx, dy) {
            return false;
        }
        piece.translate(dx, dy);
        self.current = Some(piece);
        true
    }

    /// Attempt to advance the current piece's rotation state. Reverts
    /// atomically when the rotated configuration does not fit (no wall
    /// kicks). Single-state kinds rotate as a successful no-op.
    pub fn try_rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let Some(mut piece) = self.current else {
            return false;
        };
        piece.rotate();
        if !self.piece_fits(&piece, 0, 0) {
            return false;
        }
        self.current = Some(piece);
        true
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove every fully occupied row and shift the rows above it down.
    /// Rows are collected top-to-bottom and removed in that order; each
    /// removal only moves rows above the removed index, so the indices of
    /// lower full rows stay valid. Returns the count removed.
    pub fn clear_lines(&mut self) -> u32 {
        const MAX_ROWS: usize = BOARD_HEIGHT as usize;
        let width = BOARD_WIDTH as usize;

        let mut full_rows: ArrayVec<usize, MAX_ROWS> = ArrayVec::new();
        for y in 0..BOARD_HEIGHT as usize {
            if self.is_row_full(y) {
                full_rows.push(y);
            }
        }

        for &y in &full_rows {
            for row in (1..=y).rev() {
                let src = (row - 1) * width;
                let dst = row * width;
                self.cells.copy_within(src..src + width, dst);
            }
            for cell in &mut self.cells[..width] {
                *cell = None;
            }
        }

        full_rows.len() as u32
    }

    /// Lock the current piece into the grid, clear lines, and score the
    /// result. Cells above the visible grid are silently dropped. Returns
    /// `None` when there is no current piece.
    pub fn lock_piece(&mut self) -> Option<LockOutcome> {
        if self.game_over {
            return None;
        }
        let piece = self.current.take()?;

        for (x, y) in piece.cells() {
            // set() bounds-checks; negative rows fall out here
            self.set(x, y, Some(piece.kind));
        }

        let lines_cleared = self.clear_lines();
        let was_special = piece.kind.is_special();
        let score_before = self.score;
        let points = lock_points(lines_cleared as usize, was_special);

        self.score += points;
        self.special_accumulator += points;
        self.level = level_for_score(self.score);
        self.recompute_fall_delay();

        Some(LockOutcome {
            lines_cleared,
            score_before,
            score_after: self.score,
            was_special,
        })
    }

    /// Advance to a new current piece.
    ///
    /// With `Some(kind)` the current piece is replaced immediately and the
    /// queue is untouched (cross-board injection). With `None` the queued
    /// piece is promoted and a fresh one is queued: forced special once the
    /// accumulator reaches its threshold, uniform standard otherwise. The
    /// very first call draws both pieces.
    ///
    /// Returns false and marks the board as over when the new current piece
    /// does not fit at its position - the loss condition for this board.
    pub fn new_piece(&mut self, specific: Option<PieceKind>) -> bool {
        if self.game_over {
            return false;
        }
        if let Some(kind) = specific {
            self.current = Some(Piece::new(kind));
        } else if let Some(queued) = self.queued.take() {
            self.current = Some(queued);
            let kind = self.draw_queued_kind();
            self.queued = Some(Piece::new(kind));
        } else {
            let current_kind = self.rng.choose(&PieceKind::STANDARD);
            let queued_kind = self.rng.choose(&PieceKind::STANDARD);
            self.current = Some(Piece::new(current_kind));
            self.queued = Some(Piece::new(queued_kind));
        }

        match self.current {
            Some(piece) if self.piece_fits(&piece, 0, 0) => true,
            _ => {
                self.game_over = true;
                false
            }
        }
    }

    fn draw_queued_kind(&mut self) -> PieceKind {
        if self.special_accumulator >= SPECIAL_PIECE_THRESHOLD {
            self.special_accumulator = 0;
            self.rng.choose(&PieceKind::SPECIAL)
        } else {
            self.rng.choose(&PieceKind::STANDARD)
        }
    }

    /// Forcibly replace the queued piece (the cross-board gift rule).
    pub fn gift_queued(&mut self, kind: PieceKind) {
        self.queued = Some(Piece::new(kind));
    }

    /// Start the slowdown window: fall delay scales by 6/5 until
    /// `reset_speed` is called. The reset deadline is owned by the session.
    pub fn apply_slowdown(&mut self) {
        self.slowed = true;
        self.recompute_fall_delay();
    }

    /// End the slowdown window and return to the level-derived delay.
    pub fn reset_speed(&mut self) {
        self.slowed = false;
        self.recompute_fall_delay();
    }

    fn recompute_fall_delay(&mut self) {
        let base = fall_delay_for_level(self.level);
        self.fall_delay_ms = if self.slowed { slowed_delay(base) } else { base };
    }

    pub fn set_rainbow(&mut self, on: bool) {
        self.rainbow = on;
    }

    pub fn rainbow(&self) -> bool {
        self.rainbow
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn fall_delay_ms(&self) -> u32 {
        self.fall_delay_ms
    }

    pub fn is_slowed(&self) -> bool {
        self.slowed
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn queued_kind(&self) -> Option<PieceKind> {
        self.queued.map(|p| p.kind)
    }

    /// Occupancy of the visible grid as a plain value, cheap to copy into
    /// placement simulations.
    pub fn occupied_grid(&self) -> [[bool; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize] {
        let mut grid = [[false; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        for y in 0..BOARD_HEIGHT as usize {
            for x in 0..BOARD_WIDTH as usize {
                grid[y][x] = self.cells[y * BOARD_WIDTH as usize + x].is_some();
            }
        }
        grid
    }

    /// Read-only snapshot for render consumers.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut grid = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        for y in 0..BOARD_HEIGHT as usize {
            for x in 0..BOARD_WIDTH as usize {
                grid[y][x] = self.cells[y * BOARD_WIDTH as usize + x];
            }
        }
        BoardSnapshot {
            grid,
            current: self.current.map(PieceSnapshot::from),
            queued: self.queued_kind(),
            score: self.score,
            level: self.level,
            rainbow: self.rainbow,
            game_over: self.game_over,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
        self.level = level_for_score(score);
        self.recompute_fall_delay();
    }

    #[cfg(test)]
    pub(crate) fn fill_row_except(&mut self, y: i8, skip: &[i8]) {
        for x in 0..BOARD_WIDTH as i8 {
            if !skip.contains(&x) {
                self.set(x, y, Some(PieceKind::T));
            }
        }
    }
}
