//! Machine player - greedy single-ply placement search
//!
//! For the current piece, every (rotation, horizontal offset) candidate is
//! dropped to its landing position on a value copy of the grid and scored
//! with a small surface heuristic. The best candidate is executed later as a
//! sequence of primitive board operations, after a fixed thinking delay owned
//! by the session.

use crate::core::pieces::rotation_count;
use crate::core::Board;
use crate::core::Piece;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

const W: usize = BOARD_WIDTH as usize;
const H: usize = BOARD_HEIGHT as usize;

/// Grid occupancy value type used by placement simulations.
pub type Occupancy = [[bool; W]; H];

/// A chosen placement, relative to the piece's current state: how many times
/// to rotate, then how far to shift horizontally before dropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rotations: u8,
    pub dx: i8,
}

/// Score a grid after a hypothetical landing. Higher is better.
pub fn evaluate_grid(grid: &Occupancy, special: bool) -> i32 {
    let mut score = 0i32;

    // Completed rows
    for row in grid.iter() {
        if row.iter().all(|&c| c) {
            score += 100;
        }
    }

    // Stack height: rows from the topmost occupied row down to the floor
    for (y, row) in grid.iter().enumerate() {
        if row.iter().any(|&c| c) {
            score -= 2 * (H - y) as i32;
            break;
        }
    }

    // Holes: empty cells with at least one occupied cell above them
    for x in 0..W {
        let mut seen_block = false;
        for y in 0..H {
            if grid[y][x] {
                seen_block = true;
            } else if seen_block {
                score -= 5;
            }
        }
    }

    // Adjacency: every ordered occupied-neighbor pair counts once, so a
    // shared edge contributes twice. Consistent across candidates.
    for y in 0..H {
        for x in 0..W {
            if !grid[y][x] {
                continue;
            }
            for (dx, dy) in [(0i32, 1i32), (1, 0), (0, -1), (-1, 0)] {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx >= 0
                    && nx < W as i32
                    && ny >= 0
                    && ny < H as i32
                    && grid[ny as usize][nx as usize]
                {
                    score += 1;
                }
            }
        }
    }

    if special {
        score += 50;
    }

    score
}

fn score_landing(grid: &Occupancy, piece: &Piece) -> i32 {
    let mut test = *grid;
    for (x, y) in piece.cells() {
        if x >= 0 && (x as usize) < W && y >= 0 && (y as usize) < H {
            test[y as usize][x as usize] = true;
        }
    }
    evaluate_grid(&test, piece.kind.is_special())
}

/// Exhaustive search over (rotation, horizontal offset) for the board's
/// current piece. Ties keep the first candidate found, scanning rotations in
/// state order and offsets left to right.
///
/// Standard kinds always fit somewhere on a 10-wide grid, so an empty
/// candidate set is a logic defect, not a recoverable condition.
pub fn search_placement(board: &Board) -> Placement {
    let origin = board
        .current()
        .expect("placement search requires a current piece");
    let grid = board.occupied_grid();

    let mut best: Option<(i32, Placement)> = None;

    for rotations in 0..rotation_count(origin.kind) {
        let mut candidate = origin;
        for _ in 0..rotations {
            candidate.rotate();
        }

        // Horizontal offsets that keep the rotated piece inside the walls.
        let mut min_x = i8::MAX;
        let mut max_x = i8::MIN;
        for &(x, _) in candidate.cells().iter() {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
        let lo = -min_x;
        let hi = BOARD_WIDTH as i8 - 1 - max_x;

        for dx in lo..=hi {
            let mut probe = candidate;
            probe.translate(dx, 0);
            if !board.piece_fits(&probe, 0, 0) {
                continue;
            }
            while board.piece_fits(&probe, 0, 1) {
                probe.translate(0, 1);
            }

            let score = score_landing(&grid, &probe);
            if best.map_or(true, |(b, _)| score > b) {
                best = Some((score, Placement { rotations, dx }));
            }
        }
    }

    let (_, placement) = best.expect("no legal placement for current piece");
    placement
}

/// Decision state for one board's machine player. A search is started only
/// when no earlier decision is still waiting to execute.
#[derive(Debug, Clone, Default)]
pub struct AutomatedPlayer {
    busy: bool,
    pending: Option<Placement>,
}

impl AutomatedPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Run the search for the board's current piece and hold the result for
    /// a later `commit`. Returns false when a decision is already pending or
    /// the board has nothing to place.
    pub fn start_decision(&mut self, board: &Board) -> bool {
        if self.busy || board.game_over() || board.current().is_none() {
            return false;
        }
        self.pending = Some(search_placement(board));
        self.busy = true;
        true
    }

    /// Execute the pending placement as primitive operations: rotations,
    /// horizontal steps, then down-moves to the floor. Runs to completion
    /// once begun; a no-op if the board terminated in the meantime.
    pub fn commit(&mut self, board: &mut Board) {
        self.busy = false;
        let Some(placement) = self.pending.take() else {
            return;
        };
        if board.game_over() {
            return;
        }

        for _ in 0..placement.rotations {
            board.try_rotate();
        }

        let step = if placement.dx < 0 { -1 } else { 1 };
        for _ in 0..placement.dx.unsigned_abs() {
            if !board.try_move(step, 0) {
                break;
            }
        }

        while board.try_move(0, 1) {}
    }

    /// Drop any pending decision (session restart/teardown).
    pub fn cancel(&mut self) {
        self.busy = false;
        self.pending = None;
    }
}
