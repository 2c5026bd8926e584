//! GameView: lays both boards out into a framebuffer.
//!
//! Pure presentation over session snapshots; no game rules live here.

use crate::core::pieces::rotation_states;
use crate::core::snapshot::{BoardSnapshot, SessionSnapshot};
use crate::term::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, SessionState, Side, BOARD_HEIGHT, BOARD_WIDTH};

/// Each board cell renders as two terminal columns.
const CELL_W: u16 = 2;
const GRID_W: u16 = BOARD_WIDTH as u16 * CELL_W;
const GRID_H: u16 = BOARD_HEIGHT as u16;

const LEFT_X: u16 = 1;
const INFO_X: u16 = LEFT_X + GRID_W + 4;
const RIGHT_X: u16 = INFO_X + 16;
/// First grid row; the frame's top border sits one row above, below the
/// three label rows.
const TOP_Y: u16 = 4;

/// Total framebuffer size the view needs. Wide enough for the boards and
/// for the one-line controls help.
pub const VIEW_WIDTH: u16 = 80;
pub const VIEW_HEIGHT: u16 = TOP_Y + GRID_H + 4;

fn kind_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(0, 255, 255),
        PieceKind::J => Rgb::new(0, 0, 255),
        PieceKind::L => Rgb::new(255, 128, 0),
        PieceKind::O => Rgb::new(255, 255, 0),
        PieceKind::S => Rgb::new(0, 255, 0),
        PieceKind::T => Rgb::new(128, 0, 255),
        PieceKind::Z => Rgb::new(255, 0, 0),
        PieceKind::Heart => Rgb::new(255, 105, 180),
        PieceKind::Star => Rgb::new(255, 215, 0),
    }
}

/// HSV (h in degrees, s and v in 0..=1) to RGB, for the rainbow effect.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let h = (h.rem_euclid(360.0)) / 60.0;
    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn label_style() -> CellStyle {
    CellStyle {
        bold: true,
        ..CellStyle::default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GameView;

impl GameView {
    pub fn render(&self, snap: &SessionSnapshot) -> FrameBuffer {
        let mut fb = FrameBuffer::new(VIEW_WIDTH, VIEW_HEIGHT);
        let phase = (snap.now_ms / 50 % 360) as f32;

        self.draw_board(&mut fb, LEFT_X, "PLAYER", &snap.human, phase);
        self.draw_board(&mut fb, RIGHT_X, "MACHINE", &snap.machine, phase);
        self.draw_preview(&mut fb, snap);
        self.draw_status(&mut fb, snap);
        fb
    }

    fn draw_board(
        &self,
        fb: &mut FrameBuffer,
        left: u16,
        title: &str,
        board: &BoardSnapshot,
        phase: f32,
    ) {
        fb.put_str(left, 0, title, label_style());
        fb.put_str(
            left,
            1,
            &format!("Score {}", board.score),
            CellStyle::default(),
        );
        fb.put_str(
            left,
            2,
            &format!("Level {}", board.level),
            CellStyle::default(),
        );

        self.draw_frame(fb, left - 1, TOP_Y - 1, GRID_W + 2, GRID_H + 2);

        // Locked cells
        for y in 0..BOARD_HEIGHT as usize {
            for x in 0..BOARD_WIDTH as usize {
                if let Some(kind) = board.grid[y][x] {
                    self.draw_cell(fb, left, x as i8, y as i8, kind, board.rainbow, phase);
                }
            }
        }

        // Falling piece (cells above the visible grid are clipped)
        if let Some(piece) = board.current {
            for (x, y) in piece.cells() {
                if y >= 0 {
                    self.draw_cell(fb, left, x, y, piece.kind, board.rainbow, phase);
                }
            }
        }
    }

    fn draw_cell(
        &self,
        fb: &mut FrameBuffer,
        left: u16,
        x: i8,
        y: i8,
        kind: PieceKind,
        rainbow: bool,
        phase: f32,
    ) {
        let color = if rainbow {
            hsv_to_rgb(phase + (x + y) as f32 * 12.0, 1.0, 1.0)
        } else {
            kind_color(kind)
        };
        let style = CellStyle {
            fg: color,
            ..CellStyle::default()
        };
        let cx = left + x as u16 * CELL_W;
        let cy = TOP_Y + y as u16;
        fb.put(cx, cy, '█', style);
        fb.put(cx + 1, cy, '█', style);
    }

    fn draw_frame(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
        let style = CellStyle::default();
        for dx in 1..w - 1 {
            fb.put(x + dx, y, '─', style);
            fb.put(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put(x, y + dy, '│', style);
            fb.put(x + w - 1, y + dy, '│', style);
        }
        fb.put(x, y, '┌', style);
        fb.put(x + w - 1, y, '┐', style);
        fb.put(x, y + h - 1, '└', style);
        fb.put(x + w - 1, y + h - 1, '┘', style);
    }

    /// Next-piece preview for the keyboard board.
    fn draw_preview(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot) {
        fb.put_str(INFO_X, 0, "NEXT", label_style());
        let Some(kind) = snap.human.queued else {
            return;
        };
        let style = CellStyle {
            fg: kind_color(kind),
            ..CellStyle::default()
        };
        for &(dx, dy) in rotation_states(kind)[0] {
            let px = INFO_X + dx as u16 * CELL_W;
            let py = 2 + dy as u16;
            fb.put(px, py, '█', style);
            fb.put(px + 1, py, '█', style);
        }
    }

    fn draw_status(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot) {
        let status = match snap.state {
            SessionState::Ready => "Ready",
            SessionState::Paused => "Paused",
            SessionState::Running if snap.human.rainbow => "Rainbow!",
            SessionState::Running => "Playing",
            SessionState::Terminated => match snap.winner {
                Some(Side::Human) => "You win!",
                Some(Side::Machine) => "Machine wins!",
                None => "Over",
            },
        };
        let y = TOP_Y + GRID_H + 1;
        fb.put_str(LEFT_X, y, status, label_style());
        fb.put_str(
            LEFT_X,
            y + 1,
            "←→ move  ↑ rotate  ↓ soft drop  space drop  p pause  r restart  q quit",
            CellStyle::default(),
        );
    }
}
