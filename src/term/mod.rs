//! Terminal presentation: framebuffer, renderer, and the two-board view.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use fb::{CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, VIEW_HEIGHT, VIEW_WIDTH};
pub use renderer::TerminalRenderer;
