//! Terminal rendering for the pocket console.
//!
//! A small, game-oriented rendering layer: the console fills a
//! [`types::DrawList`], [`ScreenView`] rasterizes it into a [`FrameBuffer`]
//! inside the handheld bezel, and [`TerminalRenderer`] flushes only what
//! changed since the previous frame.

pub mod fb;
pub mod render_throttle;
pub mod renderer;
pub mod screen_view;

pub use pocket_console_core as core;
pub use pocket_console_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use render_throttle::{fingerprint, RenderThrottle};
pub use renderer::{encode_diff_into, encode_full_into, FrameStats, TerminalRenderer};
pub use screen_view::{
    AnchorY, BezelStatus, Palette, ScreenView, Viewport, BEZEL_HEIGHT, BEZEL_WIDTH, SCREEN_COLS,
    SCREEN_ROWS,
};
