//! Terminal input module.
//!
//! Maps `crossterm` key events onto the handheld's buttons and console
//! controls, and tracks held buttons on terminals that never report key
//! releases.

pub mod handler;
pub mod map;

pub use pocket_console_types as types;

pub use handler::ButtonTracker;
pub use map::{button_for_key, map_key_event, should_quit, ConsoleCommand};
