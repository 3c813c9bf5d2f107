//! Pocket console (workspace facade crate).
//!
//! The game logic, input mapping and terminal rendering live in dedicated
//! crates under `crates/`; this package re-exports them and adds the pieces
//! only the terminal runner needs: settings, score persistence and logging.

pub mod logging;
pub mod settings;

pub use pocket_console_core as core;
pub use pocket_console_input as input;
pub use pocket_console_term as term;
pub use pocket_console_types as types;
