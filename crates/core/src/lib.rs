//! Core game logic - pure, deterministic, and testable
//!
//! Everything a pocket console runs: the Tetris rules, the Space Invaders
//! formation, the Zelda demo room and the console that switches between them.
//! No terminal, clock or filesystem code lives here; time arrives as a
//! millisecond delta, input as button presses, and output leaves as
//! [`DrawList`](types::DrawList)s and [`ConsoleEvent`](types::ConsoleEvent)s.
//!
//! - **Deterministic**: same seed and same inputs produce the same game
//! - **No errors for gameplay**: illegal moves are rejected with `false`
//! - **One terminal state per game**: blocked spawn (Tetris), formation at the
//!   player line (Space Invaders)
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid, collision and row clearing
//! - [`pieces`]: tetromino shapes and SRS wall kicks
//! - [`rng`]: seeded 7-bag piece queue
//! - [`scoring`]: line scores, levels and gravity intervals
//! - [`playfield`]: the Tetris piece state machine
//! - [`timer`]: countdowns and held-button repeaters
//! - [`cartridge`]: the interface the console drives games through
//! - [`tetris`], [`invaders`], [`zelda`]: the cartridges
//! - [`console`]: power, loading screen, cartridge slot, volume
//! - [`store`]: best-score persistence slot
//! - [`config`]: configuration passed in at construction
//!
//! # Example
//!
//! ```
//! use pocket_console_core::{Console, ConsoleConfig, MemoryScoreStore};
//! use pocket_console_core::types::{Button, CartridgeKind, DrawList, TICK_MS};
//!
//! let config = ConsoleConfig {
//!     cartridge: Some(CartridgeKind::Tetris),
//!     ..ConsoleConfig::default()
//! };
//! let mut console = Console::new(config, Box::new(MemoryScoreStore::new()));
//!
//! // Boot: logo slide plus hold.
//! for _ in 0..400 {
//!     console.update(TICK_MS);
//! }
//! console.on_button_press(Button::Start);
//! assert!(console.tetris().playfield().active().is_some());
//!
//! let mut frame = DrawList::new();
//! console.render(&mut frame);
//! assert!(frame.contains_text("SCORE"));
//! ```

pub mod board;
pub mod cartridge;
pub mod config;
pub mod console;
pub mod invaders;
pub mod pieces;
pub mod playfield;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod store;
pub mod tetris;
pub mod timer;
pub mod zelda;

pub use pocket_console_types as types;

pub use board::Board;
pub use cartridge::Cartridge;
pub use config::{ConsoleConfig, TetrisConfig};
pub use console::{Console, ConsoleScreen};
pub use invaders::{Aabb, Enemy, Formation, FormationStep, InvadersGame, InvadersScreen};
pub use pieces::{get_shape, try_rotate};
pub use playfield::{LockReport, Playfield, Step, Tetromino};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::{calculate_level, calculate_line_score, drop_interval_ms};
pub use snapshot::{ActiveSnapshot, TetrisSnapshot};
pub use store::{MemoryScoreStore, ScoreStore, StoreError, TETRIS_BEST_KEY};
pub use tetris::{TetrisGame, TetrisScreen};
pub use timer::{AutoRepeat, Countdown};
pub use zelda::{Tile, ZeldaGame};
