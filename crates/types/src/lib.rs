//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the console:
//! the button set, cartridge ids, tetromino kinds, events emitted by the
//! cartridges, and the draw intents they hand to a renderer. Everything here
//! is plain data, usable from the game core, the terminal front-end and tests.
//!
//! # Screen
//!
//! The handheld screen is 160x144 pixels. Every [`DrawIntent`] is expressed in
//! that space, except Tetris blocks which use board coordinates.
//!
//! # Tetris Board
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn position**: (3, 0) for every piece
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `DEFAULT_DAS_MS` | 150 | Delay before a held direction repeats |
//! | `DEFAULT_ARR_MS` | 50 | Interval between repeats |
//! | `SOFT_DROP_INTERVAL_MS` | 50 | Soft drop repeat while Down is held |
//! | `TITLE_BLINK_MS` | 700 | Title screen arrow blink period |
//! | `LOADING_SLIDE_MS` | 5000 | Boot logo slide duration |
//! | `LOADING_HOLD_MS` | 1000 | Pause after the boot chime |
//! | `POWER_OFF_FADE_MS` | 500 | Screen fade when powering off |
//! | `VOLUME_OVERLAY_MS` | 1500 | Volume bar visibility |
//! | `GAME_OVER_SCREEN_MS` | 2000 | Space Invaders game over screen |
//!
//! # Gravity by Level
//!
//! Game Boy frames-per-row converted to milliseconds (59.73 Hz):
//!
//! | Level | Interval |
//! |-------|----------|
//! | 0 | 887ms |
//! | 5 | 552ms |
//! | 9 | 184ms |
//! | 14 | 100ms |
//! | 20+ | 50ms (floor) |
//!
//! # Examples
//!
//! ```
//! use pocket_console_types::{Button, CartridgeKind, PieceKind, Rotation, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! assert_eq!(Button::from_str("start"), Some(Button::Start));
//! assert_eq!(Button::from_str("turbo"), None);
//!
//! assert_eq!(CartridgeKind::from_str("space_invaders"), Some(CartridgeKind::SpaceInvaders));
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

pub mod draw;

pub use draw::{DrawIntent, DrawList, Facing, InvaderKind, Shade, SpriteId, TextRun};

use serde::{Deserialize, Serialize};

/// Screen width in pixels
pub const SCREEN_WIDTH: i16 = 160;

/// Screen height in pixels
pub const SCREEN_HEIGHT: i16 = 144;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Tetris block edge in screen pixels
pub const BLOCK_PX: i16 = 7;

/// Screen position of the board's top-left corner
pub const BOARD_ORIGIN: (i16, i16) = (8, 2);

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// DAS (Delayed Auto Shift) delay in milliseconds.
pub const DEFAULT_DAS_MS: u32 = 150;

/// ARR (Auto Repeat Rate) in milliseconds.
pub const DEFAULT_ARR_MS: u32 = 50;

/// Soft drop repeat interval while Down is held.
pub const SOFT_DROP_INTERVAL_MS: u32 = 50;

/// Title screen arrow blink period.
pub const TITLE_BLINK_MS: u32 = 700;

/// Boot logo slide duration.
pub const LOADING_SLIDE_MS: u32 = 5000;

/// Delay between the boot chime and the end of the loading screen.
pub const LOADING_HOLD_MS: u32 = 1000;

/// Fade-out duration when the console is switched off.
pub const POWER_OFF_FADE_MS: u32 = 500;

/// How long the volume bar stays on screen after a change.
pub const VOLUME_OVERLAY_MS: u32 = 1500;

/// Space Invaders game over screen duration.
pub const GAME_OVER_SCREEN_MS: u32 = 2000;

/// Highest volume level.
pub const MAX_VOLUME: u8 = 10;

/// Highest level selectable at game start.
pub const MAX_START_LEVEL: u32 = 9;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Drop intervals by level (milliseconds per row)
///
/// Index 0 = Level 0, Index 20 = Level 20+
pub const DROP_INTERVALS: [u32; 21] = [
    887, 820, 753, 686, 619, 552, 469, 368, 285, 184, 167, 151, 134, 117, 100, 100, 84, 84, 67, 67,
    50,
];

/// Gravity never gets faster than this.
pub const DROP_INTERVAL_FLOOR_MS: u32 = 50;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N lines at level 0:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
///
/// Points are multiplied by (level + 1) for higher levels.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// The fixed control set of the handheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Start,
    Select,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
        Button::Start,
        Button::Select,
    ];

    /// Parse a button id (case-insensitive). Unknown ids yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pocket_console_types::Button;
    ///
    /// assert_eq!(Button::from_str("A"), Some(Button::A));
    /// assert_eq!(Button::from_str("crossLeft"), Some(Button::Left));
    /// assert_eq!(Button::from_str("menu"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "crossup" => Some(Button::Up),
            "down" | "crossdown" => Some(Button::Down),
            "left" | "crossleft" => Some(Button::Left),
            "right" | "crossright" => Some(Button::Right),
            "a" => Some(Button::A),
            "b" => Some(Button::B),
            "start" => Some(Button::Start),
            "select" => Some(Button::Select),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::A => "a",
            Button::B => "b",
            Button::Start => "start",
            Button::Select => "select",
        }
    }

    pub fn is_direction(&self) -> bool {
        matches!(self, Button::Up | Button::Down | Button::Left | Button::Right)
    }
}

/// Cartridges that can be inserted into the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartridgeKind {
    Tetris,
    SpaceInvaders,
    Zelda,
}

impl CartridgeKind {
    pub const ALL: [CartridgeKind; 3] = [
        CartridgeKind::Tetris,
        CartridgeKind::SpaceInvaders,
        CartridgeKind::Zelda,
    ];

    /// Parse a cartridge id (case-insensitive, `-` and `_` interchangeable).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "tetris" => Some(CartridgeKind::Tetris),
            "space_invaders" | "invaders" => Some(CartridgeKind::SpaceInvaders),
            "zelda" => Some(CartridgeKind::Zelda),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CartridgeKind::Tetris => "tetris",
            CartridgeKind::SpaceInvaders => "space_invaders",
            CartridgeKind::Zelda => "zelda",
        }
    }
}

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use pocket_console_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Compact non-zero code used by board snapshots (0 = empty).
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (0° rotation)
/// - **East**: Rotated 90° clockwise
/// - **South**: Rotated 180°
/// - **West**: Rotated 90° counter-clockwise (270° clockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use pocket_console_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation index 0-3 (North = 0, clockwise order)
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// A cell on the Tetris board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;

/// Audio the integration layer should play. The core never mixes audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    GameBoyLoad,
    TetrisMusic,
    TetrisPause,
    TetrisMove,
    TetrisRotate,
    TetrisLock,
    TetrisLineClear,
    TetrisGameOver,
    InvaderStep,
    InvaderKilled,
    PlayerShoot,
    SwordSlash,
    BushCut,
}

/// Notifications emitted by the console and its cartridges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleEvent {
    PoweredOn,
    PoweredOff,
    GameStarted(CartridgeKind),
    GameStopped(CartridgeKind),
    GameOver(CartridgeKind),
    BestScoreChanged(u32),
    MusicToggled(bool),
    VolumeChanged(u8),
    Sound(SoundCue),
}
