//! Console configuration.
//!
//! Passed to each controller at construction. Every section is
//! `#[serde(default)]` so partial settings files load cleanly.

use serde::{Deserialize, Serialize};

use crate::types::{CartridgeKind, MAX_START_LEVEL, MAX_VOLUME};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TetrisConfig {
    pub start_level: u32,
    pub music_allowed: bool,
    pub show_next: bool,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self {
            start_level: 0,
            music_allowed: true,
            show_next: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub power_on: bool,
    pub cartridge: Option<CartridgeKind>,
    pub volume: u8,
    /// Screen tint as `0xRRGGBB`, applied to the lightest shade.
    pub tint: u32,
    pub seed: u32,
    pub tetris: TetrisConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            power_on: true,
            cartridge: Some(CartridgeKind::Tetris),
            volume: 5,
            tint: 0x9B_BC0F,
            seed: 12345,
            tetris: TetrisConfig::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn sanitized(mut self) -> Self {
        self.volume = self.volume.min(MAX_VOLUME);
        self.tint &= 0x00FF_FFFF;
        self.tetris.start_level = self.tetris.start_level.min(MAX_START_LEVEL);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ConsoleConfig =
            serde_json::from_str(r#"{"volume": 3, "tetris": {"start_level": 4}}"#).unwrap();
        assert_eq!(cfg.volume, 3);
        assert_eq!(cfg.tetris.start_level, 4);
        assert!(cfg.tetris.music_allowed);
        assert_eq!(cfg.cartridge, Some(CartridgeKind::Tetris));
    }

    #[test]
    fn cartridge_can_be_null() {
        let cfg: ConsoleConfig = serde_json::from_str(r#"{"cartridge": null}"#).unwrap();
        assert_eq!(cfg.cartridge, None);
        let cfg: ConsoleConfig = serde_json::from_str(r#"{"cartridge": "space_invaders"}"#).unwrap();
        assert_eq!(cfg.cartridge, Some(CartridgeKind::SpaceInvaders));
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let cfg = ConsoleConfig {
            volume: 200,
            tint: 0xFF12_3456,
            tetris: TetrisConfig {
                start_level: 40,
                ..TetrisConfig::default()
            },
            ..ConsoleConfig::default()
        }
        .sanitized();
        assert_eq!(cfg.volume, MAX_VOLUME);
        assert_eq!(cfg.tint, 0x12_3456);
        assert_eq!(cfg.tetris.start_level, MAX_START_LEVEL);
    }
}
