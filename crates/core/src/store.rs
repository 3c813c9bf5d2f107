//! Best-score persistence slot.
//!
//! The console reads a best score at startup and writes it back on every new
//! high score. Backends live outside the core; [`MemoryScoreStore`] is the
//! in-process one used headless and in tests.

use std::collections::HashMap;

use thiserror::Error;

/// Key under which the Tetris best score is stored.
pub const TETRIS_BEST_KEY: &str = "tetris_best_score";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("score store data is malformed: {0}")]
    Malformed(String),
    #[error("score store is read-only")]
    ReadOnly,
}

pub trait ScoreStore {
    fn load_best(&self, key: &str) -> Option<u32>;

    fn save_best(&mut self, key: &str, score: u32) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    scores: HashMap<String, u32>,
    read_only: bool,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(key: &str, score: u32) -> Self {
        let mut store = Self::default();
        store.scores.insert(key.to_string(), score);
        store
    }

    /// A store whose writes always fail.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load_best(&self, key: &str) -> Option<u32> {
        self.scores.get(key).copied()
    }

    fn save_best(&mut self, key: &str, score: u32) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.scores.insert(key.to_string(), score);
        Ok(())
    }
}
