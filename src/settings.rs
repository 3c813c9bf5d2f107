//! Settings file and best-score persistence for the terminal runner.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::{ConsoleConfig, ScoreStore, StoreError};
use crate::types::CartridgeKind;

const APP_DIR: &str = "pocket-console";
const SETTINGS_FILE: &str = "settings.json";
const SCORES_FILE: &str = "scores.json";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("POCKET_CONSOLE_SETTINGS") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push(APP_DIR);
        path.push(SETTINGS_FILE);
        Self { path }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scores live next to the settings file.
    pub fn scores_path(&self) -> PathBuf {
        self.path.with_file_name(SCORES_FILE)
    }

    /// Missing or malformed files yield defaults.
    pub fn load(&self) -> ConsoleConfig {
        let Ok(bytes) = fs::read(&self.path) else {
            return ConsoleConfig::default();
        };
        match serde_json::from_slice::<ConsoleConfig>(&bytes) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring malformed settings");
                ConsoleConfig::default()
            }
        }
    }

    pub fn save(&self, config: &ConsoleConfig) -> io::Result<()> {
        ensure_parent(&self.path)?;
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

/// Apply `POCKET_CONSOLE_CARTRIDGE` and `POCKET_CONSOLE_SEED`.
pub fn apply_env_overrides(config: ConsoleConfig) -> ConsoleConfig {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Same as [`apply_env_overrides`] with an injectable variable lookup.
pub fn apply_overrides(
    mut config: ConsoleConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConsoleConfig {
    if let Some(cart) = lookup("POCKET_CONSOLE_CARTRIDGE") {
        let cart = cart.trim();
        if cart.eq_ignore_ascii_case("none") {
            config.cartridge = None;
        } else if let Some(kind) = CartridgeKind::from_str(cart) {
            config.cartridge = Some(kind);
        } else {
            tracing::warn!(value = cart, "unknown POCKET_CONSOLE_CARTRIDGE");
        }
    }
    if let Some(seed) = lookup("POCKET_CONSOLE_SEED").and_then(|s| s.trim().parse().ok()) {
        config.seed = seed;
    }
    config
}

/// `{key: score}` map persisted as JSON.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
    scores: BTreeMap<String, u32>,
}

impl JsonScoreStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let scores = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Malformed(e.to_string()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, scores })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonScoreStore {
    fn load_best(&self, key: &str) -> Option<u32> {
        self.scores.get(key).copied()
    }

    fn save_best(&mut self, key: &str, score: u32) -> Result<(), StoreError> {
        self.scores.insert(key.to_string(), score);
        ensure_parent(&self.path)?;
        let text = serde_json::to_string_pretty(&self.scores)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
