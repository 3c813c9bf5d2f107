//! File logging for the terminal runner.
//!
//! Stdout belongs to the renderer, so events only go to a file named by
//! `POCKET_CONSOLE_LOG`. `RUST_LOG` filters as usual (default `info`).

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn log_path_from_env() -> Option<PathBuf> {
    std::env::var("POCKET_CONSOLE_LOG")
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) })
}

/// Install the global subscriber. Returns `false` when logging stays off.
pub fn init(path: Option<&Path>) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("logging init failed: {e}"))?;
    Ok(true)
}
