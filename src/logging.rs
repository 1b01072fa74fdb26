//! File logging. The terminal belongs to the TUI, so events go to
//! `smeta.log` in the data directory instead of stderr.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "smeta.log";
pub const LOG_ENV: &str = "SMETA_LOG";

/// Install the global subscriber. `SMETA_LOG` wins over `default_level`.
/// Returns the log file path.
pub fn init(log_dir: &Path, default_level: &str) -> Result<PathBuf> {
    let path = log_dir.join(LOG_FILE);
    let file = open_log(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(Mutex::new(file))
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))?;

    Ok(path)
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_open_log_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        open_log(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_log(&dir.path().join("nope").join(LOG_FILE)).is_err());
    }

    #[test]
    fn test_bad_level_falls_back() {
        // Must not panic on garbage directives.
        let _ = filter("[[not a level");
    }
}
