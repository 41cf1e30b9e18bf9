//! Engine configuration file support.
//!
//! Reads `reminders.toml` with serde-defaulted fields, so a missing or
//! partial file is never fatal.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::{DEFAULT_RETENTION_DAYS, MAX_RECEIVED};

/// Configuration for the reminder engine and its server binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Directory the file-backed store persists into.
    pub data_dir: PathBuf,
    /// Cadence of the periodic cleanup loop, in seconds.
    pub cleanup_interval_secs: u64,
    /// Cap on stored inbox entries.
    pub inbox_max_entries: usize,
    /// Age-out horizon for inbox entries, in days.
    pub inbox_retention_days: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("reminders-data"),
            cleanup_interval_secs: 10,
            inbox_max_entries: MAX_RECEIVED,
            inbox_retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl ReminderConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read config file {}", path.as_ref().display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.as_ref().display()))
    }

    /// Load configuration from the first `reminders.toml` found in the
    /// standard locations, falling back to defaults when none exists.
    pub fn from_default_location() -> Self {
        let search_paths = [
            PathBuf::from("reminders.toml"),
            PathBuf::from("config/reminders.toml"),
            PathBuf::from("../reminders.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        log::warn!("ignoring unreadable config {}: {e}", path.display());
                        return Self::default();
                    }
                }
            }
        }

        Self::default()
    }

    /// Cleanup cadence as a [`Duration`].
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
