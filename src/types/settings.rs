use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::platform;

/// Runtime configuration for the tracker backend.
///
/// Loaded from `config.json` in the data directory; every field is optional
/// in the file and falls back to its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    pub database_path: PathBuf,
    pub busy_timeout_ms: u64,
    pub probe_timeout_ms: u64,
    pub log_level: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_path: platform::get_data_dir().join("bookmarks.db"),
            busy_timeout_ms: 5000,
            probe_timeout_ms: 1000,
            log_level: "info".to_string(),
        }
    }
}
