// Webworm platform paths for macOS
// Data: ~/Library/Application Support/Webworm

use std::env;
use std::path::PathBuf;

/// Returns the data directory for Webworm on macOS.
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join("Webworm")
}
