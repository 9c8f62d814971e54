// Webworm platform abstraction
// Resolves the directory holding the bookmark database and config file.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "WEBWORM_DATA_DIR";

/// Returns the data directory for Webworm.
///
/// `$WEBWORM_DATA_DIR` wins when set and non-empty. Otherwise:
/// - **Linux**: `~/.local/share/webworm` (or `$XDG_DATA_HOME/webworm`)
/// - **macOS**: `~/Library/Application Support/Webworm`
/// - **Windows**: `%APPDATA%/Webworm`
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
