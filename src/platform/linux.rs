// Webworm platform paths for Linux
// Data: ~/.local/share/webworm

use std::env;
use std::path::PathBuf;

/// Returns the data directory for Webworm on Linux.
/// Uses `$XDG_DATA_HOME/webworm` if set, otherwise `~/.local/share/webworm`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("webworm")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("webworm")
    }
}
