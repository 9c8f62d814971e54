use thiserror::Error;

// === TrackerError ===

/// Errors raised by the bookmark store and the tracker service.
///
/// The `Display` text is what callers on the other side of the RPC boundary see.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A bookmark with the same name already exists.
    #[error("the name {0} already exists")]
    DuplicateKey(String),
    /// No bookmark with the given name.
    #[error("bookmark not found: {0}")]
    NotFound(String),
    /// Empty or malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// SQLite, lock or I/O failure. The store is left in its pre-call state.
    #[error("storage failure: {0}")]
    StorageFailure(String),
    /// The episode probe could not be set up or run.
    #[error("probe failure: {0}")]
    ProbeFailure(String),
}

impl From<rusqlite::Error> for TrackerError {
    fn from(err: rusqlite::Error) -> Self {
        TrackerError::StorageFailure(err.to_string())
    }
}

// === ConfigError ===

/// Errors related to loading the tracker configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Config I/O error: {0}")]
    IoError(String),
    /// The config file is not valid JSON for `TrackerConfig`.
    #[error("Config parse error: {0}")]
    ParseError(String),
}
