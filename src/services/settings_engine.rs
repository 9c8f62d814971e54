// Webworm Settings Engine
// Loads the tracker configuration from `config.json` in the data directory.
// A missing file means defaults; a malformed one is an error.

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform;
use crate::types::errors::ConfigError;
use crate::types::settings::TrackerConfig;

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<TrackerConfig, ConfigError>;
    fn get_settings(&self) -> &TrackerConfig;
    fn get_config_path(&self) -> &Path;
}

/// Settings engine reading the tracker configuration from a JSON file.
pub struct SettingsEngine {
    config_path: PathBuf,
    settings: TrackerConfig,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `config.json` in the platform data directory.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let config_path =
            path_override.unwrap_or_else(|| platform::get_data_dir().join(CONFIG_FILE));

        Self {
            config_path,
            settings: TrackerConfig::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    fn load(&mut self) -> Result<TrackerConfig, ConfigError> {
        let path = self.config_path.as_path();

        if !path.exists() {
            self.settings = TrackerConfig::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

        let settings: TrackerConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse {}: {}", path.display(), e)))?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    fn get_settings(&self) -> &TrackerConfig {
        &self.settings
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
