//! Configuration for loading and displaying diagnostic lists.

use crate::error::{ErrListError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up by [`Config::load`].
pub const CONFIG_FILE_NAME: &str = "errlist.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Bulk loader settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Tree display settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load `errlist.toml` from a directory, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load_file(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ErrListError::ConfigError(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ErrListError::ConfigError(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `errlist.toml` in a directory.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| ErrListError::ConfigError(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| ErrListError::ConfigError(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.loader.batch_size == 0 {
            return Err(ErrListError::ConfigError(
                "loader.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Bulk loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    /// Records inserted between progress reports and cancellation checks (default: 256).
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 256 }
    }
}

/// Tree display configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Spaces per tree level (default: 2).
    pub indent: usize,

    /// Print node ids next to names (default: true).
    pub show_ids: bool,

    /// Colour output by severity (default: true).
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            show_ids: true,
            color: true,
        }
    }
}
