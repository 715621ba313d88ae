//! Configuration management for herolog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::images::CompressOptions;
use crate::presentation::ListFilter;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "herolog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "herolog.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `HEROLOG_`, `__` between section and key)
/// 2. TOML config file at `~/.config/herolog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Image pipeline configuration.
    pub images: ImageConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/herolog/herolog.db`
    pub database_path: Option<PathBuf>,
    /// Slot holding the serialized action collection.
    pub slot_key: String,
    /// Largest serialized collection the slot accepts, in bytes.
    pub max_slot_bytes: usize,
}

/// Image pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Uploaded images wider than this are scaled down.
    pub max_width: u32,
    /// JPEG quality for re-encoded uploads (1-100).
    pub quality: u8,
    /// Timeout for a single URL probe in seconds. 0 disables the timeout.
    pub probe_timeout_secs: u64,
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colorize terminal output.
    pub color: bool,
    /// Filter used by `list` when none is given.
    pub default_filter: ListFilter,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            slot_key: "heroStageEvents".to_string(),
            max_slot_bytes: 5 * 1024 * 1024,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_width: 800,
            quality: 70,
            probe_timeout_secs: 10,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            default_filter: ListFilter::All,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("HEROLOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.slot_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "slot_key must not be empty".to_string(),
            });
        }

        if self.storage.max_slot_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "max_slot_bytes must be greater than 0".to_string(),
            });
        }

        if self.images.max_width == 0 {
            return Err(Error::ConfigValidation {
                message: "max_width must be greater than 0".to_string(),
            });
        }

        if !(1..=100).contains(&self.images.quality) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "quality ({}) must be between 1 and 100",
                    self.images.quality
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the probe timeout, `None` when disabled.
    #[must_use]
    pub fn probe_timeout(&self) -> Option<Duration> {
        if self.images.probe_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.images.probe_timeout_secs))
        }
    }

    /// Compression settings for uploaded files.
    #[must_use]
    pub fn compress_options(&self) -> CompressOptions {
        CompressOptions {
            max_width: self.images.max_width,
            quality: self.images.quality,
        }
    }
}
