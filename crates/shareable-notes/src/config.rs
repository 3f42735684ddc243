//! Configuration management for shareable-notes.
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

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "shareable-notes";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "storage.db";

/// Key the note store is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "notes-storage";

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SHAREABLE_NOTES_`, `__` between sections)
/// 2. TOML config file at `~/.config/shareable-notes/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Undo history configuration.
    pub history: HistoryConfig,
    /// Remote insights configuration.
    pub insights: InsightsConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/shareable-notes/storage.db`
    pub database_path: Option<PathBuf>,
    /// Key the note store is saved under.
    pub key: String,
}

/// Undo history configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo snapshots to keep.
    /// Set to 0 for unlimited.
    pub max_snapshots: usize,
}

/// Remote insights configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// Chat completion endpoint.
    pub endpoint: String,
    /// Model name sent with each request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens in the reply.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// API key. Falls back to `GROQ_API_KEY` when unset. Never serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 30,
            api_key: None,
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
            .merge(Env::prefixed("SHAREABLE_NOTES_").split("__"));

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
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.key must not be empty".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.insights.temperature) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "insights.temperature ({}) must be between 0 and 2",
                    self.insights.temperature
                ),
            });
        }

        if self.insights.max_tokens == 0 {
            return Err(Error::ConfigValidation {
                message: "insights.max_tokens must be greater than 0".to_string(),
            });
        }

        if self.insights.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "insights.timeout_secs must be greater than 0".to_string(),
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

    /// Get the snapshot cap, `None` meaning unlimited.
    #[must_use]
    pub fn history_limit(&self) -> Option<usize> {
        match self.history.max_snapshots {
            0 => None,
            n => Some(n),
        }
    }

    /// Get the insights request timeout as a Duration.
    #[must_use]
    pub fn insights_timeout(&self) -> Duration {
        Duration::from_secs(self.insights.timeout_secs)
    }

    /// Resolve the API key from config, then the environment.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.insights
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}
