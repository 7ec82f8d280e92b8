//! Configuration management
//!
//! Configuration can be loaded from:
//! - a config.toml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Notification service configuration
    #[serde(default)]
    pub notifier: NotifierConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/inklog.db".to_string()
}

/// Notification microservice configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Base URL of the external notification service
    #[serde(default = "default_notifier_url")]
    pub base_url: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            base_url: default_notifier_url(),
        }
    }
}

fn default_notifier_url() -> String {
    "http://localhost:8081".to_string()
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist. Environment variables override file settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("INKLOG_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(url) = std::env::var("INKLOG_NOTIFIER_URL") {
            self.notifier.base_url = url;
        }
    }
}
