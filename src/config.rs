//! Configuration module for VMAPP.

use serde::Deserialize;
use std::path::Path;

use crate::db::DEFAULT_MAX_CONNECTIONS;
use crate::users::{DEFAULT_QUOTA_MB, MAX_QUOTA_MB};
use crate::{Result, VmappError};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/vmapp.db".to_string()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/vmapp.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Mailbox defaults applied to admin input.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    /// Quota in megabytes used when an admin form leaves it blank.
    #[serde(default = "default_quota_mb")]
    pub default_quota_mb: i64,
}

fn default_quota_mb() -> i64 {
    DEFAULT_QUOTA_MB
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            default_quota_mb: default_quota_mb(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Mailbox defaults.
    #[serde(default)]
    pub users: UsersConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(VmappError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| VmappError::Config(format!("parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The database path is empty
    /// - The default quota is negative or not representable in bytes
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(VmappError::Config("database.path must not be empty".to_string()));
        }
        if !(0..=MAX_QUOTA_MB).contains(&self.users.default_quota_mb) {
            return Err(VmappError::Config(format!(
                "users.default_quota_mb must be between 0 and {MAX_QUOTA_MB}"
            )));
        }
        Ok(())
    }
}
