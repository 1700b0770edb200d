//! Configuration management for token-export
//!
//! This module handles loading, parsing, and managing configuration from:
//! - Configuration files (TOML format)
//! - Command-line arguments (applied by the CLI on top of the file)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::template::{DEFAULT_VAR_ENDS, DEFAULT_VAR_STARTS, Delimiters};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Export output configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Request store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Export output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory output files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Placeholder start token
    #[serde(default = "default_var_starts")]
    pub var_starts: String,

    /// Placeholder end token
    #[serde(default = "default_var_ends")]
    pub var_ends: String,

    /// Show a progress spinner while exporting
    #[serde(default)]
    pub progress: bool,
}

/// Request store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// MongoDB connection URI
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding export requests
    #[serde(default = "default_requests_collection")]
    pub requests_collection: String,

    /// Collection holding export records
    #[serde(default = "default_records_collection")]
    pub records_collection: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_var_starts() -> String {
    DEFAULT_VAR_STARTS.to_string()
}

fn default_var_ends() -> String {
    DEFAULT_VAR_ENDS.to_string()
}

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "token_seeder".to_string()
}

fn default_requests_collection() -> String {
    "requests".to_string()
}

fn default_records_collection() -> String {
    "records".to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            var_starts: default_var_starts(),
            var_ends: default_var_ends(),
            progress: false,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            requests_collection: default_requests_collection(),
            records_collection: default_records_collection(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// With no explicit path the default location is tried, and a missing
    /// default file yields the default configuration.
    ///
    /// # Arguments
    /// * `path` - Optional path to a TOML configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::FileRead { path, source })?;
        Self::from_toml(&text)
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".token-export")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.export.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export.output_dir".to_string(),
                value: String::new(),
            }
            .into());
        }
        self.export.delimiters()?;
        if self.store.uri.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.uri".to_string(),
                value: String::new(),
            }
            .into());
        }
        Ok(())
    }
}

impl ExportConfig {
    /// Placeholder delimiters for the template engine
    pub fn delimiters(&self) -> Result<Delimiters> {
        Ok(Delimiters::new(&self.var_starts, &self.var_ends)?)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.export.output_dir, PathBuf::from("output"));
        assert_eq!(config.export.var_starts, "__-");
        assert_eq!(config.export.var_ends, "-__");
        assert_eq!(config.store.uri, "mongodb://localhost:27017");
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [export]
            output_dir = "/srv/downloads"
            var_starts = "{{"
            var_ends = "}}"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.export.output_dir, PathBuf::from("/srv/downloads"));
        assert_eq!(config.export.delimiters().unwrap().start(), "{{");
        assert_eq!(config.store.database, "token_seeder");
        assert_eq!(config.logging.level.to_tracing_level(), tracing::Level::DEBUG);
        assert!(config.logging.timestamps);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("[export\noutput_dir = 1").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_delimiter() {
        let mut config = Config::default();
        config.export.var_ends = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store]\ndatabase = \"exports\"").unwrap();

        let config = Config::load_from_file(Some(file.path())).unwrap();
        assert_eq!(config.store.database, "exports");
        assert_eq!(config.store.records_collection, "records");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_from_file(Some(&missing)).is_err());
    }
}
