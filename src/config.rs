use crate::core::{Result, SqliteKitError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: Option<LoggingConfig>,
}

/// Database-related configuration.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Resource URI: a file path or ":memory:"
    pub uri: String,
    /// Pragma statements applied right after connecting
    pub pragmas: Option<Vec<String>>,
}

/// Logging-related configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Loads configuration from a TOML file at the given path.
///
/// # Arguments
///
/// * `path` - The file path to the TOML configuration file.
///
/// # Errors
///
/// Returns `SqliteKitError::Io` if the file cannot be read and
/// `SqliteKitError::Config` if the TOML does not parse.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| SqliteKitError::Config(e.to_string()))
}
