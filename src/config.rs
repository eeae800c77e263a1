//! Configuration module for foyer.

use serde::Deserialize;
use std::path::Path;

use crate::{FoyerError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/foyer.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret key used to sign the session cookie (must be set, min 32 bytes).
    #[serde(default)]
    pub secret: String,
    /// Session lifetime in minutes; the window slides on each request.
    #[serde(default = "default_session_ttl")]
    pub ttl_minutes: u64,
}

fn default_session_ttl() -> u64 {
    30
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl_minutes: default_session_ttl(),
        }
    }
}

/// Avatar upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory where uploaded avatar images are stored.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    /// Maximum upload size in bytes, enforced at the transport layer.
    #[serde(default = "default_max_upload_bytes")]
    pub max_size_bytes: usize,
    /// Allowed image file extensions (lowercase, without the dot).
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_upload_dir() -> String {
    "data/uploads".to_string()
}

fn default_max_upload_bytes() -> usize {
    2 * 1024 * 1024 // 2 MiB
}

fn default_allowed_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_size_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
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
    "logs/foyer.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Upload configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FoyerError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FoyerError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FOYER_SESSION_SECRET`: Override the session signing secret
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("FOYER_SESSION_SECRET") {
            if !secret.is_empty() {
                self.session.secret = secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the session secret is unset or shorter than 32 bytes
    /// - no allowed upload extensions are configured
    pub fn validate(&self) -> Result<()> {
        if self.session.secret.len() < 32 {
            return Err(FoyerError::Config(
                "session secret must be at least 32 bytes. \
                 Set it in config.toml or via FOYER_SESSION_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.uploads.allowed_extensions.is_empty() {
            return Err(FoyerError::Config(
                "uploads.allowed_extensions must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
