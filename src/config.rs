//! Configuration module for filestash.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, StashError};

/// Environment variable holding the database connection string.
pub const DATABASE_URL_ENV: &str = "FILESTASH_DATABASE_URL";

/// Generic fallback for the database connection string.
pub const DATABASE_URL_FALLBACK_ENV: &str = "DATABASE_URL";

/// Environment variable overriding the blob directory.
pub const STORAGE_PATH_ENV: &str = "FILESTASH_STORAGE_PATH";

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the HTTP API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    5000
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL for the metadata store.
    #[serde(default = "default_db_url")]
    pub url: String,
}

fn default_db_url() -> String {
    "sqlite://data/filestash.db?mode=rwc".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Path to the blob directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    16
}

impl FilesConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file output.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filestash.log".to_string()
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
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(StashError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| StashError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILESTASH_DATABASE_URL` (or `DATABASE_URL`): metadata store connection string
    /// - `FILESTASH_STORAGE_PATH`: blob directory
    pub fn apply_env_overrides(&mut self) {
        let url = std::env::var(DATABASE_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| {
                std::env::var(DATABASE_URL_FALLBACK_ENV)
                    .ok()
                    .filter(|v| !v.is_empty())
            });
        if let Some(url) = url {
            self.database.url = url;
        }

        if let Ok(path) = std::env::var(STORAGE_PATH_ENV) {
            if !path.is_empty() {
                self.files.storage_path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(StashError::Config(format!(
                "database url is empty. Set it in config.toml or via {DATABASE_URL_ENV}."
            )));
        }
        if self.files.max_upload_size_mb == 0 {
            return Err(StashError::Config(
                "files.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 5000);
        assert!(config.web.cors_origins.is_empty());

        assert_eq!(config.database.url, "sqlite://data/filestash.db?mode=rwc");

        assert_eq!(config.files.storage_path, "uploads");
        assert_eq!(config.files.max_upload_size_mb, 16);
        assert_eq!(config.files.max_upload_size_bytes(), 16 * 1024 * 1024);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/filestash.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[web]
host = "127.0.0.1"
port = 8080
cors_origins = ["http://localhost:3000"]

[database]
url = "sqlite::memory:"

[files]
storage_path = "custom/blobs"
max_upload_size_mb = 64

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.files.storage_path, "custom/blobs");
        assert_eq!(config.files.max_upload_size_mb, 64);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
    }

    #[test]
    fn test_max_upload_size_bytes_saturates() {
        let files = FilesConfig {
            max_upload_size_mb: u64::MAX / 2,
            ..FilesConfig::default()
        };
        assert_eq!(files.max_upload_size_bytes(), u64::MAX);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[files]
storage_path = "blobs"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.files.storage_path, "blobs");
        assert_eq!(config.files.max_upload_size_mb, 16);
        assert_eq!(config.web.port, 5000);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        match result {
            Err(StashError::Config(msg)) => assert!(msg.contains("config parse error")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(StashError::Io(_))));
    }

    // Both env cases live in one test so they cannot race each other.
    #[test]
    fn test_apply_env_overrides() {
        let original_primary = std::env::var(DATABASE_URL_ENV).ok();
        let original_fallback = std::env::var(DATABASE_URL_FALLBACK_ENV).ok();

        std::env::remove_var(DATABASE_URL_ENV);
        std::env::set_var(DATABASE_URL_FALLBACK_ENV, "sqlite://fallback.db");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.database.url, "sqlite://fallback.db");

        std::env::set_var(DATABASE_URL_ENV, "sqlite://primary.db");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.database.url, "sqlite://primary.db");

        std::env::set_var(DATABASE_URL_ENV, "");
        std::env::remove_var(DATABASE_URL_FALLBACK_ENV);
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.database.url, default_db_url());

        match original_primary {
            Some(val) => std::env::set_var(DATABASE_URL_ENV, val),
            None => std::env::remove_var(DATABASE_URL_ENV),
        }
        match original_fallback {
            Some(val) => std::env::set_var(DATABASE_URL_FALLBACK_ENV, val),
            None => std::env::remove_var(DATABASE_URL_FALLBACK_ENV),
        }
    }

    #[test]
    fn test_validate_empty_url() {
        let mut config = Config::default();
        config.database.url = "  ".to_string();

        match config.validate() {
            Err(StashError::Config(msg)) => assert!(msg.contains(DATABASE_URL_ENV)),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_zero_upload_size() {
        let mut config = Config::default();
        config.files.max_upload_size_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_parses() {
        let config = Config::parse(include_str!("../config.example.toml")).unwrap();
        assert_eq!(config.web.port, 5000);
        assert_eq!(config.files.max_upload_size_mb, 16);
        assert!(config.validate().is_ok());
    }
}
