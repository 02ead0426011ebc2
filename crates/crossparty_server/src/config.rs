//! Server configuration.
//!
//! Resolution order, lowest precedence first: built-in defaults, the TOML
//! file, `CROSSPARTY_*` environment variables, command-line flags.

use crossparty_board::DEFAULT_SIZE;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::error::ConfigError;

/// Default configuration file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "crossparty.toml";

/// Environment variable overriding the bind host.
pub const HOST_ENV: &str = "CROSSPARTY_HOST";

/// Environment variable overriding the bind port.
pub const PORT_ENV: &str = "CROSSPARTY_PORT";

/// Largest board the server will host.
pub const MAX_BOARD_SIZE: usize = 16;

/// Runtime settings for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    host: String,

    /// TCP port to listen on.
    port: u16,

    /// Default `tracing` filter when `RUST_LOG` is unset.
    log_filter: String,

    /// Board side length for new games.
    board_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
            log_filter: "info,crossparty_server=debug".to_string(),
            board_size: DEFAULT_SIZE,
        }
    }
}

impl ServerConfig {
    /// Parses configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid TOML for this shape.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists, or
    /// falls back to defaults. An explicit path that is missing is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on unreadable or invalid files.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Applies `CROSSPARTY_HOST` / `CROSSPARTY_PORT` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the port variable is not a valid port.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.with_env(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the port value is not a valid port.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.trim().is_empty()) {
            debug!(%host, "Host overridden from environment");
            self.host = host;
        }
        if let Some(raw) = lookup(PORT_ENV) {
            self.port = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {}={:?}: {}", PORT_ENV, raw, e)))?;
            debug!(port = self.port, "Port overridden from environment");
        }
        Ok(self)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Checks the resolved values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::new("host must not be empty"));
        }
        if !(1..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::new(format!(
                "board_size must be between 1 and {}, got {}",
                MAX_BOARD_SIZE, self.board_size
            )));
        }
        Ok(())
    }

    /// `host:port` string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 5050);
        assert_eq!(*config.board_size(), 3);
        assert_eq!(config.bind_address(), "0.0.0.0:5050");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml_str("port = 6000\n").expect("parse");
        assert_eq!(*config.port(), 6000);
        assert_eq!(config.host(), "0.0.0.0");
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::default()
            .with_env(|key| match key {
                HOST_ENV => Some("127.0.0.1".to_string()),
                PORT_ENV => Some("7070".to_string()),
                _ => None,
            })
            .expect("env");
        assert_eq!(config.bind_address(), "127.0.0.1:7070");
    }

    #[test]
    fn test_bad_env_port() {
        let err = ServerConfig::default()
            .with_env(|key| (key == PORT_ENV).then(|| "many".to_string()))
            .expect_err("bad port");
        assert!(err.message.contains(PORT_ENV));
    }

    #[test]
    fn test_cli_beats_env() {
        let config = ServerConfig::default()
            .with_env(|key| (key == PORT_ENV).then(|| "7070".to_string()))
            .expect("env")
            .with_overrides(None, Some(8080));
        assert_eq!(*config.port(), 8080);
    }

    #[test]
    fn test_validate_board_size() {
        let config = ServerConfig::from_toml_str("board_size = 0").expect("parse");
        assert!(config.validate().is_err());
        let config = ServerConfig::from_toml_str("board_size = 4").expect("parse");
        assert!(config.validate().is_ok());
    }
}
