//! Configuration management for logview.
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
use url::Url;

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "logview";

/// Default session file name.
const SESSION_FILE_NAME: &str = "session.json";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `LOGVIEW_`, `__` as separator)
/// 2. TOML config file at `~/.config/logview/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API server configuration.
    pub api: ApiConfig,
    /// Session persistence configuration.
    pub session: SessionConfig,
}

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the logsys server.
    pub server_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Session persistence configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path to the session file.
    /// Defaults to `~/.local/share/logview/session.json`
    pub file_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8084".to_string(),
            timeout_secs: 30,
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
            .merge(Env::prefixed("LOGVIEW_").split("__"));

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
        if Url::parse(&self.api.server_url).is_err() {
            return Err(Error::ConfigValidation {
                message: format!("server_url is not a valid URL: {}", self.api.server_url),
            });
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// The server URL as a parsed [`Url`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL does not parse (validation
    /// normally catches this at load time).
    pub fn server_url(&self) -> Result<Url> {
        Url::parse(&self.api.server_url).map_err(|err| Error::ConfigValidation {
            message: format!("server_url is not a valid URL: {err}"),
        })
    }

    /// Get the session file path, resolving defaults if not set.
    #[must_use]
    pub fn session_file_path(&self) -> PathBuf {
        self.session
            .file_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(SESSION_FILE_NAME))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.server_url, "http://localhost:8084");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.session.file_path.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_server_url() {
        let mut config = Config::default();
        config.api.server_url = "not a url".to_string();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("server_url"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_server_url_parses() {
        let config = Config::default();
        let url = config.server_url().unwrap();
        assert_eq!(url.as_str(), "http://localhost:8084/");
    }

    #[test]
    fn test_session_file_path_default() {
        let config = Config::default();
        let path = config.session_file_path();
        assert!(path.to_string_lossy().contains("session.json"));
        assert!(path.to_string_lossy().contains("logview"));
    }

    #[test]
    fn test_session_file_path_custom() {
        let mut config = Config::default();
        config.session.file_path = Some(PathBuf::from("/custom/session.json"));
        assert_eq!(
            config.session_file_path(),
            PathBuf::from("/custom/session.json")
        );
    }

    #[test]
    fn test_timeout() {
        let config = Config::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("logview"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config_uses_defaults() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[api]\nserver_url = \"http://logs.example.test\"\ntimeout_secs = 5"
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.server_url, "http://logs.example.test");
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn test_load_partial_section_merges_with_defaults() {
        // A [api] table must land in the config, not be read as a profile
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[api]\nserver_url = \"http://logs.example.test\"").unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.server_url, "http://logs.example.test");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.session.file_path.is_none());
    }

    #[test]
    fn test_load_invalid_toml_values_fail_validation() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[api]\ntimeout_secs = 0").unwrap();

        let result = Config::load_from(Some(file.path().to_path_buf()));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("server_url"));
        assert!(json.contains("timeout_secs"));
    }

    #[test]
    fn test_config_clone_eq() {
        let config = Config::default();
        assert_eq!(config, config.clone());
    }
}
