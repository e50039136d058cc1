//! # Configuration
//!
//! Native front ends resolve their settings from, in increasing precedence:
//! built-in defaults, an optional TOML or JSON file, `POLICYDESK_*`
//! environment variables, and command-line overrides.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, time::Duration};
use thiserror::Error;
use url::Url;

/// Default API origin.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

const ENV_API_BASE_URL: &str = "POLICYDESK_API_URL";
const ENV_LOG_LEVEL: &str = "POLICYDESK_LOG_LEVEL";
const ENV_REQUEST_TIMEOUT: &str = "POLICYDESK_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported configuration format {0:?}; use 'toml' or 'json'")]
    UnsupportedFormat(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Settings for a native PolicyDesk client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the policy API, e.g. `http://localhost:8000`
    pub api_base_url: String,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ClientConfig {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_level: "info".to_string(),
            request_timeout_secs: 30,
        }
    }

    /// Loads the configuration from a file, the process environment, or defaults.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to a `.toml` or `.json` file.
    /// * `base_url_override` - Optional API origin that wins over every other source.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or a
    /// resolved value fails validation.
    pub fn load_config(
        config_path: Option<PathBuf>,
        base_url_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::load_config_with_env(config_path, base_url_override, |key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::load_config`], reading variables through `lookup`.
    ///
    /// # Errors
    /// See [`ClientConfig::load_config`].
    pub fn load_config_with_env<F>(
        config_path: Option<PathBuf>,
        base_url_override: Option<String>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };

        // Environment only fills fields the file left at their defaults
        let defaults = Self::with_defaults();
        if config.api_base_url == defaults.api_base_url
            && let Some(url) = lookup(ENV_API_BASE_URL)
        {
            config.api_base_url = url;
        }
        if config.log_level == defaults.log_level
            && let Some(level) = lookup(ENV_LOG_LEVEL)
        {
            config.log_level = level;
        }
        if config.request_timeout_secs == defaults.request_timeout_secs
            && let Some(raw) = lookup(ENV_REQUEST_TIMEOUT)
        {
            config.request_timeout_secs =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_REQUEST_TIMEOUT,
                    message: format!("{raw:?} is not a whole number of seconds"),
                })?;
        }

        if let Some(url) = base_url_override {
            config.api_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Check the resolved values.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for a non-http(s) base URL or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// The parsed API origin.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] when the URL does not parse or is not http(s).
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_base_url).map_err(|err| ConfigError::InvalidValue {
            key: "api_base_url",
            message: err.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::InvalidValue {
                key: "api_base_url",
                message: format!("unsupported scheme {scheme:?}"),
            }),
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Render the configuration in the given file format.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedFormat`] for anything but `toml` or `json`.
    pub fn render(&self, format: &str) -> Result<String, ConfigError> {
        match format {
            "toml" => {
                toml::to_string_pretty(self).map_err(|err| ConfigError::Serialize(err.to_string()))
            }
            "json" => serde_json::to_string_pretty(self)
                .map_err(|err| ConfigError::Serialize(err.to_string())),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}
