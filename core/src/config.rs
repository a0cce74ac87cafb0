//! Client configuration.
//!
//! Every section has defaults, so an empty TOML document is a valid config.
//! Only the API base URL and token are provisioned from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::{LogFormat, LoggingConfig, LoggingError};

pub const ENV_API_URL: &str = "GOIABA_API_URL";
pub const ENV_API_TOKEN: &str = "GOIABA_API_TOKEN";

const DEFAULT_BASE_URL: &str = "http://localhost:1337/api";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub timing: TimingConfig,
    pub logging: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }
}

/// Delays driving view-model transitions, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Minimum time a request sequence stays in `Loading`.
    pub loading_delay_ms: u64,
    /// How long a write confirmation stays visible before the modal closes.
    pub modal_close_delay_ms: u64,
    /// How long the delete confirmation stays visible before navigating away.
    pub navigate_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            loading_delay_ms: 0,
            modal_close_delay_ms: 500,
            navigate_delay_ms: 1500,
        }
    }
}

impl TimingConfig {
    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }

    pub fn modal_close_delay(&self) -> Duration {
        Duration::from_millis(self.modal_close_delay_ms)
    }

    pub fn navigate_delay(&self) -> Duration {
        Duration::from_millis(self.navigate_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Install the global log subscriber described by the `[logging]` section.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        LoggingConfig::from_settings(&self.logging).try_init()
    }

    /// Apply `GOIABA_API_URL` / `GOIABA_API_TOKEN` when set and non-empty.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        self.apply_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_API_TOKEN).ok(),
        );
        self.validate()?;
        Ok(self)
    }

    fn apply_overrides(&mut self, base_url: Option<String>, token: Option<String>) {
        if let Some(url) = base_url.filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = token.filter(|v| !v.trim().is_empty()) {
            self.api.token = Some(token);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                field: "api.base_url",
                reason: format!("expected an http(s) URL, got {url:?}"),
            });
        }
        Ok(())
    }
}
