//! Bot configuration from environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::{ApiError, Bot, DEFAULT_API_ROOT};

/// Connection settings for the Bot API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot token (obtain from <https://t.me/BotFather>).
    pub token: String,

    /// Bot API endpoint; override when running a local Bot API server.
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// Minimum interval between message sends in milliseconds; `0` sends
    /// unpaced.
    #[serde(default)]
    pub send_interval_ms: u64,
}

fn default_api_root() -> String {
    DEFAULT_API_ROOT.to_owned()
}

impl BotConfig {
    /// Creates a configuration with defaults for everything but the token.
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token,
            api_root: default_api_root(),
            send_interval_ms: 0,
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `BOT_TOKEN` to be set. `BOT_API_ROOT` and
    /// `BOT_SEND_INTERVAL_MS` are optional.
    ///
    /// # Errors
    ///
    /// Returns an error if `BOT_TOKEN` is missing or the interval is not a
    /// whole number of milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token =
            std::env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingEnvVar("BOT_TOKEN"))?;

        let api_root = std::env::var("BOT_API_ROOT").unwrap_or_else(|_| default_api_root());

        let send_interval_ms = match std::env::var("BOT_SEND_INTERVAL_MS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidSendInterval)?,
            Err(_) => 0,
        };

        Ok(Self {
            token,
            api_root,
            send_interval_ms,
        })
    }

    /// Builds a [`Bot`] client from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn client(&self) -> Result<Bot, ApiError> {
        Bot::builder(self.token.clone())
            .with_api_root(self.api_root.clone())
            .with_send_interval(Duration::from_millis(self.send_interval_ms))
            .build()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid send interval (must be whole milliseconds)")]
    InvalidSendInterval,
}
