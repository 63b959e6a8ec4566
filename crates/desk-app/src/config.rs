//! Application configuration.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feed reconnect configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base delay for exponential backoff (ms).
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,
    /// Maximum delay for exponential backoff (ms).
    #[serde(default = "default_reconnect_max_delay_ms")]
    pub reconnect_max_delay_ms: u64,
}

fn default_reconnect_base_delay_ms() -> u64 {
    1_000
}

fn default_reconnect_max_delay_ms() -> u64 {
    60_000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
            reconnect_max_delay_ms: default_reconnect_max_delay_ms(),
        }
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a notification stays visible before auto-expiring (ms).
    #[serde(default = "default_notification_ttl_ms")]
    pub ttl_ms: u64,
}

fn default_notification_ttl_ms() -> u64 {
    5_000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_notification_ttl_ms(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Daemon base URL.
    #[serde(default = "default_daemon_url")]
    pub daemon_url: String,
    /// Basic-auth username.
    #[serde(default = "default_username")]
    pub username: String,
    /// Environment variable the password is read from. Keeps the secret
    /// out of the config file.
    #[serde(default = "default_password_env")]
    pub password_env: String,
    /// Feed reconnect settings.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Notification settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

fn default_daemon_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_username() -> String {
    "maker".to_string()
}

fn default_password_env() -> String {
    "DESK_PASSWORD".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            daemon_url: default_daemon_url(),
            username: default_username(),
            password_env: default_password_env(),
            feed: FeedConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, preferring the `DESK_CONFIG` env var path and
    /// falling back to defaults when no file exists.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("DESK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Resolve the daemon password from the configured env var.
    pub fn password(&self) -> AppResult<String> {
        std::env::var(&self.password_env).map_err(|_| {
            AppError::Config(format!(
                "Password env var {} is not set",
                self.password_env
            ))
        })
    }
}
