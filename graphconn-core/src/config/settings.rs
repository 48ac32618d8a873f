//! Application settings model
//!
//! This module defines the application-wide settings stored in config.toml.

use serde::{Deserialize, Serialize};

use crate::logging::DEFAULT_LOG_LEVEL;

/// Application-wide settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Alias registry settings
    #[serde(default)]
    pub registry: RegistrySettings,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set (e.g. `info`, `graphconn_core=debug`)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// How listeners are notified while the alias file is loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadNotification {
    /// One notification per loaded alias, exactly as if each had been added
    #[default]
    PerAlias,
    /// A single notification once loading has finished
    Coalesced,
}

/// Alias registry settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Custom alias file location; `~` and environment variables are expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_file: Option<String>,
    /// Notification behaviour while loading
    #[serde(default)]
    pub load_notification: LoadNotification,
}
