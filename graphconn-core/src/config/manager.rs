//! Configuration manager for TOML file operations
//!
//! This module provides the `ConfigManager` which locates the configuration
//! directory, loads and saves application settings, and resolves where the
//! alias document lives.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

use super::settings::AppSettings;
use super::store::AliasStore;

/// File name of the application settings
const CONFIG_FILE: &str = "config.toml";

/// Directory name under the platform configuration directory
const APP_DIR: &str = "graphconn";

/// Configuration manager for `graphconn`
///
/// Handles loading and saving configuration files in TOML format.
/// Configuration is stored in `~/.config/graphconn/` by default.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Base directory for configuration files
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new `ConfigManager` with the default configuration directory
    ///
    /// The default directory is `~/.config/graphconn/`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from("~/.config")))?
            .join(APP_DIR);
        Ok(Self { config_dir })
    }

    /// Creates a new `ConfigManager` with a custom configuration directory
    ///
    /// This is useful for testing or non-standard configurations.
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Returns the configuration directory path
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Ensures the configuration directory exists
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> ConfigResult<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).map_err(|e| {
                ConfigError::Write(format!(
                    "Failed to create config directory {}: {}",
                    self.config_dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    // ========== Application Settings ==========

    /// Loads application settings from the configuration file
    ///
    /// Returns default settings if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or is invalid.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        let path = self.config_dir.join(CONFIG_FILE);
        let settings: AppSettings = Self::load_toml_file(&path)?;
        Self::validate_settings(&settings)?;
        Ok(settings)
    }

    /// Saves application settings to the configuration file
    ///
    /// Creates the configuration directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the file cannot be written.
    pub fn save_settings(&self, settings: &AppSettings) -> ConfigResult<()> {
        Self::validate_settings(settings)?;
        self.ensure_config_dir()?;
        let path = self.config_dir.join(CONFIG_FILE);
        Self::save_toml_file(&path, settings)
    }

    // ========== Alias Document ==========

    /// Resolves the alias document store for the given settings
    ///
    /// A configured `alias_file` is shell-expanded; relative results are
    /// taken relative to the configuration directory. Without an override
    /// the document is `aliases.xml` in the configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured path references an unknown variable.
    pub fn alias_store(&self, settings: &AppSettings) -> ConfigResult<AliasStore> {
        let Some(ref raw) = settings.registry.alias_file else {
            return Ok(AliasStore::in_dir(&self.config_dir));
        };

        let expanded = shellexpand::full(raw).map_err(|e| ConfigError::Validation {
            field: "registry.alias_file".to_string(),
            reason: e.to_string(),
        })?;

        let path = PathBuf::from(expanded.into_owned());
        if path.is_absolute() {
            Ok(AliasStore::new(path))
        } else {
            Ok(AliasStore::new(self.config_dir.join(path)))
        }
    }

    // ========== Generic TOML Operations ==========

    /// Loads and parses a TOML file
    ///
    /// Returns the default value if the file doesn't exist.
    fn load_toml_file<T>(path: &Path) -> ConfigResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read {}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| {
            ConfigError::Deserialize(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Saves data to a TOML file
    fn save_toml_file<T>(path: &Path, data: &T) -> ConfigResult<()>
    where
        T: serde::Serialize,
    {
        let content = toml::to_string_pretty(data)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize: {e}")))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::Write(format!("Failed to write {}: {}", path.display(), e)))
    }

    // ========== Validation ==========

    /// Validates application settings
    ///
    /// # Errors
    ///
    /// Returns an error if a setting is invalid.
    pub fn validate_settings(settings: &AppSettings) -> ConfigResult<()> {
        if settings.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "logging.level".to_string(),
                reason: "Log level cannot be empty".to_string(),
            });
        }

        if let Some(ref alias_file) = settings.registry.alias_file {
            if alias_file.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: "registry.alias_file".to_string(),
                    reason: "Alias file path cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}
