//! Alias model representing a named graph database connection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// A named connection configuration
///
/// Aliases are plain values: two aliases are equal only when every field is
/// equal, so the same display name may appear on several distinct aliases.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Alias {
    /// Human-readable name for the connection
    pub name: String,
    /// Database location (`bolt://host:7687`, `http://...`, or a local store path)
    pub uri: String,
    /// Username for authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Password for authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Allow store format upgrades when opening a local database
    #[serde(default)]
    pub allow_upgrade: bool,
    /// Open the database in read-only mode
    #[serde(default)]
    pub read_only: bool,
}

impl Alias {
    /// Creates a new alias with no credentials and default flags
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            user_name: None,
            password: None,
            allow_upgrade: false,
            read_only: false,
        }
    }

    /// Sets the username used to authenticate
    #[must_use]
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Sets the password used to authenticate
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets whether store upgrades are allowed
    #[must_use]
    pub const fn with_allow_upgrade(mut self, allow_upgrade: bool) -> Self {
        self.allow_upgrade = allow_upgrade;
        self
    }

    /// Sets whether the database is opened read-only
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Validates that the alias has the fields required to connect
    ///
    /// # Errors
    ///
    /// Returns an error if the name or URI is empty.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "name".to_string(),
                reason: "Alias name cannot be empty".to_string(),
            });
        }

        if self.uri.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "uri".to_string(),
                reason: "Alias URI cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl fmt::Debug for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alias")
            .field("name", &self.name)
            .field("uri", &self.uri)
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("allow_upgrade", &self.allow_upgrade)
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.uri)
    }
}
