//! Error types for `graphconn`
//!
//! This module defines all error types used throughout the crate, covering
//! registry operations, alias file encoding/decoding, and configuration files.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for `graphconn` operations
#[derive(Debug, Error)]
pub enum GraphConnError {
    /// Alias registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Alias file codec errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by the alias registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The alias is used by the running connection and cannot be deleted
    #[error(
        "Alias '{name}' is in use by the running connection; stop the service before deleting it"
    )]
    AliasInUse {
        /// Display name of the refused alias
        name: String,
        /// URI of the refused alias
        uri: String,
    },

    /// The alias set could not be encoded for persistence
    #[error("Failed to encode alias document: {0}")]
    Codec(#[from] CodecError),

    /// Persisting the alias set failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while encoding or decoding an alias document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The document root is not the aliases collection element
    #[error("Unexpected root element '{found}'")]
    RootMismatch {
        /// Name of the root element that was found
        found: String,
    },

    /// The document is not well-formed
    #[error("Malformed alias document: {0}")]
    Malformed(String),
}

/// Errors related to configuration file operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {reason}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// The reason for validation failure
        reason: String,
    },

    /// Configuration directory could not be determined
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to write configuration file
    #[error("Failed to write configuration: {0}")]
    Write(String),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Failed to deserialize configuration
    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(String),
}

/// Result type alias for `graphconn` operations
pub type Result<T> = std::result::Result<T, GraphConnError>;

/// Result type alias for registry operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Result type alias for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
