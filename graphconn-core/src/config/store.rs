//! File-backed storage for the alias document

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Default file name of the alias document inside the configuration directory
pub const ALIASES_FILE: &str = "aliases.xml";

/// Reads and writes the raw alias document at a fixed path
///
/// The store knows nothing about the document format; encoding is left to
/// an [`AliasCodec`](crate::codec::AliasCodec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasStore {
    path: PathBuf,
}

impl AliasStore {
    /// Creates a store for the given file path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store for the default file inside `config_dir`
    #[must_use]
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(config_dir.join(ALIASES_FILE))
    }

    /// Returns the path of the alias document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the alias document exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the alias document
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read as UTF-8 text.
    pub fn read(&self) -> ConfigResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::Parse(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Writes the alias document, replacing any previous contents
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the file cannot be written.
    pub fn write(&self, content: &str) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::Write(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        fs::write(&self.path, content).map_err(|e| {
            ConfigError::Write(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}
