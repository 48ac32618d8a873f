//! Configuration management for `graphconn`
//!
//! This module provides the `ConfigManager` for loading and saving
//! settings in TOML format, and the `AliasStore` that holds the alias
//! document on disk.

mod manager;
pub mod settings;
mod store;

pub use manager::ConfigManager;
pub use settings::{AppSettings, LoadNotification, LoggingSettings, RegistrySettings};
pub use store::{AliasStore, ALIASES_FILE};
