//! `graphconn` Core Library
//!
//! This crate provides the core functionality for managing named graph
//! database connection aliases: the alias registry with change notification,
//! the XML alias document codec, and configuration handling.

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod registry;

pub use codec::{AliasCodec, DecodedAliases, SkippedElement, XmlAliasCodec};
pub use config::{AliasStore, AppSettings, ConfigManager, LoadNotification};
pub use error::{
    CodecError, CodecResult, ConfigError, ConfigResult, GraphConnError, RegistryError,
    RegistryResult,
};
pub use models::Alias;
pub use registry::{
    ActiveConnectionProbe, AliasRegistry, ConnectionListener, FnListener, IdleProbe,
    ListenerHandle, LoadOutcome, LoadReport, StaticProbe,
};
