//! Alias registry module
//!
//! This module provides the `AliasRegistry`, which owns the set of connection
//! aliases, persists it to the alias file, notifies listeners of changes, and
//! refuses to delete the alias of the running connection.

mod listener;
mod manager;
mod probe;

pub use listener::{ConnectionListener, FnListener, ListenerHandle};
pub use manager::{AliasRegistry, LoadOutcome, LoadReport};
pub use probe::{ActiveConnectionProbe, IdleProbe, StaticProbe};
