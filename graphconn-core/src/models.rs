//! Core data models for `graphconn`
//!
//! This module defines the connection alias record managed by the registry.

mod alias;

pub use alias::Alias;
