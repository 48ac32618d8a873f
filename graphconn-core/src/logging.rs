//! Tracing conventions shared across the crate
//!
//! Span names are kept as constants so subscribers can filter on them
//! without depending on string literals scattered through the code.

/// Names of the spans emitted by `graphconn-core`
pub mod span_names {
    /// Loading the alias set from disk
    pub const REGISTRY_LOAD: &str = "registry.load";
    /// Writing the alias set to disk
    pub const REGISTRY_SAVE: &str = "registry.save";
    /// Fan-out of a change notification to listeners
    pub const REGISTRY_NOTIFY: &str = "registry.notify";
}

/// Default filter directive used when neither `RUST_LOG` nor settings provide one
pub const DEFAULT_LOG_LEVEL: &str = "info";
