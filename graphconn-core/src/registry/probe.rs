//! Access to the state of the running database connection.

use crate::models::Alias;

/// Reports whether a connection service is running and which alias it uses.
///
/// The registry consults the probe only when deleting an alias, so that the
/// alias of the live connection cannot be removed.
pub trait ActiveConnectionProbe {
    /// Returns true if a connection service is currently running
    fn is_running(&self) -> bool;

    /// Returns the alias the running service was started with, if any
    fn current_alias(&self) -> Option<Alias>;

    /// Returns true if `alias` belongs to the running connection
    fn is_in_use(&self, alias: &Alias) -> bool {
        self.is_running() && self.current_alias().as_ref() == Some(alias)
    }
}

/// Probe for contexts without a connection service; never running.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleProbe;

impl ActiveConnectionProbe for IdleProbe {
    fn is_running(&self) -> bool {
        false
    }

    fn current_alias(&self) -> Option<Alias> {
        None
    }
}

/// Probe reporting a fixed connection state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StaticProbe {
    running: bool,
    alias: Option<Alias>,
}

impl StaticProbe {
    /// A running service connected with `alias`
    #[must_use]
    pub const fn running(alias: Alias) -> Self {
        Self {
            running: true,
            alias: Some(alias),
        }
    }

    /// A stopped service that remembers the alias it last used
    #[must_use]
    pub const fn stopped(alias: Option<Alias>) -> Self {
        Self {
            running: false,
            alias,
        }
    }
}

impl ActiveConnectionProbe for StaticProbe {
    fn is_running(&self) -> bool {
        self.running
    }

    fn current_alias(&self) -> Option<Alias> {
        self.alias.clone()
    }
}
