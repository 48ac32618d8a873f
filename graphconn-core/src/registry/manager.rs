//! Alias registry with persistence and change notification
//!
//! This module provides the `AliasRegistry` which owns the set of connection
//! aliases, persists it through an `AliasStore`, and fans out change
//! notifications to registered listeners.

use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn};

use crate::codec::{AliasCodec, SkippedElement, XmlAliasCodec};
use crate::config::{AliasStore, AppSettings, ConfigManager, LoadNotification};
use crate::error::{ConfigResult, RegistryError, RegistryResult};
use crate::logging::span_names;
use crate::models::Alias;

use super::listener::{ConnectionListener, ListenerHandle};
use super::probe::ActiveConnectionProbe;

/// Where the aliases of the last `load` came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No alias file exists yet
    #[default]
    Missing,
    /// The file exists but could not be read
    Unreadable,
    /// The file is not an alias document (foreign root or not well-formed)
    Rejected,
    /// The document was decoded
    Loaded,
}

/// Summary of a `load` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Where the aliases came from
    pub outcome: LoadOutcome,
    /// Number of distinct aliases in the registry after loading
    pub loaded: usize,
    /// Alias elements that were rejected by the codec
    pub skipped: Vec<SkippedElement>,
}

/// Registry of connection aliases
///
/// Holds the in-memory alias set and the listeners interested in changes to
/// it. The set is only synchronized with disk by explicit [`load`](Self::load)
/// and [`save`](Self::save) calls.
pub struct AliasRegistry {
    /// Current aliases, unique by value
    aliases: HashSet<Alias>,
    /// Registered listeners in registration order
    listeners: Vec<(ListenerHandle, Arc<dyn ConnectionListener>)>,
    /// Id of the next listener registration
    next_listener_id: u64,
    /// Location of the alias document
    store: AliasStore,
    /// Document format
    codec: Box<dyn AliasCodec>,
    /// Notification behaviour of `load`
    load_notification: LoadNotification,
}

impl AliasRegistry {
    /// Creates an empty registry persisted at `store` in the XML format
    #[must_use]
    pub fn new(store: AliasStore) -> Self {
        Self {
            aliases: HashSet::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
            store,
            codec: Box::new(XmlAliasCodec::new()),
            load_notification: LoadNotification::default(),
        }
    }

    /// Creates an empty registry configured from application settings
    ///
    /// # Errors
    ///
    /// Returns an error if the alias file location cannot be resolved.
    pub fn from_settings(config: &ConfigManager, settings: &AppSettings) -> ConfigResult<Self> {
        let store = config.alias_store(settings)?;
        Ok(Self::new(store).with_load_notification(settings.registry.load_notification))
    }

    /// Replaces the document codec
    #[must_use]
    pub fn with_codec(mut self, codec: impl AliasCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Sets how listeners are notified during `load`
    #[must_use]
    pub const fn with_load_notification(mut self, mode: LoadNotification) -> Self {
        self.load_notification = mode;
        self
    }

    /// Returns the alias document store
    #[must_use]
    pub fn store(&self) -> &AliasStore {
        &self.store
    }

    // ========== Persistence ==========

    /// Replaces the alias set with the contents of the alias file
    ///
    /// A missing, unreadable, or foreign file leaves the registry empty
    /// without reporting an error. Alias elements that fail to decode are
    /// skipped and listed in the returned report.
    ///
    /// With [`LoadNotification::PerAlias`] every decoded alias goes through
    /// [`add`](Self::add) and notifies listeners; with
    /// [`LoadNotification::Coalesced`] listeners are notified exactly once
    /// after the set has been replaced.
    pub fn load(&mut self) -> LoadReport {
        let _span = info_span!(
            span_names::REGISTRY_LOAD,
            path = %self.store.path().display()
        )
        .entered();

        self.aliases.clear();

        let mut report = LoadReport::default();
        match self.store.read() {
            Ok(None) => {
                debug!("No alias file found; starting with an empty registry");
            }
            Err(e) => {
                warn!(error = %e, "Alias file is unreadable; starting with an empty registry");
                report.outcome = LoadOutcome::Unreadable;
            }
            Ok(Some(content)) => match self.codec.decode(&content) {
                Err(e) => {
                    warn!(error = %e, "Ignoring alias file that is not an alias document");
                    report.outcome = LoadOutcome::Rejected;
                }
                Ok(decoded) => {
                    report.outcome = LoadOutcome::Loaded;
                    for skipped in &decoded.skipped {
                        warn!(
                            index = skipped.index,
                            reason = %skipped.reason,
                            "Skipping invalid alias element"
                        );
                    }
                    report.skipped = decoded.skipped;

                    for alias in decoded.aliases {
                        match self.load_notification {
                            LoadNotification::PerAlias => {
                                self.add(alias);
                            }
                            LoadNotification::Coalesced => {
                                self.aliases.insert(alias);
                            }
                        }
                    }
                }
            },
        }

        if self.load_notification == LoadNotification::Coalesced {
            self.model_changed();
        }

        report.loaded = self.aliases.len();
        info!(
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "Alias registry loaded"
        );
        report
    }

    /// Writes every alias to the alias file, replacing its previous contents
    ///
    /// Aliases are written sorted so that the file is stable across saves.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    pub fn save(&self) -> RegistryResult<()> {
        let _span = info_span!(
            span_names::REGISTRY_SAVE,
            path = %self.store.path().display(),
            alias_count = self.aliases.len()
        )
        .entered();

        let content = self.codec.encode(&self.sorted_aliases())?;
        self.store.write(&content)?;

        info!(saved = self.aliases.len(), "Alias registry saved");
        Ok(())
    }

    // ========== Alias Set ==========

    /// Adds an alias and notifies listeners
    ///
    /// Adding a value that is already present leaves the set unchanged but
    /// still notifies. Returns true if the alias was newly inserted.
    pub fn add(&mut self, alias: Alias) -> bool {
        let inserted = self.aliases.insert(alias);
        self.model_changed();
        inserted
    }

    /// Removes an alias and notifies listeners
    ///
    /// The alias of the running connection cannot be removed. Listeners are
    /// notified even if the alias was not present. Returns true if it was.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AliasInUse`] if `probe` reports a running
    /// connection using `alias`; the set is left unchanged and no listener
    /// is notified.
    pub fn remove(
        &mut self,
        alias: &Alias,
        probe: &dyn ActiveConnectionProbe,
    ) -> RegistryResult<bool> {
        if probe.is_in_use(alias) {
            warn!(alias = %alias, "Refusing to delete the alias of the running connection");
            return Err(RegistryError::AliasInUse {
                name: alias.name.clone(),
                uri: alias.uri.clone(),
            });
        }

        let removed = self.aliases.remove(alias);
        self.model_changed();
        Ok(removed)
    }

    /// Returns the current aliases
    ///
    /// No ordering is guaranteed; see [`sorted_aliases`](Self::sorted_aliases).
    #[must_use]
    pub fn aliases(&self) -> &HashSet<Alias> {
        &self.aliases
    }

    /// Returns the current aliases sorted by name, then URI
    #[must_use]
    pub fn sorted_aliases(&self) -> Vec<&Alias> {
        let mut aliases: Vec<&Alias> = self.aliases.iter().collect();
        aliases.sort();
        aliases
    }

    /// Returns every alias with the given display name
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Vec<&Alias> {
        let mut found: Vec<&Alias> = self.aliases.iter().filter(|a| a.name == name).collect();
        found.sort();
        found
    }

    /// Returns true if an equal alias is registered
    #[must_use]
    pub fn contains(&self, alias: &Alias) -> bool {
        self.aliases.contains(alias)
    }

    /// Returns the number of aliases
    #[must_use]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if there are no aliases
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    // ========== Listeners ==========

    /// Registers a listener for change notifications
    ///
    /// Listeners are not deduplicated: registering the same listener twice
    /// delivers two notifications per change.
    pub fn register_listener(&mut self, listener: Arc<dyn ConnectionListener>) -> ListenerHandle {
        let handle = ListenerHandle::new(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((handle, listener));
        handle
    }

    /// Removes the registration identified by `handle`
    ///
    /// Returns false if the handle was already unregistered.
    pub fn unregister_listener(&mut self, handle: ListenerHandle) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(h, _)| *h != handle);
        self.listeners.len() != before
    }

    /// Returns the number of registered listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Notifies every listener, in registration order, that the set changed
    ///
    /// A panicking listener is logged and skipped; the remaining listeners
    /// are still notified.
    pub fn model_changed(&self) {
        let _span = info_span!(
            span_names::REGISTRY_NOTIFY,
            listener_count = self.listeners.len()
        )
        .entered();

        for (handle, listener) in &self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.notify_changed()));
            if let Err(payload) = outcome {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(listener = handle.id(), panic = %message, "Connection listener panicked");
            }
        }
    }
}

impl ConnectionListener for AliasRegistry {
    fn notify_changed(&self) {
        self.model_changed();
    }
}

impl fmt::Debug for AliasRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasRegistry")
            .field("aliases", &self.aliases)
            .field("listeners", &self.listeners.len())
            .field("store", &self.store)
            .field("load_notification", &self.load_notification)
            .finish_non_exhaustive()
    }
}
