//! Change listeners for the alias registry.
//!
//! Listeners are notified synchronously, on the caller's thread, whenever the
//! alias set changes.

use std::sync::{RwLock, TryLockError};

use tracing::warn;

/// Capability notified when the alias set changes.
///
/// The registry holds listeners behind an `Arc` and never owns their
/// lifecycle. [`AliasRegistry`](super::AliasRegistry) itself implements this
/// trait so registries can be chained.
pub trait ConnectionListener: Send + Sync {
    /// Called after every change to the alias set.
    fn notify_changed(&self);
}

/// Opaque token identifying one listener registration.
///
/// Returned by [`AliasRegistry::register_listener`](super::AliasRegistry::register_listener)
/// and accepted by `unregister_listener`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric id of this registration
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// A listener that invokes a closure on every change.
///
/// Useful for connecting notifications to UI refreshes or logging.
pub struct FnListener<F>
where
    F: Fn() + Send + Sync,
{
    callback: F,
}

impl<F> FnListener<F>
where
    F: Fn() + Send + Sync,
{
    /// Creates a new closure-based listener.
    #[must_use]
    pub const fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ConnectionListener for FnListener<F>
where
    F: Fn() + Send + Sync,
{
    fn notify_changed(&self) {
        (self.callback)();
    }
}

/// Forwards notifications to a listener shared behind a lock.
///
/// This lets a registry that is still mutated by its owner be chained as a
/// listener of another registry. A lock that is currently held for writing,
/// or poisoned, is skipped instead of blocking the notifying thread.
impl<T> ConnectionListener for RwLock<T>
where
    T: ConnectionListener,
{
    fn notify_changed(&self) {
        match self.try_read() {
            Ok(inner) => inner.notify_changed(),
            Err(TryLockError::WouldBlock) => {
                warn!("Listener is locked for writing; change notification skipped");
            }
            Err(TryLockError::Poisoned(_)) => {
                warn!("Listener lock is poisoned; change notification skipped");
            }
        }
    }
}
