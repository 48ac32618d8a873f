//! Property-based tests for alias registry operations
//!
//! Covers value uniqueness, listener notification counts, and the guarded
//! delete of the alias used by the running connection.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use graphconn_core::{
    Alias, AliasRegistry, AliasStore, ConnectionListener, IdleProbe, RegistryError, StaticProbe,
};
use proptest::prelude::*;
use tempfile::TempDir;

use super::generators::{arb_add_sequence, arb_alias};

#[derive(Default)]
struct CountingListener {
    count: AtomicUsize,
}

impl CountingListener {
    fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl ConnectionListener for CountingListener {
    fn notify_changed(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

fn create_registry() -> (AliasRegistry, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let registry = AliasRegistry::new(AliasStore::in_dir(temp_dir.path()));
    (registry, temp_dir)
}

fn register_counters(registry: &mut AliasRegistry, n: usize) -> Vec<Arc<CountingListener>> {
    (0..n)
        .map(|_| {
            let listener = Arc::new(CountingListener::default());
            registry.register_listener(listener.clone());
            listener
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any sequence of adds leaves exactly one entry per distinct value
    #[test]
    fn add_sequence_has_no_duplicates(sequence in arb_add_sequence()) {
        let (mut registry, _temp) = create_registry();
        let listeners = register_counters(&mut registry, 2);

        for alias in &sequence {
            registry.add(alias.clone());
        }

        let distinct: HashSet<Alias> = sequence.iter().cloned().collect();
        prop_assert_eq!(registry.len(), distinct.len());
        prop_assert_eq!(registry.aliases(), &distinct);

        // Every add notifies, including re-adds of an existing value
        for listener in &listeners {
            prop_assert_eq!(listener.count(), sequence.len());
        }
    }

    /// Adding an equal value twice leaves the size unchanged
    #[test]
    fn re_adding_equal_value_keeps_size(alias in arb_alias()) {
        let (mut registry, _temp) = create_registry();

        prop_assert!(registry.add(alias.clone()));
        let size = registry.len();
        prop_assert!(!registry.add(alias));
        prop_assert_eq!(registry.len(), size);
    }

    /// Removing a present alias while idle shrinks the set by one and
    /// notifies each listener exactly once
    #[test]
    fn remove_when_idle_notifies_once(
        sequence in arb_add_sequence(),
        pick in any::<prop::sample::Index>(),
        listener_count in 1usize..4,
    ) {
        prop_assume!(!sequence.is_empty());
        let (mut registry, _temp) = create_registry();
        for alias in &sequence {
            registry.add(alias.clone());
        }
        let target = pick.get(&sequence).clone();
        let before = registry.len();

        let listeners = register_counters(&mut registry, listener_count);
        let removed = registry.remove(&target, &IdleProbe).unwrap();

        prop_assert!(removed);
        prop_assert_eq!(registry.len(), before - 1);
        prop_assert!(!registry.contains(&target));
        for listener in &listeners {
            prop_assert_eq!(listener.count(), 1);
        }
    }

    /// Removing the alias of the running connection changes nothing
    #[test]
    fn remove_in_use_is_refused(
        sequence in arb_add_sequence(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!sequence.is_empty());
        let (mut registry, _temp) = create_registry();
        for alias in &sequence {
            registry.add(alias.clone());
        }
        let target = pick.get(&sequence).clone();
        let before = registry.aliases().clone();

        let listeners = register_counters(&mut registry, 2);
        let result = registry.remove(&target, &StaticProbe::running(target.clone()));

        let refused = matches!(result, Err(RegistryError::AliasInUse { .. }));
        prop_assert!(refused);
        prop_assert_eq!(registry.aliases(), &before);
        for listener in &listeners {
            prop_assert_eq!(listener.count(), 0);
        }
    }

    /// A running connection only guards its own alias
    #[test]
    fn running_connection_guards_only_its_alias(a in arb_alias(), b in arb_alias()) {
        prop_assume!(a != b);
        let (mut registry, _temp) = create_registry();
        registry.add(a.clone());
        registry.add(b.clone());

        let probe = StaticProbe::running(a.clone());
        prop_assert!(registry.remove(&b, &probe).unwrap());
        prop_assert!(registry.remove(&a, &probe).is_err());
        prop_assert_eq!(registry.len(), 1);
    }
}

#[test]
fn two_listeners_observe_single_add() {
    let (mut registry, _temp) = create_registry();
    let listeners = register_counters(&mut registry, 2);

    registry.add(Alias::new("prod", "bolt://db1"));

    assert_eq!(listeners[0].count(), 1);
    assert_eq!(listeners[1].count(), 1);
    assert_eq!(
        registry.aliases().iter().collect::<Vec<_>>(),
        vec![&Alias::new("prod", "bolt://db1")]
    );
}
