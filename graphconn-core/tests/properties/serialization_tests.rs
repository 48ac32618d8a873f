//! Property-based tests for alias persistence
//!
//! Covers the save/load round trip through the alias file and the handling
//! of documents that are not alias documents.

use std::collections::HashSet;

use graphconn_core::{
    Alias, AliasCodec, AliasRegistry, AliasStore, LoadNotification, LoadOutcome, XmlAliasCodec,
};
use proptest::prelude::*;
use tempfile::TempDir;

use super::generators::{arb_add_sequence, arb_alias};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// save followed by load on a fresh location reproduces the set
    #[test]
    fn save_load_round_trip(sequence in arb_add_sequence()) {
        let temp = TempDir::new().unwrap();
        let store = AliasStore::in_dir(temp.path());

        let mut saved = AliasRegistry::new(store.clone());
        for alias in &sequence {
            saved.add(alias.clone());
        }
        saved.save().unwrap();

        let mut restored = AliasRegistry::new(store);
        let report = restored.load();

        prop_assert_eq!(report.outcome, LoadOutcome::Loaded);
        prop_assert!(report.skipped.is_empty());
        prop_assert_eq!(restored.aliases(), saved.aliases());
    }

    /// The coalesced load mode produces the same set as the per-alias mode
    #[test]
    fn load_modes_agree(sequence in arb_add_sequence()) {
        let temp = TempDir::new().unwrap();
        let store = AliasStore::in_dir(temp.path());

        let mut saved = AliasRegistry::new(store.clone());
        for alias in &sequence {
            saved.add(alias.clone());
        }
        saved.save().unwrap();

        let mut per_alias = AliasRegistry::new(store.clone());
        per_alias.load();
        let mut coalesced =
            AliasRegistry::new(store).with_load_notification(LoadNotification::Coalesced);
        coalesced.load();

        prop_assert_eq!(per_alias.aliases(), coalesced.aliases());
    }

    /// Codec decoding inverts encoding for any alias list
    #[test]
    fn codec_decode_inverts_encode(aliases in prop::collection::vec(arb_alias(), 0..8)) {
        let codec = XmlAliasCodec::new();
        let refs: Vec<&Alias> = aliases.iter().collect();

        let document = codec.encode(&refs).unwrap();
        let decoded = codec.decode(&document).unwrap();

        prop_assert!(decoded.skipped.is_empty());
        prop_assert_eq!(decoded.aliases, aliases);
    }

    /// A document whose root is not `aliases` loads as an empty set
    #[test]
    fn foreign_root_loads_empty(
        root in "[a-z][a-z-]{0,10}",
        sequence in arb_add_sequence(),
    ) {
        prop_assume!(root != "aliases");
        let temp = TempDir::new().unwrap();
        let store = AliasStore::in_dir(temp.path());

        let mut saved = AliasRegistry::new(store.clone());
        for alias in &sequence {
            saved.add(alias.clone());
        }
        saved.save().unwrap();

        let document = store.read().unwrap().unwrap();
        let foreign = document
            .replace("<aliases>", &format!("<{root}>"))
            .replace("</aliases>", &format!("</{root}>"))
            .replace("<aliases/>", &format!("<{root}/>"));
        store.write(&foreign).unwrap();

        let mut registry = AliasRegistry::new(store);
        registry.add(Alias::new("stale", "bolt://old"));
        let report = registry.load();

        prop_assert_eq!(report.outcome, LoadOutcome::Rejected);
        prop_assert!(registry.is_empty());
    }
}

#[test]
fn load_missing_file_is_empty() {
    let temp = TempDir::new().unwrap();
    let mut registry = AliasRegistry::new(AliasStore::in_dir(temp.path()));

    let report = registry.load();

    assert_eq!(report.outcome, LoadOutcome::Missing);
    assert!(registry.is_empty());
}

#[test]
fn save_overwrites_previous_contents() {
    let temp = TempDir::new().unwrap();
    let store = AliasStore::in_dir(temp.path());

    let mut registry = AliasRegistry::new(store.clone());
    registry.add(Alias::new("prod", "bolt://db1"));
    registry.add(Alias::new("staging", "bolt://db2"));
    registry.save().unwrap();

    registry
        .remove(&Alias::new("staging", "bolt://db2"), &graphconn_core::IdleProbe)
        .unwrap();
    registry.save().unwrap();

    let mut reloaded = AliasRegistry::new(store);
    reloaded.load();
    let expected: HashSet<Alias> = [Alias::new("prod", "bolt://db1")].into_iter().collect();
    assert_eq!(reloaded.aliases(), &expected);
}

#[test]
fn reads_hand_written_document() {
    let temp = TempDir::new().unwrap();
    let store = AliasStore::in_dir(temp.path());
    store
        .write(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<aliases>
    <alias>
        <name>Movies</name>
        <uri>bolt://localhost:7687</uri>
        <user-name>neo4j</user-name>
        <password>secret</password>
    </alias>
    <alias>
        <name>Embedded</name>
        <uri>/home/user/graph.db</uri>
        <allow-upgrade>true</allow-upgrade>
        <read-only>TRUE</read-only>
    </alias>
</aliases>
"#,
        )
        .unwrap();

    let mut registry = AliasRegistry::new(store);
    let report = registry.load();

    assert_eq!(report.loaded, 2);
    assert!(registry.contains(
        &Alias::new("Movies", "bolt://localhost:7687")
            .with_user_name("neo4j")
            .with_password("secret")
    ));
    assert!(registry.contains(
        &Alias::new("Embedded", "/home/user/graph.db")
            .with_allow_upgrade(true)
            .with_read_only(true)
    ));
}
