//! Shared proptest strategies

use graphconn_core::Alias;
use proptest::prelude::*;

// Strategy for generating alias display names, including empty,
// blank and space-padded names that the registry stores verbatim
pub fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-zA-Z][a-zA-Z0-9_ -]{0,15}",
        1 => Just(String::new()),
        1 => " {1,3}",
        1 => " {1,2}[a-zA-Z0-9&<>'\"]{1,8} {0,2}",
    ]
}

// Strategy for generating remote or local database locations
pub fn arb_uri() -> impl Strategy<Value = String> {
    prop_oneof![
        ("[a-z][a-z0-9-]{0,12}", 1u16..=65535u16)
            .prop_map(|(host, port)| format!("bolt://{host}:{port}")),
        "[a-z][a-z0-9-]{0,12}".prop_map(|host| format!("http://{host}:7474/db/data")),
        "[a-z]{1,8}(/[a-z]{1,8}){0,3}".prop_map(|path| format!("/{path}/graph.db")),
        Just(String::new()),
    ]
}

// Strategy for optional credentials, including empty values and characters
// that need escaping
pub fn arb_credential() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[ -~]{1,16}".prop_map(Some),
    ]
}

// Strategy for a complete alias
pub fn arb_alias() -> impl Strategy<Value = Alias> {
    (
        arb_name(),
        arb_uri(),
        arb_credential(),
        arb_credential(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(name, uri, user_name, password, allow_upgrade, read_only)| Alias {
                name,
                uri,
                user_name,
                password,
                allow_upgrade,
                read_only,
            },
        )
}

// Strategy for a small pool of aliases and a sequence of picks from it, so
// that the same value is regularly added more than once
pub fn arb_add_sequence() -> impl Strategy<Value = Vec<Alias>> {
    prop::collection::vec(arb_alias(), 1..6).prop_flat_map(|pool| {
        let len = pool.len();
        prop::collection::vec(0..len, 0..20)
            .prop_map(move |picks| picks.into_iter().map(|i| pool[i].clone()).collect::<Vec<Alias>>())
    })
}
