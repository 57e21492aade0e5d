//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random records that keep the
//! invariants the service relies on (non-empty ids, unique ids per set).

use diarysync_protocol::{Record, SortKey};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Strategy for generating record ids from a small alphabet, so that
/// generated sets overlap often.
pub fn record_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f0-9]{1,3}").expect("Invalid regex")
}

/// Strategy for generating tag lists.
pub fn tags_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex("[a-z]{1,8}").expect("Invalid regex"),
        0..4,
    )
}

/// Strategy for generating sort keys.
pub fn timestamp_strategy() -> impl Strategy<Value = Option<SortKey>> {
    prop_oneof![
        Just(None),
        any::<i64>().prop_map(|t| Some(SortKey::Int(t))),
        prop::string::string_regex("2024-0[1-9]-[0-2][0-9]")
            .expect("Invalid regex")
            .prop_map(|t| Some(SortKey::Text(t))),
    ]
}

/// Strategy for generating a record with the given id.
pub fn record_with_id(id: String) -> impl Strategy<Value = Record> {
    (
        prop::option::of("[ -~]{0,40}"),
        "[a-z]{0,6}",
        tags_strategy(),
        timestamp_strategy(),
    )
        .prop_map(move |(content, category, tags, timestamp)| Record {
            id: Some(id.clone()),
            app_id: None,
            content,
            category,
            tags,
            date: None,
            date_iso: None,
            timestamp,
        })
}

/// Strategy for generating a record.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    record_id_strategy().prop_flat_map(record_with_id)
}

/// Strategy for generating a set of records with distinct ids.
pub fn record_set_strategy(max_len: usize) -> impl Strategy<Value = Vec<Record>> {
    prop::collection::btree_set(record_id_strategy(), 0..max_len).prop_flat_map(
        |ids: BTreeSet<String>| {
            ids.into_iter()
                .map(record_with_id)
                .collect::<Vec<_>>()
        },
    )
}
