//! Property-based test generators using proptest.
//!
//! Ids, slugs and listen paths are drawn from small pools so that
//! generated desired sets and listings overlap often.

use crate::fixtures::DefinitionBuilder;
use dashsync_protocol::{ApiDefinition, RecordId, RemoteRecord};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

/// Primary ids the generators draw from.
pub const ID_POOL: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

/// Strategy for ids from [`ID_POOL`], sometimes empty.
pub fn record_id_strategy() -> impl Strategy<Value = RecordId> {
    prop_oneof![
        1 => Just(RecordId::default()),
        6 => prop::sample::select(ID_POOL.to_vec()).prop_map(RecordId::from),
    ]
}

/// Strategy for slug-like strings from a small pool, sometimes empty.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        4 => prop::string::string_regex("[p-s]").expect("Invalid regex"),
    ]
}

/// Strategy for definitions with overlapping identity keys.
pub fn definition_strategy() -> impl Strategy<Value = ApiDefinition> {
    (
        record_id_strategy(),
        key_strategy(),
        key_strategy(),
        key_strategy(),
    )
        .prop_map(|(id, api_id, slug, path)| {
            let listen_path = if path.is_empty() {
                path
            } else {
                format!("/{path}/")
            };
            DefinitionBuilder::new(format!("api-{id}"))
                .id(id)
                .api_id(api_id)
                .slug(slug)
                .listen_path(listen_path)
                .build()
        })
}

/// Strategy for an arbitrary desired set and listing.
///
/// Either side may hold empty or duplicate ids.
pub fn desired_and_remote_strategy(
) -> impl Strategy<Value = (Vec<ApiDefinition>, Vec<RemoteRecord>)> {
    (
        prop::collection::vec(definition_strategy(), 0..8),
        prop::collection::vec(definition_strategy(), 0..8),
    )
        .prop_map(|(desired, remote)| {
            let remote = remote.into_iter().map(RemoteRecord::from_definition).collect();
            (desired, remote)
        })
}

/// A desired set that a sync can always reach from its starting listing.
#[derive(Debug, Clone)]
pub struct SyncScenario {
    /// Desired definitions: unique non-empty ids, slugs and listen paths.
    pub desired: Vec<ApiDefinition>,
    /// Starting dashboard contents: unique non-empty ids.
    pub remote: Vec<ApiDefinition>,
}

/// Strategy for [`SyncScenario`]s.
///
/// Remote records may hold slugs and listen paths the desired set wants,
/// but only on records that the pass deletes or updates before any create.
pub fn sync_scenario_strategy() -> impl Strategy<Value = SyncScenario> {
    (
        prop::sample::subsequence(ID_POOL.to_vec(), 0..=ID_POOL.len()),
        prop::sample::subsequence(ID_POOL.to_vec(), 0..=ID_POOL.len()),
        prop::collection::vec((0..ID_POOL.len(), 0..2u8), ID_POOL.len()),
        any::<u8>(),
    )
        .prop_map(|(desired_ids, remote_ids, remote_keys, variant)| {
            let desired = desired_ids
                .iter()
                .map(|id| {
                    let slug = format!("{id}-{}", variant % 2);
                    DefinitionBuilder::new(format!("api-{id}"))
                        .id(*id)
                        .slug(slug.clone())
                        .listen_path(format!("/{slug}/"))
                        .build()
                })
                .collect();

            let remote = remote_ids
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    let (owner, v) = remote_keys[i];
                    let slug = format!("{}-{v}", ID_POOL[owner]);
                    DefinitionBuilder::new(format!("remote-{id}"))
                        .id(*id)
                        .api_id(format!("r-{id}"))
                        .slug(slug.clone())
                        .listen_path(format!("/{slug}/"))
                        .build()
                })
                .collect();

            SyncScenario { desired, remote }
        })
}

/// Proptest configuration used by the workspace property tests.
pub fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 128,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    }
}
