//! Property tests for planning, identity matching and convergence.

use dashsync_engine::{
    find_match, Catalog, CatalogOp, IdentityKey, MockCatalog, RecordId, SyncEngine, SyncPlan,
};
use dashsync_testkit::{
    desired_and_remote_strategy, proptest_config, sync_scenario_strategy, FakeDashboard,
};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn plan_partitions_desired_set((desired, remote) in desired_and_remote_strategy()) {
        let plan = SyncPlan::compute(&desired, &remote);
        let remote_ids: HashSet<&RecordId> = remote
            .iter()
            .map(|r| r.id())
            .filter(|id| !id.is_empty())
            .collect();

        let unique_ids: HashSet<&RecordId> = desired
            .iter()
            .map(|d| &d.id)
            .filter(|id| !id.is_empty())
            .collect();
        let without_id = desired.iter().filter(|d| d.id.is_empty()).count();
        prop_assert_eq!(
            plan.to_update.len() + plan.to_create.len(),
            unique_ids.len() + without_id
        );
        for def in &plan.to_update {
            prop_assert!(remote_ids.contains(&def.id));
        }
        for def in &plan.to_create {
            prop_assert!(!remote_ids.contains(&def.id));
        }
    }

    #[test]
    fn plan_keeps_last_definition_per_id((desired, remote) in desired_and_remote_strategy()) {
        let plan = SyncPlan::compute(&desired, &remote);
        for def in plan.to_update.iter().chain(&plan.to_create) {
            if def.id.is_empty() {
                continue;
            }
            let last = desired.iter().rev().find(|d| d.id == def.id).unwrap();
            prop_assert_eq!(def, last);
        }
    }

    #[test]
    fn plan_deletes_each_orphan_once((desired, remote) in desired_and_remote_strategy()) {
        let plan = SyncPlan::compute(&desired, &remote);
        let desired_ids: HashSet<&RecordId> = desired.iter().map(|d| &d.id).collect();
        let expected: HashSet<&RecordId> = remote
            .iter()
            .map(|r| r.id())
            .filter(|id| !id.is_empty() && !desired_ids.contains(id))
            .collect();

        let deleted: HashSet<&RecordId> = plan.to_delete.iter().collect();
        prop_assert_eq!(deleted.len(), plan.to_delete.len());
        prop_assert_eq!(deleted, expected);
    }

    #[test]
    fn match_uses_highest_priority_key((desired, remote) in desired_and_remote_strategy()) {
        for def in &desired {
            let Some(m) = find_match(def, &remote) else {
                for record in &remote {
                    for key in IdentityKey::ALL {
                        let value = key.value_of(def);
                        prop_assert!(
                            value.is_empty() || key.value_of(&record.api_definition) != value
                        );
                    }
                }
                continue;
            };

            let value = m.key.value_of(def);
            prop_assert!(!value.is_empty());
            prop_assert_eq!(m.value(), value);
            for key in IdentityKey::ALL.iter().take_while(|k| **k != m.key) {
                let higher = key.value_of(def);
                prop_assert!(
                    higher.is_empty()
                        || remote.iter().all(|r| key.value_of(&r.api_definition) != higher)
                );
            }
        }
    }

    #[test]
    fn sync_converges_and_reruns_only_update(scenario in sync_scenario_strategy()) {
        let engine = SyncEngine::new(MockCatalog::with_definitions(scenario.remote.clone()));

        engine.sync(&scenario.desired).unwrap();

        let mut actual: Vec<_> = engine
            .catalog()
            .records()
            .iter()
            .map(|r| r.id().clone())
            .collect();
        let mut expected: Vec<_> = scenario.desired.iter().map(|d| d.id.clone()).collect();
        expected.sort();
        actual.sort();
        prop_assert_eq!(actual, expected);

        let after_first = engine.catalog().records();
        engine.catalog().clear_journal();
        let plan = engine.plan(&scenario.desired).unwrap();
        prop_assert!(plan.to_delete.is_empty());
        prop_assert!(plan.to_create.is_empty());

        engine.sync(&scenario.desired).unwrap();
        prop_assert!(engine
            .catalog()
            .writes()
            .iter()
            .all(|op| matches!(op, CatalogOp::Update(_))));
        prop_assert_eq!(engine.catalog().records(), after_first);
    }

    #[test]
    fn client_and_mock_agree(scenario in sync_scenario_strategy()) {
        let mock = SyncEngine::new(MockCatalog::with_definitions(scenario.remote.clone()));
        let dashboard = FakeDashboard::with_definitions("s3cret", &scenario.remote);
        let live = SyncEngine::new(dashboard.client());

        let expected = mock.sync(&scenario.desired).unwrap();
        let actual = live.sync(&scenario.desired).unwrap();

        prop_assert_eq!(&actual.deleted, &expected.deleted);
        prop_assert_eq!(&actual.updated, &expected.updated);
        prop_assert_eq!(&actual.created, &expected.created);
        prop_assert_eq!(live.catalog().list().unwrap(), mock.catalog().records());
    }
}
