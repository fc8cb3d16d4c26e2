//! Three-way diff between the desired set and the dashboard listing.

use dashsync_protocol::{ApiDefinition, RecordId, RemoteRecord};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Operations needed to make the dashboard match the desired set.
///
/// The join key is the primary id alone. Slug and listen path collisions
/// are left to the create precondition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    /// Remote ids absent from the desired set, in listing order.
    pub to_delete: Vec<RecordId>,
    /// Desired definitions whose id is on the dashboard, in desired order.
    pub to_update: Vec<ApiDefinition>,
    /// Desired definitions whose id is not on the dashboard, in desired order.
    pub to_create: Vec<ApiDefinition>,
}

impl SyncPlan {
    /// Computes the plan for one reconciliation pass.
    ///
    /// A desired definition with an empty id is always a create. When a
    /// non-empty id repeats, the last definition wins and takes the place
    /// of the first. A remote record with an empty id cannot be addressed
    /// and is never deleted.
    pub fn compute(desired: &[ApiDefinition], remote: &[RemoteRecord]) -> Self {
        let remote_ids: HashSet<&RecordId> = remote
            .iter()
            .map(RemoteRecord::id)
            .filter(|id| !id.is_empty())
            .collect();

        let mut slots: HashMap<&RecordId, usize> = HashMap::new();
        let mut unique: Vec<&ApiDefinition> = Vec::with_capacity(desired.len());
        for def in desired {
            if def.id.is_empty() {
                unique.push(def);
                continue;
            }
            match slots.get(&def.id) {
                Some(&slot) => {
                    warn!(id = %def.id, "desired id repeats, keeping the later definition");
                    unique[slot] = def;
                }
                None => {
                    slots.insert(&def.id, unique.len());
                    unique.push(def);
                }
            }
        }

        let (to_update, to_create): (Vec<_>, Vec<_>) = unique
            .into_iter()
            .cloned()
            .partition(|def| remote_ids.contains(&def.id));

        let mut seen = HashSet::new();
        let mut to_delete = Vec::new();
        for record in remote {
            let id = record.id();
            if id.is_empty() {
                warn!(name = %record.api_definition.name, "skipping dashboard api without id");
                continue;
            }
            if !slots.contains_key(id) && seen.insert(id) {
                to_delete.push(id.clone());
            }
        }

        Self {
            to_delete,
            to_update,
            to_create,
        }
    }

    /// Returns true if the dashboard already matches.
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_update.is_empty() && self.to_create.is_empty()
    }

    /// Total number of operations.
    pub fn len(&self) -> usize {
        self.to_delete.len() + self.to_update.len() + self.to_create.len()
    }
}
