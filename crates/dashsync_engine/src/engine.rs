//! Reconciliation engine.

use crate::catalog::Catalog;
use crate::error::SyncResult;
use crate::plan::SyncPlan;
use dashsync_protocol::{ApiDefinition, RecordId};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// An API created during a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedApi {
    /// Name of the desired definition.
    pub name: String,
    /// Id the dashboard reported for it.
    pub id: String,
}

/// Outcome of a completed sync pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Ids deleted from the dashboard.
    pub deleted: Vec<RecordId>,
    /// Ids updated on the dashboard.
    pub updated: Vec<RecordId>,
    /// APIs created on the dashboard.
    pub created: Vec<CreatedApi>,
    /// Wall time of the pass.
    pub duration: Duration,
}

impl SyncReport {
    /// Total number of operations applied.
    pub fn total(&self) -> usize {
        self.deleted.len() + self.updated.len() + self.created.len()
    }
}

/// Drives a catalog toward a desired set of API definitions.
///
/// A pass lists the catalog once, computes a [`SyncPlan`] and applies it
/// in the order delete, update, create, so that slugs and listen paths
/// held by deleted records are free before anything claims them.
///
/// The first failing operation aborts the pass. Operations already
/// applied stay applied; running `sync` again with the same desired set
/// finishes the job, since completed deletes and creates no longer show up
/// in the plan and updates rewrite the same content.
pub struct SyncEngine<C: Catalog> {
    catalog: C,
}

impl<C: Catalog> SyncEngine<C> {
    /// Creates a new sync engine.
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Computes what a sync would do, without writing anything.
    pub fn plan(&self, desired: &[ApiDefinition]) -> SyncResult<SyncPlan> {
        let remote = self.catalog.list()?;
        let plan = SyncPlan::compute(desired, &remote);
        debug!(
            delete = plan.to_delete.len(),
            update = plan.to_update.len(),
            create = plan.to_create.len(),
            "computed sync plan"
        );
        Ok(plan)
    }

    /// Makes the catalog match `desired`.
    pub fn sync(&self, desired: &[ApiDefinition]) -> SyncResult<SyncReport> {
        let start = Instant::now();
        let plan = self.plan(desired)?;
        let mut report = SyncReport::default();

        for id in plan.to_delete {
            info!(%id, "sync deleting api");
            self.catalog.delete(&id)?;
            report.deleted.push(id);
        }

        for mut def in plan.to_update {
            info!(id = %def.id, "sync updating api");
            self.catalog.update(&mut def)?;
            report.updated.push(def.id);
        }

        for def in plan.to_create {
            info!(name = %def.name, "sync creating api");
            let id = self.catalog.create(&def)?;
            info!(name = %def.name, %id, "created api");
            report.created.push(CreatedApi { name: def.name, id });
        }

        report.duration = start.elapsed();
        Ok(report)
    }
}
