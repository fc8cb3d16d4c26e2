//! Catalog abstraction over the dashboard's API store.

use crate::error::{SyncError, SyncResult};
use crate::identity::{find_by_id, find_match};
use dashsync_protocol::{ApiDefinition, RecordId, RemoteRecord};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// A catalog of API definitions held by a remote service.
///
/// This trait abstracts the dashboard so the reconciler can run against
/// the HTTP client or an in-memory catalog in tests.
pub trait Catalog: Send + Sync {
    /// Lists every stored record.
    fn list(&self) -> SyncResult<Vec<RemoteRecord>>;

    /// Creates a record and returns the id the service assigned.
    ///
    /// Fails with `AlreadyExists` if any stored record shares the id,
    /// API id, slug or listen path of `def`.
    fn create(&self, def: &ApiDefinition) -> SyncResult<String>;

    /// Replaces the record whose id matches `def.id`.
    ///
    /// Fails with `NotFound` if there is no such record. If `def` has no
    /// API id, it is filled in from the stored record before sending.
    fn update(&self, def: &mut ApiDefinition) -> SyncResult<()>;

    /// Deletes the record with the given id.
    fn delete(&self, id: &RecordId) -> SyncResult<()>;
}

/// A catalog call, as recorded by [`MockCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOp {
    /// `list()`
    List,
    /// `create()`, keyed by definition name.
    Create(String),
    /// `update()`, keyed by id.
    Update(RecordId),
    /// `delete()`, keyed by id.
    Delete(RecordId),
}

/// An in-memory catalog for testing.
///
/// Applies the same create and update preconditions as the dashboard
/// client and records every call.
#[derive(Debug, Default)]
pub struct MockCatalog {
    records: Mutex<Vec<RemoteRecord>>,
    journal: Mutex<Vec<CatalogOp>>,
    failures: Mutex<Vec<CatalogOp>>,
    next_id: AtomicU64,
}

impl MockCatalog {
    /// Creates an empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock catalog holding the given definitions.
    pub fn with_definitions(defs: impl IntoIterator<Item = ApiDefinition>) -> Self {
        let catalog = Self::new();
        catalog
            .records
            .lock()
            .extend(defs.into_iter().map(RemoteRecord::from_definition));
        catalog
    }

    /// Makes the given call fail with a remote error.
    pub fn fail_on(&self, op: CatalogOp) {
        self.failures.lock().push(op);
    }

    /// Removes every injected failure.
    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    /// Returns the stored records.
    pub fn records(&self) -> Vec<RemoteRecord> {
        self.records.lock().clone()
    }

    /// Returns every call made so far.
    pub fn journal(&self) -> Vec<CatalogOp> {
        self.journal.lock().clone()
    }

    /// Returns the calls made so far, without listings.
    pub fn writes(&self) -> Vec<CatalogOp> {
        self.journal
            .lock()
            .iter()
            .filter(|op| **op != CatalogOp::List)
            .cloned()
            .collect()
    }

    /// Clears the journal.
    pub fn clear_journal(&self) {
        self.journal.lock().clear();
    }

    fn record_call(&self, op: CatalogOp) -> SyncResult<()> {
        self.journal.lock().push(op.clone());
        if self.failures.lock().contains(&op) {
            return Err(SyncError::rejected(format!("injected failure for {op:?}")));
        }
        Ok(())
    }

    fn assign_id(&self) -> String {
        format!("{:024x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl Catalog for MockCatalog {
    fn list(&self) -> SyncResult<Vec<RemoteRecord>> {
        self.record_call(CatalogOp::List)?;
        Ok(self.records())
    }

    fn create(&self, def: &ApiDefinition) -> SyncResult<String> {
        self.record_call(CatalogOp::Create(def.name.clone()))?;

        let mut records = self.records.lock();
        if let Some(m) = find_match(def, &records) {
            return Err(SyncError::AlreadyExists {
                key: m.key,
                value: m.value().to_string(),
            });
        }

        let mut stored = def.clone();
        if stored.id.is_empty() {
            stored.id = RecordId::new(self.assign_id());
        }
        if stored.api_id.is_empty() {
            stored.api_id = self.assign_id();
        }
        let id = stored.id.to_string();
        records.push(RemoteRecord::from_definition(stored));
        Ok(id)
    }

    fn update(&self, def: &mut ApiDefinition) -> SyncResult<()> {
        self.record_call(CatalogOp::Update(def.id.clone()))?;

        let mut records = self.records.lock();
        let Some(existing) = find_by_id(&def.id, &records) else {
            return Err(SyncError::NotFound { id: def.id.clone() });
        };
        if def.api_id.is_empty() {
            def.api_id = existing.api_id().to_string();
        }

        if let Some(slot) = records.iter_mut().find(|r| r.id() == &def.id) {
            *slot = RemoteRecord::from_definition(def.clone());
        }
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> SyncResult<()> {
        self.record_call(CatalogOp::Delete(id.clone()))?;

        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Err(SyncError::http_status(404, format!("api {id} not found")));
        }
        Ok(())
    }
}
