//! Test fixtures and definition helpers.

use dashsync_protocol::{ApiDefinition, RecordId, RemoteRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builds an [`ApiDefinition`] field by field.
#[derive(Debug, Clone, Default)]
pub struct DefinitionBuilder {
    def: ApiDefinition,
}

impl DefinitionBuilder {
    /// Starts a definition with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            def: ApiDefinition::new(RecordId::default(), name),
        }
    }

    /// Sets the primary id.
    pub fn id(mut self, id: impl Into<RecordId>) -> Self {
        self.def.id = id.into();
        self
    }

    /// Sets the dashboard-assigned API id.
    pub fn api_id(mut self, api_id: impl Into<String>) -> Self {
        self.def.api_id = api_id.into();
        self
    }

    /// Sets the slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.def.slug = slug.into();
        self
    }

    /// Sets the listen path.
    pub fn listen_path(mut self, listen_path: impl Into<String>) -> Self {
        self.def.proxy.listen_path = listen_path.into();
        self
    }

    /// Sets an untyped definition field.
    pub fn field(mut self, key: &str, value: serde_json::Value) -> Self {
        self.def.extra.insert(key.to_string(), value);
        self
    }

    /// Finishes the definition.
    pub fn build(self) -> ApiDefinition {
        self.def
    }
}

/// A definition whose slug, name and listen path all derive from `slug`.
pub fn definition(id: &str, slug: &str) -> ApiDefinition {
    DefinitionBuilder::new(format!("api-{slug}"))
        .id(id)
        .slug(slug)
        .listen_path(format!("/{slug}/"))
        .build()
}

/// Wraps definitions as dashboard records.
pub fn records(defs: &[ApiDefinition]) -> Vec<RemoteRecord> {
    defs.iter().cloned().map(RemoteRecord::from_definition).collect()
}

/// A directory of definition files with automatic cleanup.
pub struct DesiredDir {
    temp_dir: TempDir,
}

impl DesiredDir {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a directory holding one file per definition.
    pub fn with_definitions(defs: &[ApiDefinition]) -> Self {
        let dir = Self::new();
        for (i, def) in defs.iter().enumerate() {
            dir.write(&format!("{i:03}-{}.json", def.slug), def);
        }
        dir
    }

    /// Writes a definition to `file_name` and returns its path.
    pub fn write(&self, file_name: &str, def: &ApiDefinition) -> PathBuf {
        let path = self.temp_dir.path().join(file_name);
        let bytes = serde_json::to_vec_pretty(def).expect("Failed to encode definition");
        fs::write(&path, bytes).expect("Failed to write definition");
        path
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Default for DesiredDir {
    fn default() -> Self {
        Self::new()
    }
}
