//! Loading the desired set from disk.

use crate::error::{SyncError, SyncResult};
use dashsync_protocol::{ApiDefinition, RemoteRecord};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads every `*.json` file in `dir` as a desired API definition.
///
/// Files are read in file-name order; subdirectories are ignored. A file
/// may hold a bare definition or a dashboard export of the form
/// `{"api_definition": {...}}`.
pub fn load_definitions(dir: impl AsRef<Path>) -> SyncResult<Vec<ApiDefinition>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| SyncError::load(dir, e))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SyncError::load(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let defs = paths
        .iter()
        .map(|path| load_definition(path))
        .collect::<SyncResult<Vec<_>>>()?;
    debug!(count = defs.len(), dir = %dir.display(), "loaded api definitions");
    Ok(defs)
}

/// Loads a single API definition file.
pub fn load_definition(path: impl AsRef<Path>) -> SyncResult<ApiDefinition> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| SyncError::load(path, e))?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| SyncError::load(path, e))?;

    if !value.is_object() {
        return Err(SyncError::load(path, "expected a json object"));
    }

    let def = if value.get("api_definition").is_some() {
        serde_json::from_value::<RemoteRecord>(value).map(|record| record.api_definition)
    } else {
        serde_json::from_value::<ApiDefinition>(value)
    };
    def.map_err(|e| SyncError::load(path, e))
}
