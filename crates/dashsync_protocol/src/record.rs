//! Dashboard-side representation of an API definition.

use crate::definition::{null_as_default, ApiDefinition, RecordId};
use crate::error::ProtocolResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An API definition as stored by the dashboard.
///
/// Wraps the definition with server-managed metadata. Every record built
/// here or decoded from the wire has `hook_references` as an array, never
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// The API definition itself.
    pub api_definition: ApiDefinition,
    /// Hook references managed by the dashboard.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hook_references: Vec<Value>,
    /// Whether the record is a site rather than an API.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_site: bool,
    /// Dashboard sort order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort_by: i64,
}

impl RemoteRecord {
    /// Wraps a definition for transmission, with server-managed fields
    /// at their empty defaults.
    pub fn from_definition(definition: ApiDefinition) -> Self {
        Self {
            api_definition: definition,
            hook_references: Vec::new(),
            is_site: false,
            sort_by: 0,
        }
    }

    /// Returns the primary identifier.
    pub fn id(&self) -> &RecordId {
        &self.api_definition.id
    }

    /// Returns the dashboard-assigned API id.
    pub fn api_id(&self) -> &str {
        &self.api_definition.api_id
    }

    /// Returns the slug.
    pub fn slug(&self) -> &str {
        &self.api_definition.slug
    }

    /// Returns the listen path.
    pub fn listen_path(&self) -> &str {
        self.api_definition.listen_path()
    }

    /// Encodes to JSON.
    pub fn to_json(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes from JSON.
    pub fn from_json(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl From<ApiDefinition> for RemoteRecord {
    fn from(definition: ApiDefinition) -> Self {
        Self::from_definition(definition)
    }
}
