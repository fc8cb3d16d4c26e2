//! API definition records.

use crate::error::ProtocolResult;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Primary identifier of an API definition.
///
/// Carried on the wire as a hex string. An empty id means the definition
/// has not been stored on the dashboard yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record id from its hex form.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Returns true if no id has been assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(hex: &str) -> Self {
        Self::new(hex)
    }
}

impl From<String> for RecordId {
    fn from(hex: String) -> Self {
        Self(hex)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self(null_as_default(deserializer)?))
    }
}

/// Proxy section of an API definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Path prefix the API is served under.
    #[serde(default, deserialize_with = "null_as_default")]
    pub listen_path: String,
    /// Remaining proxy settings, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An API definition as held in the desired set.
///
/// Only the identity fields are typed. Everything else the dashboard
/// knows about an API is kept in `extra` so that an update always sends
/// the definition back whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDefinition {
    /// Primary identifier, stable across systems.
    #[serde(default, skip_serializing_if = "RecordId::is_empty")]
    pub id: RecordId,
    /// Identifier assigned by the dashboard.
    #[serde(default, deserialize_with = "null_as_default")]
    pub api_id: String,
    /// Human-readable name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// URL-safe alias.
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    /// Proxy settings, including the listen path.
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Remaining definition fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiDefinition {
    /// Creates a definition with the given primary id and name.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the listen path.
    pub fn listen_path(&self) -> &str {
        &self.proxy.listen_path
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

/// Decodes `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_identity_fields() {
        let raw = json!({
            "id": "5a1b2c3d4e5f60718293a4b5",
            "api_id": "abc123",
            "name": "Orders",
            "slug": "orders",
            "proxy": { "listen_path": "/orders/", "strip_listen_path": true },
            "active": true
        });

        let def: ApiDefinition = serde_json::from_value(raw).unwrap();
        assert_eq!(def.id.as_str(), "5a1b2c3d4e5f60718293a4b5");
        assert_eq!(def.api_id, "abc123");
        assert_eq!(def.slug, "orders");
        assert_eq!(def.listen_path(), "/orders/");
        assert_eq!(def.extra.get("active"), Some(&json!(true)));
        assert_eq!(def.proxy.extra.get("strip_listen_path"), Some(&json!(true)));
    }

    #[test]
    fn unknown_fields_survive_reencoding() {
        let raw = json!({
            "id": "aa",
            "name": "Orders",
            "version_data": { "not_versioned": true },
            "proxy": { "listen_path": "/o/", "target_url": "http://upstream" }
        });

        let def: ApiDefinition = serde_json::from_value(raw.clone()).unwrap();
        let encoded: Value = serde_json::from_slice(&def.to_json().unwrap()).unwrap();
        assert_eq!(encoded["version_data"], raw["version_data"]);
        assert_eq!(encoded["proxy"]["target_url"], "http://upstream");
    }

    #[test]
    fn null_identity_fields_decode_as_empty() {
        let raw = br#"{"id": null, "api_id": null, "slug": null}"#;
        let def = ApiDefinition::from_json(raw).unwrap();
        assert!(def.id.is_empty());
        assert!(def.api_id.is_empty());
        assert!(def.slug.is_empty());
    }

    #[test]
    fn empty_id_is_not_encoded() {
        let def = ApiDefinition::new("", "Fresh");
        let encoded: Value = serde_json::from_slice(&def.to_json().unwrap()).unwrap();
        assert!(encoded.get("id").is_none());
        assert_eq!(encoded["name"], "Fresh");
    }

    #[test]
    fn record_id_display() {
        let id = RecordId::from("5a1b");
        assert_eq!(id.to_string(), "5a1b");
        assert!(!id.is_empty());
        assert!(RecordId::default().is_empty());
    }
}
