//! Response envelopes returned by the dashboard.

use crate::definition::null_as_default;
use crate::error::ProtocolResult;
use crate::record::RemoteRecord;
use serde::{Deserialize, Serialize};

/// Status value the dashboard reports for a successful mutation.
pub const STATUS_OK: &str = "OK";

/// Envelope for a catalog listing.
///
/// The `apis` key must be present, so a status envelope is never read as
/// an empty catalog. A `null` value is an empty listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApisResponse {
    /// Every stored API.
    #[serde(deserialize_with = "null_as_default")]
    pub apis: Vec<RemoteRecord>,
    /// Page count reported by the dashboard.
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: i64,
}

impl ApisResponse {
    /// Creates a single-page listing.
    pub fn new(apis: Vec<RemoteRecord>) -> Self {
        Self { apis, pages: 1 }
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

/// Envelope for create, update and delete responses.
///
/// A mutation succeeded only if `status` is `"OK"`, whatever the HTTP
/// status was.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Human-readable message.
    #[serde(default, alias = "Message", deserialize_with = "null_as_default")]
    pub message: String,
    /// Extra payload; carries the new id on create.
    #[serde(default, alias = "Meta", deserialize_with = "null_as_default")]
    pub meta: String,
    /// Outcome marker.
    #[serde(default, alias = "Status", deserialize_with = "null_as_default")]
    pub status: String,
}

impl StatusResponse {
    /// Creates a successful response.
    pub fn ok(meta: impl Into<String>) -> Self {
        Self {
            message: String::new(),
            meta: meta.into(),
            status: STATUS_OK.into(),
        }
    }

    /// Creates a failed response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            meta: String::new(),
            status: "Error".into(),
        }
    }

    /// Returns true if the dashboard reported success.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_capitalised_keys() {
        let raw = br#"{"Message": "API created", "Meta": "5a1b", "Status": "OK"}"#;
        let resp = StatusResponse::from_json(raw).unwrap();
        assert!(resp.is_ok());
        assert_eq!(resp.meta, "5a1b");
        assert_eq!(resp.message, "API created");
    }

    #[test]
    fn status_other_than_ok_is_failure() {
        let raw = br#"{"message": "bad slug", "status": "Error"}"#;
        let resp = StatusResponse::from_json(raw).unwrap();
        assert!(!resp.is_ok());
        assert!(!StatusResponse::default().is_ok());
        assert!(!StatusResponse::from_json(br#"{"status": "ok"}"#).unwrap().is_ok());
    }

    #[test]
    fn status_tolerates_null_meta() {
        let resp = StatusResponse::from_json(br#"{"status": "OK", "meta": null}"#).unwrap();
        assert!(resp.is_ok());
        assert!(resp.meta.is_empty());
    }

    #[test]
    fn listing_with_null_apis_is_empty() {
        let resp = ApisResponse::from_json(br#"{"apis": null, "pages": 0}"#).unwrap();
        assert!(resp.apis.is_empty());
    }

    #[test]
    fn listing_decodes_records() {
        let raw = br#"{
            "apis": [
                {
                    "api_definition": {"id": "aa", "slug": "foo"},
                    "hook_references": [],
                    "is_site": false,
                    "sort_by": 0
                },
                {"api_definition": {"id": "bb", "slug": "bar"}}
            ],
            "pages": 1
        }"#;
        let resp = ApisResponse::from_json(raw).unwrap();
        assert_eq!(resp.apis.len(), 2);
        assert_eq!(resp.apis[1].slug(), "bar");
        assert_eq!(resp.pages, 1);
    }

    #[test]
    fn listing_rejects_non_envelope() {
        assert!(ApisResponse::from_json(b"[]").is_err());
        assert!(ApisResponse::from_json(b"<html>").is_err());
    }

    #[test]
    fn listing_requires_apis_key() {
        let raw = br#"{"Status": "Error", "Message": "Not authorised"}"#;
        assert!(ApisResponse::from_json(raw).is_err());
        assert!(ApisResponse::from_json(br#"{"pages": 1}"#).is_err());
        assert!(ApisResponse::from_json(br#"{"apis": []}"#).unwrap().apis.is_empty());
    }
}
