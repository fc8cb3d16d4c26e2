//! # Dashsync Protocol
//!
//! Wire types and JSON codecs for the dashboard API catalog.
//!
//! This crate provides:
//! - `ApiDefinition`, the desired-state record
//! - `RemoteRecord`, the dashboard's stored form of a definition
//! - Response envelopes (`ApisResponse`, `StatusResponse`)
//! - JSON encoding/decoding
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod definition;
mod error;
mod messages;
mod record;

pub use definition::{ApiDefinition, ProxyConfig, RecordId};
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{ApisResponse, StatusResponse, STATUS_OK};
pub use record::RemoteRecord;
