//! # Dashsync Engine
//!
//! Reconciles a desired set of API definitions against the catalog held
//! by an API management dashboard.
//!
//! This crate provides:
//! - Dashboard REST client (list, create, update, delete)
//! - Identity matching between desired definitions and stored records
//! - Sync planning and apply (delete → update → create)
//! - HTTP transport abstraction
//! - Loading the desired set from a directory
//!
//! ## Architecture
//!
//! A sync pass is one-way and whole-record:
//! 1. List the dashboard catalog once
//! 2. Diff by primary id into delete, update and create sets
//! 3. Apply deletes, then updates, then creates, stopping at the first error
//!
//! ## Key Invariants
//!
//! - The desired set is authoritative; nothing is pulled back from the dashboard
//! - Updates replace the stored definition wholesale
//! - A create never proceeds if any identity key is already taken
//! - The dashboard-assigned API id is never dropped by an update
//! - No rollback: a failed pass is recovered by running it again

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod client;
mod config;
mod engine;
mod error;
mod http;
mod identity;
mod plan;
mod source;

pub use catalog::{Catalog, CatalogOp, MockCatalog};
pub use client::{DashboardClient, ENDPOINT_APIS};
pub use config::DashboardConfig;
pub use engine::{CreatedApi, SyncEngine, SyncReport};
pub use error::{SyncError, SyncResult};
pub use http::{
    join_url, HttpClient, HttpRequest, HttpResponse, LoopbackClient, LoopbackServer, Method,
    ReqwestClient,
};
pub use identity::{exists_remotely, find_by_id, find_match, IdentityKey, Match};
pub use plan::SyncPlan;
pub use source::{load_definition, load_definitions};

pub use dashsync_protocol::{ApiDefinition, ProxyConfig, RecordId, RemoteRecord};
