//! # Dashsync Testkit
//!
//! Test utilities for dashsync.
//!
//! This crate provides:
//! - Definition builders and desired-set directories
//! - Property-based test generators using proptest
//! - `FakeDashboard`, an in-memory dashboard that speaks the wire protocol
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dashsync_testkit::prelude::*;
//!
//! #[test]
//! fn sync_against_fake() {
//!     let dashboard = FakeDashboard::new("secret");
//!     let engine = SyncEngine::new(dashboard.client());
//!     engine.sync(&[definition("aa", "orders")]).unwrap();
//!     assert_eq!(dashboard.records().len(), 1);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod dashboard;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dashboard::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use dashsync_engine::{Catalog, SyncEngine};
}

pub use dashboard::*;
pub use fixtures::*;
pub use generators::*;
