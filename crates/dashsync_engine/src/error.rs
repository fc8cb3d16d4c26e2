//! Error types for the sync engine.

use crate::identity::IdentityKey;
use dashsync_protocol::{ProtocolError, RecordId};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during catalog and sync operations.
///
/// None of these are retried by the engine; each one is returned to the
/// caller of `sync`, `create`, `update` or `delete` as soon as it happens.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The request never got a response.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
    },

    /// The dashboard answered, but not with success.
    #[error("{}", remote_display(.status, .message))]
    Remote {
        /// HTTP status, if the failure came from the status line.
        status: Option<u16>,
        /// Message reported by the dashboard.
        message: String,
    },

    /// A create collided with an existing record.
    #[error("object seems to exist (same {key} `{value}`), use update")]
    AlreadyExists {
        /// Identity key that collided.
        key: IdentityKey,
        /// Colliding value.
        value: String,
    },

    /// An update targeted an id the dashboard does not have.
    #[error("object `{id}` does not exist, use create")]
    NotFound {
        /// Primary identifier that was looked up.
        id: RecordId,
    },

    /// A request payload could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A desired definition could not be loaded.
    #[error("cannot load {}: {message}", .path.display())]
    Source {
        /// File or directory that failed.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

fn remote_display(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("dashboard returned error: {message} (code: {code})"),
        None => format!("dashboard request completed, but with error: {message}"),
    }
}

impl SyncError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a remote error from a non-success HTTP status.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a remote error from a failed response envelope.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Remote {
            status: None,
            message: message.into(),
        }
    }

    /// Creates an error for a desired definition that failed to load.
    pub fn load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Source {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if a create should have been an update, or the reverse.
    pub fn is_wrong_operation(&self) -> bool {
        matches!(self, SyncError::AlreadyExists { .. } | SyncError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_operation_errors() {
        assert!(SyncError::NotFound { id: "aa".into() }.is_wrong_operation());
        assert!(SyncError::AlreadyExists {
            key: IdentityKey::Slug,
            value: "foo".into()
        }
        .is_wrong_operation());
        assert!(!SyncError::transport("connection refused").is_wrong_operation());
        assert!(!SyncError::rejected("bad").is_wrong_operation());
    }

    #[test]
    fn error_display() {
        let err = SyncError::http_status(500, "boom");
        assert_eq!(err.to_string(), "dashboard returned error: boom (code: 500)");

        let err = SyncError::rejected("slug taken");
        assert!(err.to_string().contains("slug taken"));

        let err = SyncError::AlreadyExists {
            key: IdentityKey::ListenPath,
            value: "/orders/".into(),
        };
        assert!(err.to_string().contains("listen path"));
        assert!(err.to_string().contains("use update"));

        let err = SyncError::NotFound { id: "5a1b".into() };
        assert!(err.to_string().contains("5a1b"));
        assert!(err.to_string().contains("use create"));
    }
}
