//! Error types for the persistent store and lookup collaborators.
//!
//! Neither error is fatal to a session: [`StoreError`] is swallowed by the
//! cache layer and [`LookupError`] is forwarded to an
//! [`ErrorReporter`](crate::collab::ErrorReporter).

use thiserror::Error;

/// Failure of the persistent key/value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store contents are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("store quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a remote suggestion lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The service answered with a non-success status.
    #[error("lookup failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("lookup transport error: {0}")]
    Transport(String),

    #[error("could not decode lookup response: {0}")]
    Decode(String),

    #[error("invalid lookup endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("lookup failed: {0}")]
    Failed(String),
}
