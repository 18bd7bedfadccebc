//! Crate-wide error types.

use std::fmt;

use crate::request::RequestId;

/// Errors reported by blocking waits, the request table and the thread pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A timed wait elapsed before the value was resolved.
    Timeout {
        duration_ms: u64,
    },

    /// The request was unregistered before it was served.
    Unregistered(RequestId),

    /// The id does not name a live entry in the request table.
    UnknownRequest(RequestId),

    /// `serve_request` was called twice for the same id.
    AlreadyServed(RequestId),

    /// A pool task or a function-backed future panicked.
    Panicked(String),

    /// A worker thread could not be spawned.
    Spawn(String),
}

impl Error {
    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this error comes from an unregistered request.
    pub fn is_unregistered(&self) -> bool {
        matches!(self, Error::Unregistered(_))
    }

    /// Check if this error carries a captured panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, Error::Panicked(_))
    }

    /// Build a `Panicked` error from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Error::Panicked(msg)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timeout { duration_ms } => write!(f, "wait timed out after {}ms", duration_ms),
            Error::Unregistered(id) => write!(f, "request {} was unregistered", id),
            Error::UnknownRequest(id) => write!(f, "unknown request {}", id),
            Error::AlreadyServed(id) => write!(f, "request {} was already served", id),
            Error::Panicked(msg) => write!(f, "task panicked: {}", msg),
            Error::Spawn(msg) => write!(f, "failed to spawn worker thread: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
