//! Backend error taxonomy shared by every [`BackendAdapter`](crate::BackendAdapter).

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Errors returned by backend adapters.
///
/// None of these abort a bulk phase on their own: the runner counts them per
/// [`FailureKind`] and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend could not be reached (refused connection, broken pipe, DNS).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The backend answered but rejected the operation.
    #[error("Backend error{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Backend {
        status: Option<u16>,
        message: String,
    },

    /// No response within the per-call bound.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// A queried vertex is unknown to the backend.
    #[error("Vertex not found: {0}")]
    NotFound(String),
}

impl BackendError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend {
            status: None,
            message: msg.into(),
        }
    }

    pub fn status(status: u16, msg: impl Into<String>) -> Self {
        Self::Backend {
            status: Some(status),
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Connection(_) => FailureKind::Connection,
            Self::Backend { .. } => FailureKind::Backend,
            Self::Timeout(_) => FailureKind::Timeout,
            Self::NotFound(_) => FailureKind::NotFound,
        }
    }

    /// Whether the failure happened below the application protocol.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}

/// Coarse classification of a [`BackendError`], used for failure counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Connection,
    Backend,
    Timeout,
    NotFound,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Connection => "connection",
            FailureKind::Backend => "backend",
            FailureKind::Timeout => "timeout",
            FailureKind::NotFound => "not_found",
        };
        f.write_str(name)
    }
}
