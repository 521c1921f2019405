//! # Domain Errors
//!
//! Failures surfaced by record store adapters.

use thiserror::Error;

/// Record store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Path cannot address a record.
    #[error("Invalid path {path:?}: {reason}")]
    InvalidPath {
        /// Raw path as given
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// The store refused a write.
    #[error("Write rejected at {path}: {reason}")]
    WriteRejected {
        /// Target path
        path: String,
        /// Reason reported by the backend
        reason: String,
    },

    /// The store refused a read.
    #[error("Read failed at {path}: {reason}")]
    ReadFailed {
        /// Target path
        path: String,
        /// Reason reported by the backend
        reason: String,
    },

    /// Backend not reachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Path the failed operation targeted, when known.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidPath { path, .. }
            | Self::WriteRejected { path, .. }
            | Self::ReadFailed { path, .. } => Some(path),
            Self::Unavailable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_rejected_error() {
        let err = StoreError::WriteRejected {
            path: "users/u1/registeredEvents".to_string(),
            reason: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("users/u1/registeredEvents"));
        assert!(err.to_string().contains("permission denied"));
        assert_eq!(err.path(), Some("users/u1/registeredEvents"));
    }

    #[test]
    fn test_unavailable_has_no_path() {
        let err = StoreError::Unavailable("connection reset".to_string());
        assert!(err.path().is_none());
        assert!(err.to_string().contains("connection reset"));
    }
}
