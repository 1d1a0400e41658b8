//! Unified error types for the vdesk workspace.
//!
//! Library crates return [`VdeskError`]; the `vdesk` binary wraps it in
//! `anyhow` at the boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum VdeskError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// A resource that must be unique already exists.
    #[error("{kind} already exists: {id}")]
    AlreadyExists {
        /// Type of the conflicting resource.
        kind: &'static str,
        /// Identifier of the conflicting resource.
        id: String,
    },

    /// A request field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A compose document could not be read or written.
    #[error("compose file {path}: {message}")]
    Compose {
        /// Path of the compose document.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },
}

impl VdeskError {
    /// Builds an [`VdeskError::Io`] for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Builds an [`VdeskError::InvalidInput`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, VdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_kind_and_id() {
        let err = VdeskError::NotFound {
            kind: "container",
            id: "123456".into(),
        };
        assert_eq!(err.to_string(), "container not found: 123456");
    }

    #[test]
    fn io_error_names_path() {
        let err = VdeskError::io(
            "/srv/web/logs",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error at /srv/web/logs: denied");
    }

    #[test]
    fn invalid_input_message() {
        let err = VdeskError::invalid("name", "must be 6 digits");
        assert_eq!(err.to_string(), "invalid name: must be 6 digits");
    }
}
