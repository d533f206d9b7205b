//! Unified error types for the auth bridge.
//!
//! Store, verifier and configuration errors are all mapped into
//! [`AppError`] so they propagate through `?`. The bridge itself never lets
//! an [`AppError`] escape an authentication attempt; it converts them into a
//! decision at its boundary and keeps the distinction for the logs.

use std::fmt;
use thiserror::Error;

/// Error kind categorization used across the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Required configuration is missing or invalid. Fatal at startup.
    Configuration,
    /// Input was empty or failed a local policy check.
    Validation,
    /// The remote verification service could not be reached, timed out,
    /// or answered with a non-success status.
    RemoteUnavailable,
    /// The remote verification service answered with a body that does not
    /// follow the `{"Result": bool}` contract.
    RemoteProtocol,
    /// The local credential store failed to read, create or update a record.
    LocalStore,
    /// An internal error occurred (hashing failure, poisoned state).
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::RemoteUnavailable => write!(f, "REMOTE_UNAVAILABLE"),
            Self::RemoteProtocol => write!(f, "REMOTE_PROTOCOL"),
            Self::LocalStore => write!(f, "LOCAL_STORE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified error used throughout the bridge.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message. Never contains a password.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a remote-unavailable error.
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RemoteUnavailable, message)
    }

    /// Create a remote protocol error.
    pub fn remote_protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RemoteProtocol, message)
    }

    /// Create a local store error.
    pub fn local_store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::LocalStore, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error came from talking to the remote service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RemoteUnavailable | ErrorKind::RemoteProtocol
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::RemoteProtocol,
            format!("Malformed JSON: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::local_store("insert failed");
        assert_eq!(err.to_string(), "LOCAL_STORE: insert failed");
    }

    #[test]
    fn test_clone_drops_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(json_err);
        assert!(err.source.is_some());
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::RemoteProtocol);
        assert!(cloned.source.is_none());
    }

    #[test]
    fn test_is_remote() {
        assert!(AppError::remote_unavailable("timeout").is_remote());
        assert!(AppError::remote_protocol("missing Result").is_remote());
        assert!(!AppError::validation("empty").is_remote());
    }
}
