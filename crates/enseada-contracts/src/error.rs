//! Error types shared by every Enseada console crate.
//!
//! All fallible operations return `EnseadaResult<T>`. The authorization
//! predicate itself never fails; `Forbidden` is produced by its callers when
//! the predicate denies a request.

use thiserror::Error;

use crate::permission::Permission;

/// The unified error type for the Enseada console.
#[derive(Debug, Error)]
pub enum EnseadaError {
    /// The client-side permission check denied the action before any request
    /// was sent. Carries the permission that was required.
    #[error("Forbidden action: {permission}")]
    Forbidden { permission: Permission },

    /// The server answered with a status code >= 400.
    #[error("request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// A response body could not be decoded into the expected type.
    #[error("failed to decode response: {reason}")]
    Decode { reason: String },

    /// A service was asked for an association it does not declare.
    #[error("API {path} has no association of type {kind}")]
    UnknownAssociation { path: String, kind: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// An operation needed a logged-in session and there is none.
    #[error("not authenticated: {reason}")]
    NotAuthenticated { reason: String },
}

impl EnseadaError {
    /// Build a `Forbidden` error for the given object and action.
    pub fn forbidden(object: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Forbidden {
            permission: Permission::new(object, action),
        }
    }

    /// Return true if this is an HTTP error with the given status.
    pub fn is_status(&self, expected: u16) -> bool {
        matches!(self, Self::Http { status, .. } if *status == expected)
    }
}

/// Convenience alias used throughout the Enseada crates.
pub type EnseadaResult<T> = Result<T, EnseadaError>;
