//! Error types for the sync layer.

use thiserror::Error;

/// Result type for remote API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for manager actions.
pub type SyncResult<T> = Result<T, SyncError>;

/// A failure reported by the remote API client.
///
/// The message is carried through untouched. The status code, when the
/// client knows one, is kept for display only and never drives retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: Option<u16>,
}

impl ApiError {
    /// Creates an error from a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Creates an error that carries the HTTP status the client saw.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// The error raised when a request was issued without a bearer token.
    pub fn unauthenticated() -> Self {
        Self::with_status(401, "authentication required")
    }

    /// Human-readable message, as written into a store's error slot.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

/// Errors returned by manager actions.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The action needs a scope the manager was not given.
    #[error("missing scope: {0}")]
    MissingScope(&'static str),

    /// Invalid manager configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Returns the underlying API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            SyncError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors reported by an identity provider session.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("token retrieval failed: {0}")]
    Token(String),

    #[error("session expired")]
    Expired,
}
