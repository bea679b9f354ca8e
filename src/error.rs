//! Error types with retryability classification.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors produced by Vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Configuration was missing or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Authentication failed or yielded no usable token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Vault server unreachable, timed out, or I/O failed
    #[error("Vault unavailable: {0}")]
    Unavailable(String),

    /// Non-success HTTP status
    #[error("Vault returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the server
        body: String,
    },

    /// Secret not found
    #[error("Secret not found at path: {0}")]
    SecretNotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for Vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Check if the error is retryable.
    ///
    /// The client never retries on its own; this classification exists so
    /// callers can decide whether to re-invoke a failed operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::Http(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a secret not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::SecretNotFound(path.into())
    }
}
