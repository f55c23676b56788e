//! Authentication error types.

use thiserror::Error;

/// Authentication error variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum AuthError {
    #[error("login failed: {message}")]
    Rejected { message: String },

    #[error("session refresh failed: {message}")]
    RefreshFailed { message: String },

    #[error("network error: {message}")]
    Transport { message: String },

    #[error("malformed server response: {message}")]
    Decode { message: String },

    #[error("{reason}")]
    MissingCredentials { reason: String },

    #[error("failed to persist session: {message}")]
    Storage { message: String },

    #[error("unexpected authentication error: {message}")]
    Unexpected { message: String },
}

impl AuthError {
    /// Creates rejected login error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates refresh failed error.
    #[must_use]
    pub fn refresh_failed(message: impl Into<String>) -> Self {
        Self::RefreshFailed {
            message: message.into(),
        }
    }

    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates missing credentials error.
    #[must_use]
    pub fn missing(reason: impl Into<String>) -> Self {
        Self::MissingCredentials {
            reason: reason.into(),
        }
    }

    /// Creates storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether the stored session can no longer be used.
    #[must_use]
    pub const fn invalidates_session(&self) -> bool {
        matches!(self, Self::RefreshFailed { .. } | Self::Rejected { .. })
    }
}
