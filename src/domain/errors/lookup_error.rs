//! Errors raised by DNS and well-known lookups.

use thiserror::Error;

/// Failure of a single name lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("lookup of {name} failed: {message}")]
pub struct LookupError {
    /// Name that was queried.
    pub name: String,
    /// Resolver or transport message.
    pub message: String,
}

impl LookupError {
    /// Creates lookup error.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl ToString) -> Self {
        Self {
            name: name.into(),
            message: message.to_string(),
        }
    }
}
