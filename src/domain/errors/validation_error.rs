//! Identifier and password validation errors.

use thiserror::Error;

/// Reasons a login identifier or password is refused before any login attempt.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Handle does not match the hostname grammar.
    #[error("Invalid handle")]
    InvalidHandle,

    /// Handle ends in a reserved top-level domain.
    #[error("Disallowed TLD")]
    DisallowedTld,

    /// Neither DNS nor the well-known endpoint produced a DID.
    #[error("Handle does not resolve")]
    HandleUnresolvable,

    /// Email domain has no mail exchange record.
    #[error("Email domain does not exist")]
    DomainNotFound,

    /// Password field left blank.
    #[error("Password cannot be empty")]
    PasswordEmpty,

    /// Password is not shaped like an app password.
    #[error("Invalid password, please use an app password not your primary account password")]
    InvalidPassword,
}
