//! Login credentials held only for the duration of one attempt.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Identifier and app password pair.
///
/// The password is wiped by the login use case after every attempt and again
/// when the value is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    identifier: String,
    password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    /// Returns the login identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the password, empty once wiped.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns whether a password is still present.
    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// Overwrites the password bytes and empties it.
    pub fn wipe_password(&mut self) {
        self.password.zeroize();
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wipe_password() {
        let mut creds = Credentials::new("alice.bsky.social", "abcd-1234-efgh-5678");
        assert!(creds.has_password());

        creds.wipe_password();

        assert!(creds.password().is_empty());
        assert_eq!(creds.identifier(), "alice.bsky.social");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("alice.bsky.social", "abcd-1234-efgh-5678");
        let debug_output = format!("{creds:?}");

        assert!(!debug_output.contains("abcd-1234"));
        assert!(debug_output.contains("alice.bsky.social"));
    }
}
