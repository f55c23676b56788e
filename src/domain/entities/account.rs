//! Persisted account state.

use super::token::Jwt;

/// Default PDS host.
pub const DEFAULT_SERVER: &str = "bsky.social";

/// What survives between runs: who signed in, where, and their refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Last login identifier.
    pub identifier: String,
    /// PDS host or origin.
    pub server: String,
    /// Resolved DID, once known.
    pub did: Option<String>,
    /// Stored refresh token.
    pub refresh_jwt: Option<Jwt>,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            server: DEFAULT_SERVER.to_string(),
            did: None,
            refresh_jwt: None,
        }
    }
}

impl Account {
    /// Returns whether a stored session can be resumed without a password.
    #[must_use]
    pub fn has_resumable_session(&self) -> bool {
        !self.identifier.is_empty()
            && self
                .refresh_jwt
                .as_ref()
                .is_some_and(|token| !token.is_expired())
    }

    /// Returns whether a refresh token is stored but no longer usable.
    #[must_use]
    pub fn has_expired_session(&self) -> bool {
        self.refresh_jwt
            .as_ref()
            .is_some_and(|token| token.is_expired())
    }

    /// Forgets the stored refresh token.
    pub fn clear_session(&mut self) {
        self.refresh_jwt = None;
    }
}
