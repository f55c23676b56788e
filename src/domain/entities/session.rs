//! Authenticated session state.

use chrono::{DateTime, Utc};

use super::token::{Jwt, TokenPair};

/// Live session on one PDS.
///
/// Expiry is never stored; it is read from the access token on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    tokens: TokenPair,
    server: String,
    did: String,
}

impl Session {
    /// Creates session from a fresh login.
    #[must_use]
    pub fn new(tokens: TokenPair, server: impl Into<String>, did: impl Into<String>) -> Self {
        Self {
            tokens,
            server: server.into(),
            did: did.into(),
        }
    }

    /// Creates session from a stored refresh token. The access token stays
    /// empty until the first refresh.
    #[must_use]
    pub fn resumed(refresh: Jwt, server: impl Into<String>, did: impl Into<String>) -> Self {
        Self::new(
            TokenPair {
                access: Jwt::default(),
                refresh,
            },
            server,
            did,
        )
    }

    /// Returns access token.
    #[must_use]
    pub const fn access_token(&self) -> &Jwt {
        &self.tokens.access
    }

    /// Returns refresh token.
    #[must_use]
    pub const fn refresh_token(&self) -> &Jwt {
        &self.tokens.refresh
    }

    /// Returns PDS host or origin.
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Returns account DID.
    #[must_use]
    pub fn did(&self) -> &str {
        &self.did
    }

    /// Returns access token expiry.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.tokens.access.expires_at()
    }

    /// Replaces both tokens.
    pub fn replace_tokens(&mut self, tokens: TokenPair) {
        self.tokens = tokens;
    }
}
