//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::{Credentials, Jwt, Session, TokenPair};
use crate::domain::errors::AuthError;

/// Port for PDS session operations.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchanges identifier and password for a new session.
    async fn create_session(
        &self,
        server: &str,
        credentials: &Credentials,
    ) -> Result<Session, AuthError>;

    /// Exchanges a refresh token for a new token pair.
    async fn refresh_session(&self, server: &str, refresh: &Jwt) -> Result<TokenPair, AuthError>;
}
