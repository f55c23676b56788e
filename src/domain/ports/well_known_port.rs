//! Well-known DID document port definition.

use async_trait::async_trait;

use crate::domain::errors::LookupError;

/// Raw answer from `/.well-known/atproto-did`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellKnownResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Port for fetching a handle's well-known DID over HTTPS.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WellKnownPort: Send + Sync {
    /// Fetches the well-known DID resource hosted at `handle`.
    async fn fetch_did(&self, handle: &str) -> Result<WellKnownResponse, LookupError>;
}
