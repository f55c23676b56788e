//! HTTPS well-known DID lookup.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::client::build_http_client;
use crate::domain::errors::{AuthError, LookupError};
use crate::domain::ports::{WellKnownPort, WellKnownResponse};

const WELL_KNOWN_PATH: &str = "/.well-known/atproto-did";

/// Fetches `https://<handle>/.well-known/atproto-did`.
pub struct WellKnownClient {
    client: Client,
    origin_override: Option<String>,
}

impl WellKnownClient {
    /// Creates new client.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, AuthError> {
        Ok(Self {
            client: build_http_client()?,
            origin_override: None,
        })
    }

    /// Creates client that sends every lookup to `origin` instead of the
    /// handle's own host.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_origin(origin: impl Into<String>) -> Result<Self, AuthError> {
        Ok(Self {
            client: build_http_client()?,
            origin_override: Some(origin.into()),
        })
    }

    fn url(&self, handle: &str) -> String {
        match &self.origin_override {
            Some(origin) => format!("{}{WELL_KNOWN_PATH}", origin.trim_end_matches('/')),
            None => format!("https://{handle}{WELL_KNOWN_PATH}"),
        }
    }
}

#[async_trait]
impl WellKnownPort for WellKnownClient {
    async fn fetch_did(&self, handle: &str) -> Result<WellKnownResponse, LookupError> {
        let url = self.url(handle);
        debug!(url, "Fetching well-known DID");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::new(handle, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LookupError::new(handle, e))?;

        Ok(WellKnownResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_url_targets_handle_host() {
        let client = WellKnownClient::new().unwrap();
        assert_eq!(
            client.url("alice.example.com"),
            "https://alice.example.com/.well-known/atproto-did"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/atproto-did"))
            .respond_with(ResponseTemplate::new(200).set_body_string("did=did:plc:abc"))
            .mount(&server)
            .await;

        let client = WellKnownClient::with_origin(server.uri()).unwrap();
        let response = client.fetch_did("alice.example.com").await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "did=did:plc:abc");
    }

    #[tokio::test]
    async fn test_fetch_reports_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/atproto-did"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = WellKnownClient::with_origin(server.uri()).unwrap();
        let response = client.fetch_did("alice.example.com").await.unwrap();

        assert_eq!(response.status, 404);
    }
}
