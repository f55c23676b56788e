//! XRPC HTTP client.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, header};
use tracing::{debug, warn};

use super::dto::{
    CreateSessionRequest, CreateSessionResponse, ErrorResponse, RefreshSessionResponse,
};
use crate::domain::entities::{Credentials, Jwt, Profile, Session, TokenPair};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, ProfilePort};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("atsky/", env!("CARGO_PKG_VERSION"));

const CREATE_SESSION: &str = "com.atproto.server.createSession";
const REFRESH_SESSION: &str = "com.atproto.server.refreshSession";
const GET_PROFILE: &str = "app.bsky.actor.getProfile";

/// Returns the origin for `server`, assuming https for bare hosts.
#[must_use]
pub fn server_origin(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.contains("://") {
        server.to_string()
    } else {
        format!("https://{server}")
    }
}

/// Builds the shared HTTP client.
///
/// # Errors
/// Returns error if HTTP client creation fails.
pub fn build_http_client() -> Result<Client, AuthError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| AuthError::unexpected(format!("failed to create HTTP client: {e}")))
}

/// Client for the session and actor XRPC procedures of a PDS.
#[derive(Clone)]
pub struct XrpcClient {
    client: Client,
}

impl XrpcClient {
    /// Creates new client.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, AuthError> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    fn endpoint(server: &str, nsid: &str) -> String {
        format!("{}/xrpc/{nsid}", server_origin(server))
    }

    async fn error_detail(status: StatusCode, response: Response) -> String {
        match response.json::<ErrorResponse>().await {
            Ok(body) => match body.detail() {
                Some(detail) => format!("{status} ({detail})"),
                None => status.to_string(),
            },
            Err(_) => status.to_string(),
        }
    }
}

fn transport_error(e: &reqwest::Error) -> AuthError {
    warn!(error = %e, "XRPC request failed");
    if e.is_timeout() {
        AuthError::transport("request timed out")
    } else if e.is_connect() {
        AuthError::transport("failed to connect to server")
    } else {
        AuthError::transport(e.to_string())
    }
}

#[async_trait]
impl AuthPort for XrpcClient {
    async fn create_session(
        &self,
        server: &str,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let url = Self::endpoint(server, CREATE_SESSION);
        debug!(url, "Creating session");

        let response = self
            .client
            .post(&url)
            .json(&CreateSessionRequest {
                identifier: credentials.identifier(),
                password: credentials.password(),
            })
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::rejected(Self::error_detail(status, response).await));
        }

        let body: CreateSessionResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse createSession response");
            AuthError::decode(e.to_string())
        })?;

        debug!(did = %body.did, handle = ?body.handle, "Session created");

        Ok(Session::new(
            TokenPair::new(body.access_jwt, body.refresh_jwt),
            server,
            body.did,
        ))
    }

    async fn refresh_session(&self, server: &str, refresh: &Jwt) -> Result<TokenPair, AuthError> {
        let url = Self::endpoint(server, REFRESH_SESSION);
        debug!(url, "Refreshing session");

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", refresh.as_str()))
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::refresh_failed(
                Self::error_detail(status, response).await,
            ));
        }

        let body: RefreshSessionResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse refreshSession response");
            AuthError::decode(e.to_string())
        })?;

        Ok(TokenPair::new(body.access_jwt, body.refresh_jwt))
    }
}

#[async_trait]
impl ProfilePort for XrpcClient {
    async fn get_profile(
        &self,
        server: &str,
        access: &Jwt,
        actor: &str,
    ) -> Result<Profile, AuthError> {
        let url = Self::endpoint(server, GET_PROFILE);
        debug!(url, actor, "Fetching profile");

        let response = self
            .client
            .get(&url)
            .query(&[("actor", actor)])
            .bearer_auth(access.as_str())
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = Self::error_detail(status, response).await;
            return Err(if status == StatusCode::UNAUTHORIZED {
                AuthError::rejected(detail)
            } else {
                AuthError::unexpected(format!("profile request failed: {detail}"))
            });
        }

        response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse profile response");
            AuthError::decode(e.to_string())
        })
    }
}
