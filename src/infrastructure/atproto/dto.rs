//! XRPC wire types.

use serde::{Deserialize, Serialize};

/// `com.atproto.server.createSession` input.
#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    /// Handle, e-mail or DID.
    pub identifier: &'a str,
    /// App password.
    pub password: &'a str,
}

/// `com.atproto.server.createSession` output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct CreateSessionResponse {
    pub access_jwt: String,
    pub refresh_jwt: String,
    pub did: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `com.atproto.server.refreshSession` output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct RefreshSessionResponse {
    pub access_jwt: String,
    pub refresh_jwt: String,
    #[serde(default)]
    pub did: Option<String>,
}

/// XRPC error body.
#[derive(Debug, Deserialize)]
#[allow(missing_docs)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Returns the most descriptive part of the body.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|text| !text.is_empty())
    }
}
