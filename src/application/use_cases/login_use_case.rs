//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::LoginResponse;
use crate::domain::entities::{Account, Credentials, Session};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, SessionStorePort};

/// Handles password login and persists the resulting account.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    store: Arc<dyn SessionStorePort>,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(auth_port: Arc<dyn AuthPort>, store: Arc<dyn SessionStorePort>) -> Self {
        Self { auth_port, store }
    }

    /// Logs in against `server`. The password is wiped before returning,
    /// whatever the outcome.
    ///
    /// # Errors
    /// Returns error if credentials are missing or the server refuses them.
    pub async fn execute(
        &self,
        credentials: &mut Credentials,
        server: &str,
    ) -> Result<LoginResponse, AuthError> {
        let result = self.login(credentials, server).await;
        credentials.wipe_password();
        let session = result?;

        info!(did = session.did(), server, "Successfully authenticated");

        let account = Account {
            identifier: credentials.identifier().to_string(),
            server: server.to_string(),
            did: Some(session.did().to_string()),
            refresh_jwt: Some(session.refresh_token().clone()),
        };

        let persisted = match self.store.save_account(&account).await {
            Ok(()) => {
                debug!("Account persisted");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist account");
                false
            }
        };

        Ok(LoginResponse { session, persisted })
    }

    async fn login(
        &self,
        credentials: &Credentials,
        server: &str,
    ) -> Result<Session, AuthError> {
        if credentials.identifier().is_empty() {
            return Err(AuthError::missing("No username provided"));
        }
        if !credentials.has_password() {
            return Err(AuthError::missing("No password provided"));
        }

        debug!(identifier = credentials.identifier(), server, "Attempting login");

        self.auth_port
            .create_session(server, credentials)
            .await
            .inspect_err(|e| warn!(error = %e, "Login failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockAuthPort, MockSessionStore};
    use crate::infrastructure::atproto::XrpcClient;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials::new("alice.bsky.social", "abcd-1234-EFGH-5678")
    }

    #[tokio::test]
    async fn test_successful_login_persists_account() {
        let auth_port = Arc::new(MockAuthPort::new(true));
        let store = Arc::new(MockSessionStore::new());
        let use_case = LoginUseCase::new(auth_port.clone(), store.clone());
        let mut creds = credentials();

        let response = use_case.execute(&mut creds, "bsky.social").await.unwrap();

        assert!(response.persisted);
        assert!(creds.password().is_empty());
        assert_eq!(auth_port.login_calls(), 1);

        let stored = store.snapshot().await;
        assert_eq!(stored.identifier, "alice.bsky.social");
        assert_eq!(stored.did.as_deref(), Some("did:plc:mock"));
        assert_eq!(stored.refresh_jwt.as_ref(), Some(response.session.refresh_token()));
    }

    #[tokio::test]
    async fn test_save_failure_is_not_fatal() {
        let auth_port = Arc::new(MockAuthPort::new(true));
        let store = Arc::new(MockSessionStore::new());
        store.set_saves_fail(true);
        let use_case = LoginUseCase::new(auth_port, store.clone());
        let mut creds = credentials();

        let response = use_case.execute(&mut creds, "bsky.social").await.unwrap();

        assert!(!response.persisted);
        assert_eq!(response.session.did(), "did:plc:mock");
        assert!(store.snapshot().await.refresh_jwt.is_none());
    }

    #[tokio::test]
    async fn test_rejected_login_wipes_password() {
        let auth_port = Arc::new(MockAuthPort::new(false));
        let store = Arc::new(MockSessionStore::new());
        let use_case = LoginUseCase::new(auth_port, store.clone());
        let mut creds = credentials();

        let result = use_case.execute(&mut creds, "bsky.social").await;

        assert!(matches!(result, Err(AuthError::Rejected { .. })));
        assert!(creds.password().is_empty());
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn test_missing_identifier() {
        let auth_port = Arc::new(MockAuthPort::new(true));
        let use_case = LoginUseCase::new(auth_port.clone(), Arc::new(MockSessionStore::new()));
        let mut creds = Credentials::new("", "abcd-1234-EFGH-5678");

        let err = use_case.execute(&mut creds, "bsky.social").await.unwrap_err();

        assert_eq!(err.to_string(), "No username provided");
        assert!(creds.password().is_empty());
        assert_eq!(auth_port.login_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_password() {
        let auth_port = Arc::new(MockAuthPort::new(true));
        let use_case = LoginUseCase::new(auth_port.clone(), Arc::new(MockSessionStore::new()));
        let mut creds = Credentials::new("alice.bsky.social", "");

        let err = use_case.execute(&mut creds, "bsky.social").await.unwrap_err();

        assert_eq!(err.to_string(), "No password provided");
        assert_eq!(auth_port.login_calls(), 0);
    }

    #[tokio::test]
    async fn test_http_login_success_builds_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xrpc/com.atproto.server.createSession"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessJwt": "a",
                "refreshJwt": "b",
                "did": "did:plc:x"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let use_case = LoginUseCase::new(
            Arc::new(XrpcClient::new().unwrap()),
            Arc::new(MockSessionStore::new()),
        );
        let mut creds = credentials();

        let response = use_case.execute(&mut creds, &server.uri()).await.unwrap();

        assert_eq!(response.session.access_token().as_str(), "a");
        assert_eq!(response.session.refresh_token().as_str(), "b");
        assert_eq!(response.session.did(), "did:plc:x");
        assert!(creds.password().is_empty());
    }

    #[tokio::test]
    async fn test_http_login_400_is_rejected_and_wipes_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xrpc/com.atproto.server.createSession"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "InvalidRequest",
                "message": "Invalid identifier or password"
            })))
            .mount(&server)
            .await;

        let use_case = LoginUseCase::new(
            Arc::new(XrpcClient::new().unwrap()),
            Arc::new(MockSessionStore::new()),
        );
        let mut creds = credentials();

        let result = use_case.execute(&mut creds, &server.uri()).await;

        assert!(matches!(result, Err(AuthError::Rejected { .. })));
        assert!(creds.password().is_empty());
    }
}
