//! Session ownership and pre-emptive token refresh.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::entities::{Jwt, Session, TokenPair};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, SessionStorePort};

/// How long before access token expiry the background refresh fires.
pub const REFRESH_LEAD: TimeDelta = TimeDelta::minutes(5);

struct Inner {
    auth_port: Arc<dyn AuthPort>,
    store: Option<Arc<dyn SessionStorePort>>,
    session: RwLock<Session>,
    refresh_gate: tokio::sync::Mutex<()>,
    scheduled_at: Mutex<Option<DateTime<Utc>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// Sole owner and writer of the live session.
///
/// Cloning shares the same session. The armed background refresh holds only
/// a weak reference, so it stops mattering once every clone is dropped.
#[derive(Clone)]
pub struct SessionRefresher {
    inner: Arc<Inner>,
}

impl SessionRefresher {
    /// Takes ownership of `session`, refreshes it once and arms the
    /// background refresh.
    ///
    /// # Errors
    /// Returns `RefreshFailed` if the initial refresh is refused.
    pub async fn start(
        auth_port: Arc<dyn AuthPort>,
        session: Session,
        store: Option<Arc<dyn SessionStorePort>>,
    ) -> Result<Self, AuthError> {
        let refresher = Self {
            inner: Arc::new(Inner {
                auth_port,
                store,
                session: RwLock::new(session),
                refresh_gate: tokio::sync::Mutex::new(()),
                scheduled_at: Mutex::new(None),
                timer: Mutex::new(None),
            }),
        };

        refresher.refresh().await?;
        refresher.arm_refresh();

        Ok(refresher)
    }

    /// Returns an access token, refreshing inline first if the cached one has
    /// expired. A failed inline refresh yields the stale token.
    pub async fn auth_token(&self) -> Jwt {
        let current = self.inner.session.read().access_token().clone();
        if !current.is_expired() {
            return current;
        }

        debug!("Access token expired, refreshing before use");
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Inline refresh failed, using stale access token");
        }

        self.inner.session.read().access_token().clone()
    }

    /// Exchanges the refresh token for a new pair and swaps both tokens.
    ///
    /// # Errors
    /// Returns `RefreshFailed` on a non-success response, or the transport
    /// error that prevented the call.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        refresh_inner(&self.inner).await
    }

    /// Arms one deferred refresh firing [`REFRESH_LEAD`] before the current
    /// access token expires, replacing any previously armed one. Returns the
    /// scheduled instant, or `None` when the token carries no expiry.
    pub fn arm_refresh(&self) -> Option<DateTime<Utc>> {
        let Some(expires_at) = self.inner.session.read().expires_at() else {
            warn!("Access token has no expiry, background refresh not armed");
            return None;
        };

        let fire_at = expires_at - REFRESH_LEAD;
        let delay = (fire_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        let weak = Arc::downgrade(&self.inner);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire_deferred(&weak).await;
        });

        if let Some(previous) = self.inner.timer.lock().replace(handle) {
            previous.abort();
        }
        *self.inner.scheduled_at.lock() = Some(fire_at);

        debug!(%fire_at, delay_secs = delay.as_secs(), "Background refresh armed");
        Some(fire_at)
    }

    /// Returns when the armed background refresh fires.
    #[must_use]
    pub fn scheduled_refresh_at(&self) -> Option<DateTime<Utc>> {
        *self.inner.scheduled_at.lock()
    }

    /// Returns a snapshot of the session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.session.read().clone()
    }

    /// Returns the account DID.
    #[must_use]
    pub fn did(&self) -> String {
        self.inner.session.read().did().to_string()
    }

    /// Returns the PDS the session lives on.
    #[must_use]
    pub fn server(&self) -> String {
        self.inner.session.read().server().to_string()
    }
}

async fn fire_deferred(weak: &Weak<Inner>) {
    let Some(inner) = weak.upgrade() else {
        debug!("Session dropped before background refresh");
        return;
    };

    *inner.scheduled_at.lock() = None;
    match refresh_inner(&inner).await {
        Ok(()) => debug!("Background refresh completed"),
        Err(e) => warn!(error = %e, "Background refresh failed"),
    }
}

async fn refresh_inner(inner: &Inner) -> Result<(), AuthError> {
    let _gate = inner.refresh_gate.lock().await;

    let (server, refresh) = {
        let session = inner.session.read();
        (session.server().to_string(), session.refresh_token().clone())
    };

    let tokens: TokenPair = inner.auth_port.refresh_session(&server, &refresh).await?;
    let rotated = tokens.refresh.clone();
    inner.session.write().replace_tokens(tokens);
    info!(server, "Session refreshed");

    if let Some(store) = &inner.store {
        if let Err(e) = store.store_refresh_token(&rotated).await {
            warn!(error = %e, "Failed to persist rotated refresh token");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Account, jwt_testing::jwt_expiring_in};
    use crate::domain::ports::mocks::{MockAuthPort, MockSessionStore};

    fn stored_session() -> Session {
        Session::resumed(jwt_expiring_in(TimeDelta::days(60)), "bsky.social", "did:plc:x")
    }

    #[tokio::test]
    async fn test_start_refreshes_once_and_arms_at_lead() {
        let auth = Arc::new(MockAuthPort::new(true).with_access_ttl(TimeDelta::minutes(10)));

        let refresher = SessionRefresher::start(auth.clone(), stored_session(), None)
            .await
            .unwrap();

        assert_eq!(auth.refresh_calls(), 1);
        let scheduled = refresher.scheduled_refresh_at().unwrap();
        let expected = Utc::now() + TimeDelta::minutes(5);
        assert!((scheduled - expected).num_seconds().abs() <= 5);

        let session = refresher.session();
        assert_eq!(refresher.auth_token().await, *session.access_token());
        assert_eq!(auth.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_start_fails_when_refresh_refused() {
        let auth = Arc::new(MockAuthPort::new(false));

        let result = SessionRefresher::start(auth, stored_session(), None).await;

        assert!(matches!(result, Err(AuthError::RefreshFailed { .. })));
    }

    #[tokio::test]
    async fn test_refresh_rotates_both_tokens() {
        let auth = Arc::new(MockAuthPort::new(true));
        let initial = stored_session();
        let refresher = SessionRefresher::start(auth.clone(), initial.clone(), None)
            .await
            .unwrap();
        let first = refresher.session();

        refresher.refresh().await.unwrap();
        let second = refresher.session();

        assert_eq!(auth.last_refresh_token().as_ref(), Some(first.refresh_token()));
        assert_ne!(first.refresh_token(), initial.refresh_token());
        assert_ne!(second.access_token(), first.access_token());
        assert_eq!(second.did(), "did:plc:x");
    }

    #[tokio::test]
    async fn test_expired_access_refreshes_inline() {
        let auth = Arc::new(MockAuthPort::new(true).with_access_ttl(TimeDelta::minutes(-1)));
        let refresher = SessionRefresher::start(auth.clone(), stored_session(), None)
            .await
            .unwrap();

        let _ = refresher.auth_token().await;

        assert!(auth.refresh_calls() >= 2);
    }

    #[tokio::test]
    async fn test_failed_inline_refresh_returns_stale_token() {
        let auth = Arc::new(MockAuthPort::new(true).with_access_ttl(TimeDelta::minutes(-1)));
        let refresher = SessionRefresher::start(auth.clone(), stored_session(), None)
            .await
            .unwrap();
        auth.set_refresh_succeeds(false);
        let stale = refresher.session().access_token().clone();

        let token = refresher.auth_token().await;

        assert_eq!(token, stale);
        assert!(token.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_refresh_fires_once() {
        let ttl = REFRESH_LEAD + TimeDelta::seconds(2);
        let auth = Arc::new(MockAuthPort::new(true).with_access_ttl(ttl));
        let refresher = SessionRefresher::start(auth.clone(), stored_session(), None)
            .await
            .unwrap();
        assert_eq!(auth.refresh_calls(), 1);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(auth.refresh_calls(), 2);
        assert!(refresher.scheduled_refresh_at().is_none());

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(auth.refresh_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_previous_timer() {
        let ttl = REFRESH_LEAD + TimeDelta::seconds(2);
        let auth = Arc::new(MockAuthPort::new(true).with_access_ttl(ttl));
        let refresher = SessionRefresher::start(auth.clone(), stored_session(), None)
            .await
            .unwrap();

        refresher.arm_refresh();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(auth.refresh_calls(), 2);
    }

    #[tokio::test]
    async fn test_rotated_refresh_token_is_persisted() {
        let auth = Arc::new(MockAuthPort::new(true));
        let store = Arc::new(MockSessionStore::with_account(Account {
            identifier: "alice.bsky.social".into(),
            ..Account::default()
        }));

        let refresher = SessionRefresher::start(auth, stored_session(), Some(store.clone()))
            .await
            .unwrap();

        let stored = store.snapshot().await;
        assert_eq!(stored.refresh_jwt.as_ref(), Some(refresher.session().refresh_token()));
        assert_eq!(stored.identifier, "alice.bsky.social");
    }

    fn pair_of(session: &Session) -> TokenPair {
        TokenPair {
            access: session.access_token().clone(),
            refresh: session.refresh_token().clone(),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_mixed_pair_during_refresh() {
        let auth = Arc::new(MockAuthPort::new(true).with_refresh_delay(Duration::from_millis(20)));
        let refresher = SessionRefresher::start(auth.clone(), stored_session(), None)
            .await
            .unwrap();

        let (first, second) = (refresher.clone(), refresher.clone());
        let refreshes = tokio::spawn(async move {
            let (a, b) = tokio::join!(first.refresh(), second.refresh());
            a.and(b)
        });

        let mut pairs = Vec::new();
        let mut tokens = Vec::new();
        while !refreshes.is_finished() {
            pairs.push(pair_of(&refresher.session()));
            tokens.push(refresher.auth_token().await);
            tokio::task::yield_now().await;
        }
        refreshes.await.unwrap().unwrap();
        pairs.push(pair_of(&refresher.session()));

        let issued = auth.issued_pairs();
        assert_eq!(issued.len(), 3);
        for pair in &pairs {
            assert!(issued.contains(pair), "observed a pair that was never issued");
        }
        for token in &tokens {
            assert!(issued.iter().any(|pair| &pair.access == token));
        }
        assert_eq!(pairs.last(), issued.last());

        // Each refresh presents the token the previous one rotated in.
        let presented = auth.presented_refresh_tokens();
        assert_eq!(presented.len(), 3);
        assert_eq!(presented[1], issued[0].refresh);
        assert_eq!(presented[2], issued[1].refresh);
    }
}
