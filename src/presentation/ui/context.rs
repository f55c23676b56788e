//! State shared by every page.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::application::{IdentityResolver, LoginUseCase, ResumeSessionUseCase};
use crate::domain::entities::{Account, Credentials, Session};
use crate::domain::ports::{AuthPort, ProfilePort, SessionStorePort};

/// Services and cross-page slots handed to page `init` and `update`.
///
/// Cloning is cheap and every clone sees the same slots. Guards are never
/// held across an await.
#[derive(Clone)]
pub struct PageContext {
    /// Identifier and password validation.
    pub resolver: IdentityResolver,
    /// Password login.
    pub login: LoginUseCase,
    /// Stored session resumption.
    pub resume: ResumeSessionUseCase,
    /// Session endpoints, used by the refresher.
    pub auth_port: Arc<dyn AuthPort>,
    /// Profile lookups.
    pub profile_port: Arc<dyn ProfilePort>,
    /// Persisted account.
    pub store: Arc<dyn SessionStorePort>,
    account: Arc<Mutex<Account>>,
    pending_credentials: Arc<Mutex<Option<Credentials>>>,
    handoff: Arc<Mutex<Option<Session>>>,
}

impl PageContext {
    /// Creates context around the loaded `account`.
    #[must_use]
    pub fn new(
        resolver: IdentityResolver,
        auth_port: Arc<dyn AuthPort>,
        profile_port: Arc<dyn ProfilePort>,
        store: Arc<dyn SessionStorePort>,
        account: Account,
    ) -> Self {
        Self {
            resolver,
            login: LoginUseCase::new(auth_port.clone(), store.clone()),
            resume: ResumeSessionUseCase::new(store.clone()),
            auth_port,
            profile_port,
            store,
            account: Arc::new(Mutex::new(account)),
            pending_credentials: Arc::new(Mutex::new(None)),
            handoff: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns a snapshot of the account.
    #[must_use]
    pub fn account(&self) -> Account {
        self.account.lock().clone()
    }

    /// Mutates the shared account in place.
    pub fn update_account(&self, f: impl FnOnce(&mut Account)) {
        f(&mut *self.account.lock());
    }

    /// Stores credentials for the next authentication attempt, wiping any
    /// previous ones.
    pub fn set_credentials(&self, credentials: Credentials) {
        *self.pending_credentials.lock() = Some(credentials);
    }

    /// Takes the pending credentials.
    #[must_use]
    pub fn take_credentials(&self) -> Option<Credentials> {
        self.pending_credentials.lock().take()
    }

    /// Returns whether credentials are waiting.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.pending_credentials.lock().is_some()
    }

    /// Leaves a fresh session for the App page.
    pub fn hand_off(&self, session: Session) {
        *self.handoff.lock() = Some(session);
    }

    /// Takes the session left by the Auth page.
    #[must_use]
    pub fn take_session(&self) -> Option<Session> {
        self.handoff.lock().take()
    }
}
