//! Stored session resumption.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{Account, Session};
use crate::domain::ports::SessionStorePort;

/// What to do with the stored account at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeDecision {
    /// Stored refresh token is still valid.
    Resumed(Session),
    /// Stored refresh token had expired and was cleared.
    Expired,
    /// Nothing stored to resume from.
    Missing,
}

/// Decides whether a password login is needed.
#[derive(Clone)]
pub struct ResumeSessionUseCase {
    store: Arc<dyn SessionStorePort>,
}

impl ResumeSessionUseCase {
    /// Creates new resume use case.
    #[must_use]
    pub const fn new(store: Arc<dyn SessionStorePort>) -> Self {
        Self { store }
    }

    /// Resumes from `account`, clearing and persisting an expired token.
    pub async fn execute(&self, account: &Account) -> ResumeDecision {
        if account.has_resumable_session() {
            let Some(refresh) = account.refresh_jwt.clone() else {
                return ResumeDecision::Missing;
            };
            info!(identifier = %account.identifier, "Resuming stored session");
            return ResumeDecision::Resumed(Session::resumed(
                refresh,
                account.server.clone(),
                account.did.clone().unwrap_or_default(),
            ));
        }

        if account.has_expired_session() {
            debug!("Stored refresh token expired, clearing it");
            let mut cleared = account.clone();
            cleared.clear_session();
            if let Err(e) = self.store.save_account(&cleared).await {
                warn!(error = %e, "Failed to clear expired refresh token");
            }
            return ResumeDecision::Expired;
        }

        ResumeDecision::Missing
    }
}
