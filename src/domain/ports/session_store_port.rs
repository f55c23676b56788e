//! Account persistence port definition.

use async_trait::async_trait;

use crate::domain::entities::{Account, Jwt};
use crate::domain::errors::AuthError;

/// Port for persisting account state between runs.
#[async_trait]
pub trait SessionStorePort: Send + Sync {
    /// Loads stored account.
    async fn load_account(&self) -> Result<Account, AuthError>;

    /// Stores account.
    async fn save_account(&self, account: &Account) -> Result<(), AuthError>;

    /// Stores a rotated refresh token, leaving other fields untouched.
    async fn store_refresh_token(&self, refresh: &Jwt) -> Result<(), AuthError> {
        let mut account = self.load_account().await?;
        account.refresh_jwt = Some(refresh.clone());
        self.save_account(&account).await
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    /// In-memory account store for testing.
    pub struct MockSessionStore {
        account: RwLock<Account>,
        saves: AtomicUsize,
        saves_fail: AtomicBool,
    }

    impl MockSessionStore {
        /// Creates store holding a default account.
        pub fn new() -> Self {
            Self::with_account(Account::default())
        }

        /// Creates store holding `account`.
        pub fn with_account(account: Account) -> Self {
            Self {
                account: RwLock::new(account),
                saves: AtomicUsize::new(0),
                saves_fail: AtomicBool::new(false),
            }
        }

        /// Returns stored account.
        pub async fn snapshot(&self) -> Account {
            self.account.read().await.clone()
        }

        /// Makes every later save fail with a storage error.
        pub fn set_saves_fail(&self, value: bool) {
            self.saves_fail.store(value, Ordering::SeqCst);
        }

        /// Number of successful saves.
        pub fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    impl Default for MockSessionStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl SessionStorePort for MockSessionStore {
        async fn load_account(&self) -> Result<Account, AuthError> {
            Ok(self.account.read().await.clone())
        }

        async fn save_account(&self, account: &Account) -> Result<(), AuthError> {
            if self.saves_fail.load(Ordering::SeqCst) {
                return Err(AuthError::storage("read-only file system"));
            }
            *self.account.write().await = account.clone();
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
