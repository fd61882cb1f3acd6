use anyhow::Result;
use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::models::UserRecord;

pub mod repositories;
pub mod seed;

pub use repositories::user::{StoreError, hash_password, verify_password};

/// Process-wide credential store. Cloning shares the same table.
#[derive(Clone, Default)]
pub struct Store {
    users: Arc<repositories::user::UserRepository>,
}

impl Store {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the two bootstrap accounts.
    pub async fn seeded(security: &SecurityConfig) -> Result<Self> {
        let store = Self::new();
        seed::seed_users(&store, security).await?;
        Ok(store)
    }

    // ========== User Repository Methods ==========

    pub async fn find_user_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users.find_by_email(email).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        self.users.create(username, email, password_hash).await
    }

    pub async fn list_users(&self) -> Vec<UserRecord> {
        self.users.list().await
    }

    pub async fn user_count(&self) -> usize {
        self.users.count().await
    }
}
