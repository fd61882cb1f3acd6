//! Store-backed implementation of the `AuthService` trait.

use anyhow::Context;
use async_trait::async_trait;
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::{Store, hash_password, verify_password};
use crate::models::{SessionPrincipal, UserRecord};
use crate::services::auth_service::{AuthError, AuthService, LandingView};

const DECOY_PASSWORD: &str = "sessiongate-decoy-password";

pub struct StoreAuthService {
    store: Store,
    security: SecurityConfig,
    /// Verified against when the email is unknown, so that path costs the
    /// same hash comparison as a wrong password.
    decoy_hash: String,
}

impl StoreAuthService {
    pub async fn new(store: Store, security: SecurityConfig) -> anyhow::Result<Self> {
        let config = security.clone();
        let decoy_hash = task::spawn_blocking(move || hash_password(DECOY_PASSWORD, &config))
            .await
            .context("Password hashing task panicked")??;

        Ok(Self {
            store,
            security,
            decoy_hash,
        })
    }

    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();
        let config = self.security.clone();

        let hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")??;

        Ok(hash)
    }

    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AuthError> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();

        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .context("Password verification task panicked")??;

        Ok(is_valid)
    }
}

#[async_trait]
impl AuthService for StoreAuthService {
    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Username, email and password are required.".to_string(),
            ));
        }

        // Cheap early exit; the store re-checks when inserting.
        if self.store.find_user_by_email(email).await.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hash(password).await?;

        let record = self
            .store
            .create_user(username, email, &password_hash)
            .await?;

        Ok(record)
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionPrincipal, AuthError> {
        let Some(user) = self.store.find_user_by_email(email).await else {
            self.verify(password, &self.decoy_hash).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify(password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(SessionPrincipal::from(&user))
    }

    async fn landing_view(&self, principal: &SessionPrincipal) -> LandingView {
        let users = if principal.role.is_admin() {
            self.store.list_users().await
        } else {
            Vec::new()
        };

        LandingView {
            user: principal.clone(),
            users,
        }
    }
}
