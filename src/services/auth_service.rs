//! Domain service for signup, login and role-gated record visibility.

use thiserror::Error;

use crate::db::StoreError;
use crate::models::{SessionPrincipal, UserRecord};

/// Errors specific to authentication operations.
///
/// The `Display` text of the recoverable variants is what users see on the
/// re-rendered form.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email and wrong password both map here, with the same text.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("Email is already registered.")]
    DuplicateEmail,

    #[error("{0}")]
    Validation(String),

    #[error("Failed to destroy session: {0}")]
    SessionDestroyFailure(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether the error should be shown on the form that caused it.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::DuplicateEmail | Self::Validation(_)
        )
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => Self::DuplicateEmail,
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// What the landing page is allowed to show for one request.
#[derive(Debug, Clone)]
pub struct LandingView {
    pub user: SessionPrincipal,
    /// Every stored record for admins, empty for everyone else.
    pub users: Vec<UserRecord>,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a self-service account with role `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateEmail`] if the email is taken, also when
    /// another signup for the same email wins the race while this one hashes.
    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AuthError>;

    /// Verifies credentials and returns the principal to attach to the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email and for a
    /// wrong password alike.
    async fn authenticate(&self, email: &str, password: &str)
    -> Result<SessionPrincipal, AuthError>;

    /// Builds the landing view for the acting principal. Evaluated on every
    /// call, never cached.
    async fn landing_view(&self, principal: &SessionPrincipal) -> LandingView;
}
