//! Session context and the anonymous/authenticated access state.
//!
//! Handlers never read the session ambiently; they pass a [`SessionContext`]
//! into these functions, which keeps the gating rules testable without HTTP.

use async_trait::async_trait;
use tower_sessions::Session;

use crate::models::SessionPrincipal;
use crate::services::auth_service::AuthError;

/// Session key holding the [`SessionPrincipal`].
pub const PRINCIPAL_KEY: &str = "user";

/// Session key holding a one-shot flash message.
pub const FLASH_KEY: &str = "message";

pub const LOGGED_OUT_MESSAGE: &str = "Successfully logged out.";

/// Per-request view of the session store.
#[async_trait]
pub trait SessionContext: Send + Sync {
    async fn principal(&self) -> Result<Option<SessionPrincipal>, AuthError>;

    /// Attach a principal, rotating the session id first.
    async fn attach(&self, principal: &SessionPrincipal) -> Result<(), AuthError>;

    /// Drop all session data and delete the session from the store.
    async fn destroy(&self) -> Result<(), AuthError>;

    async fn set_flash(&self, message: &str) -> Result<(), AuthError>;

    async fn take_flash(&self) -> Result<Option<String>, AuthError>;
}

#[async_trait]
impl SessionContext for Session {
    async fn principal(&self) -> Result<Option<SessionPrincipal>, AuthError> {
        self.get::<SessionPrincipal>(PRINCIPAL_KEY)
            .await
            .map_err(|e| AuthError::Session(e.to_string()))
    }

    async fn attach(&self, principal: &SessionPrincipal) -> Result<(), AuthError> {
        self.cycle_id()
            .await
            .map_err(|e| AuthError::Session(e.to_string()))?;
        self.insert(PRINCIPAL_KEY, principal)
            .await
            .map_err(|e| AuthError::Session(e.to_string()))
    }

    async fn destroy(&self) -> Result<(), AuthError> {
        self.flush()
            .await
            .map_err(|e| AuthError::SessionDestroyFailure(e.to_string()))
    }

    async fn set_flash(&self, message: &str) -> Result<(), AuthError> {
        self.insert(FLASH_KEY, message)
            .await
            .map_err(|e| AuthError::Session(e.to_string()))
    }

    async fn take_flash(&self) -> Result<Option<String>, AuthError> {
        // Only touch the session when there is something to remove, so plain
        // anonymous page views do not mark it modified.
        let message = self
            .get::<String>(FLASH_KEY)
            .await
            .map_err(|e| AuthError::Session(e.to_string()))?;

        if message.is_some() {
            self.remove::<String>(FLASH_KEY)
                .await
                .map_err(|e| AuthError::Session(e.to_string()))?;
        }

        Ok(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessState {
    Anonymous,
    Authenticated(SessionPrincipal),
}

/// The principal on this session, or `None` when absent or expired.
///
/// A failing session store is logged and treated as anonymous.
pub async fn current_principal(session: &dyn SessionContext) -> Option<SessionPrincipal> {
    match session.principal().await {
        Ok(principal) => principal,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session, treating request as anonymous");
            None
        }
    }
}

pub async fn access_state(session: &dyn SessionContext) -> AccessState {
    current_principal(session)
        .await
        .map_or(AccessState::Anonymous, AccessState::Authenticated)
}

/// Anonymous -> Authenticated.
pub async fn begin_session(
    session: &dyn SessionContext,
    principal: &SessionPrincipal,
) -> Result<(), AuthError> {
    session.attach(principal).await
}

/// Authenticated -> Anonymous.
///
/// # Errors
///
/// Returns [`AuthError::SessionDestroyFailure`]. Callers are expected to log it
/// and carry on with their redirect.
pub async fn end_session(session: &dyn SessionContext) -> Result<(), AuthError> {
    session.destroy().await
}
