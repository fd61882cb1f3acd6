use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::services::SessionContext;

/// One-shot message taken out of the session for the page being rendered.
#[derive(Debug, Clone, Default)]
pub struct Flash(pub Option<String>);

impl Flash {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Moves the session's flash message into a request extension.
pub async fn flash_middleware(session: Session, mut request: Request, next: Next) -> Response {
    let message = match session.take_flash().await {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash message");
            None
        }
    };

    request.extensions_mut().insert(Flash(message));
    next.run(request).await
}
