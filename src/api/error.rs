use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::views;
use crate::services::AuthError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    SessionError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::SessionError(msg) => write!(f, "Session error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors render as an HTML page. Internal detail only goes to the log.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound(title) => (StatusCode::NOT_FOUND, views::not_found(title)).into_response(),
            Self::SessionError(msg) => {
                tracing::error!("Session error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::error_page("Your session could not be updated. Please try again."),
                )
                    .into_response()
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::error_page("Something went wrong. Please try again."),
                )
                    .into_response()
            }
        }
    }
}

/// Handlers re-render the form for user-facing errors, so only session and
/// internal failures are expected to arrive here.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Session(msg) | AuthError::SessionDestroyFailure(msg) => {
                Self::SessionError(msg)
            }
            AuthError::Internal(msg) => Self::InternalError(msg),
            AuthError::InvalidCredentials
            | AuthError::DuplicateEmail
            | AuthError::Validation(_) => {
                Self::InternalError(format!("unhandled user-facing error: {err}"))
            }
        }
    }
}

impl ApiError {
    pub fn not_found(title: impl Into<String>) -> Self {
        Self::NotFound(title.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response =
            ApiError::from(AuthError::Internal("argon2 exploded at 0xdeadbeef".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response).await;
        assert!(!body.contains("0xdeadbeef"));
        assert!(body.contains("Something went wrong"));
    }

    #[tokio::test]
    async fn test_not_found_page() {
        let response = ApiError::not_found("Page Not Found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page Not Found"));
    }

    #[tokio::test]
    async fn test_session_error_hides_detail() {
        let response =
            ApiError::from(AuthError::Session("store lock poisoned".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response).await;
        assert!(!body.contains("poisoned"));
        assert!(body.contains("Your session could not be updated"));
    }

    #[test]
    fn test_auth_error_mapping() {
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::InternalError(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::SessionDestroyFailure("x".to_string())),
            ApiError::SessionError(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::Internal("x".to_string())),
            ApiError::InternalError(_)
        ));
    }
}
