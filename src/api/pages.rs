use axum::{
    Extension, Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{info, warn};

use super::flash::Flash;
use super::{ApiError, AppState, views};
use crate::services::session::LOGGED_OUT_MESSAGE;
use crate::services::{AccessState, SessionContext, access_state, begin_session, end_session};

// ============================================================================
// Forms
// ============================================================================

/// Shown when a form body cannot be decoded at all.
const UNREADABLE_FORM_MESSAGE: &str = "The form could not be read. Please try again.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn index(session: Session, Extension(flash): Extension<Flash>) -> Response {
    if let AccessState::Authenticated(_) = access_state(&session).await {
        return Redirect::to("/landing").into_response();
    }

    views::index(flash.message()).into_response()
}

/// GET /signup
pub async fn signup_form(Extension(flash): Extension<Flash>) -> impl IntoResponse {
    views::signup(flash.message(), None)
}

/// POST /signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Extension(flash): Extension<Flash>,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable signup form");
            return Ok((
                StatusCode::BAD_REQUEST,
                views::signup(flash.message(), Some(UNREADABLE_FORM_MESSAGE)),
            )
                .into_response());
        }
    };

    match state
        .auth()
        .signup(&form.username, &form.email, &form.password)
        .await
    {
        Ok(user) => {
            info!(user_id = user.id, email = %user.email, "User signed up");
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) if e.is_user_facing() => {
            info!(email = %form.email, reason = %e, "Signup rejected");
            Ok(views::signup(flash.message(), Some(&e.to_string())).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /login
pub async fn login_form(Extension(flash): Extension<Flash>) -> impl IntoResponse {
    views::login(flash.message(), None)
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(flash): Extension<Flash>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable login form");
            return Ok((
                StatusCode::BAD_REQUEST,
                views::login(flash.message(), Some(UNREADABLE_FORM_MESSAGE)),
            )
                .into_response());
        }
    };

    let principal = match state.auth().authenticate(&form.email, &form.password).await {
        Ok(principal) => principal,
        Err(e) if e.is_user_facing() => {
            warn!(email = %form.email, "Failed login attempt");
            return Ok(views::login(flash.message(), Some(&e.to_string())).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    begin_session(&session, &principal).await?;
    tracing::Span::current().record("user_id", principal.id);
    info!(user_id = principal.id, role = %principal.role, "User logged in");

    Ok(Redirect::to("/landing").into_response())
}

/// GET /landing
///
/// The record list is recomputed from the store on every request.
pub async fn landing(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(flash): Extension<Flash>,
) -> Response {
    let AccessState::Authenticated(principal) = access_state(&session).await else {
        return Redirect::to("/login").into_response();
    };

    tracing::Span::current().record("user_id", principal.id);

    let view = state.auth().landing_view(&principal).await;
    views::landing(flash.message(), &view).into_response()
}

/// GET /logout
pub async fn logout(session: Session) -> Redirect {
    sign_out(&session).await
}

/// Ends the session and always sends the user home, even when the session
/// store fails to destroy it. The logout message is only left for visitors
/// who were actually signed in.
pub async fn sign_out(session: &dyn SessionContext) -> Redirect {
    let principal = crate::services::current_principal(session).await;
    if let Some(principal) = &principal {
        tracing::Span::current().record("user_id", principal.id);
    }

    match end_session(session).await {
        Ok(()) => {
            if let Some(principal) = principal {
                info!(user_id = principal.id, "User logged out");
                if let Err(e) = session.set_flash(LOGGED_OUT_MESSAGE).await {
                    warn!(error = %e, "Failed to set logout message");
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "Error destroying session");
        }
    }

    Redirect::to("/")
}

/// Fallback for unmatched paths and unsupported methods.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Page Not Found")
}
