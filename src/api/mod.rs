use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    middleware,
    routing::get,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, StoreAuthService};

mod error;
pub mod flash;
mod observability;
pub mod pages;
pub mod views;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn auth(&self) -> &dyn AuthService {
        self.auth.as_ref()
    }
}

/// Builds state around an existing store.
pub async fn create_app_state(config: Config, store: Store) -> anyhow::Result<Arc<AppState>> {
    let auth: Arc<dyn AuthService> =
        Arc::new(StoreAuthService::new(store.clone(), config.security.clone()).await?);

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        store,
        auth,
    }))
}

/// Builds state around a freshly seeded store.
pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::seeded(&config.security).await?;
    create_app_state(config, store).await
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_http_only(true)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_expiry_minutes,
        )));

    let static_files = ServeDir::new(&server.public_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(pages::not_found.into_service());

    let page_routes = Router::new()
        .route("/", get(pages::index))
        .route("/signup", get(pages::signup_form).post(pages::signup))
        .route("/login", get(pages::login_form).post(pages::login))
        .route("/landing", get(pages::landing))
        .route("/logout", get(pages::logout))
        .route_layer(middleware::from_fn(flash::flash_middleware));

    Router::new()
        .merge(page_routes)
        .method_not_allowed_fallback(pages::not_found)
        .fallback_service(static_files)
        .layer(session_layer)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
