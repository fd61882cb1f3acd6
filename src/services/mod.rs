pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LandingView};
pub use auth_service_impl::StoreAuthService;

pub mod session;
pub use session::{
    AccessState, SessionContext, access_state, begin_session, current_principal, end_session,
};
