pub mod user;

pub use user::{Role, SessionPrincipal, UserRecord};
