use anyhow::{Context, Result};
use tokio::task;
use tracing::info;

use super::Store;
use crate::config::SecurityConfig;
use crate::db::repositories::user::hash_password;
use crate::models::Role;

struct SeedUser {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

static SEED_USERS: [SeedUser; 2] = [
    SeedUser {
        username: "AdminUser",
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
    },
    SeedUser {
        username: "RegularUser",
        email: "user@example.com",
        password: "user123",
        role: Role::User,
    },
];

/// Insert the bootstrap accounts. Hashes are computed once, here, at startup.
pub async fn seed_users(store: &Store, security: &SecurityConfig) -> Result<()> {
    for seed in &SEED_USERS {
        let config = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(seed.password, &config))
            .await
            .context("Password hashing task panicked")??;

        store
            .users
            .insert(seed.username, seed.email, &password_hash, seed.role)
            .await
            .with_context(|| format!("Failed to seed user {}", seed.email))?;
    }

    info!(count = SEED_USERS.len(), "Seeded bootstrap users");
    Ok(())
}
