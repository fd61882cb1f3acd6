use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::SecurityConfig;
use crate::models::{Role, UserRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Email is already registered: {0}")]
    DuplicateEmail(String),
}

struct UserTable {
    records: Vec<UserRecord>,
    /// Next id to hand out. Only ever grows, so ids are never reused.
    next_id: i32,
}

/// In-memory user table. Lives as long as the process.
pub struct UserRepository {
    table: RwLock<UserTable>,
}

impl Default for UserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: RwLock::new(UserTable {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Get user by email (exact, case-sensitive match)
    pub async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let table = self.table.read().await;
        table.records.iter().find(|u| u.email == email).cloned()
    }

    /// Create a self-service account. Always gets [`Role::User`].
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        self.insert(username, email, password_hash, Role::User)
            .await
    }

    /// Uniqueness is checked under the same write guard as the append, so
    /// callers racing on the same email cannot both get through.
    pub(crate) async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<UserRecord, StoreError> {
        let mut table = self.table.write().await;

        if table.records.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }

        let record = UserRecord {
            id: table.next_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
        };

        table.next_id += 1;
        table.records.push(record.clone());

        Ok(record)
    }

    pub async fn list(&self) -> Vec<UserRecord> {
        self.table.read().await.records.clone()
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.records.len()
    }
}

/// Hash a password using Argon2id with the configured work factor.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, config.argon2_params()?);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash.
///
/// The parameters are read back from the hash itself, and the final digest
/// comparison is constant time.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
