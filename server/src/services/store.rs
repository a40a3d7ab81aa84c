//! Persistence seam for users and refresh tokens.
//!
//! SYSTEM CONTEXT
//! ==============
//! Routes talk to [`AuthStore`] only. Production uses the Postgres store in
//! `db`; `MemoryAuthStore` backs tests and runs without `DATABASE_URL`.
//!
//! Refresh tokens are keyed by their SHA-256 digest (see `services::refresh`).
//! Expired tokens are treated as absent.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

pub const ROLE_USER: &str = "ROLE_USER";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    Duplicate,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Stored account. The password hash never serializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Every account carries `ROLE_USER` exactly once, ahead of any extra roles.
#[must_use]
pub fn with_default_role(roles: Vec<String>) -> Vec<String> {
    let mut out = vec![ROLE_USER.to_owned()];
    for role in roles {
        if !out.contains(&role) {
            out.push(role);
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStatus {
    pub database: String,
    pub driver: String,
    pub server_version: String,
}

#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Insert a new account; `email` must already be normalized.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;
    async fn save_refresh_token(&self, token_hash: &str, user_id: Uuid, ttl: Duration) -> Result<(), StoreError>;
    /// Owner of an unexpired refresh token.
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<Uuid>, StoreError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), StoreError>;
    async fn status(&self) -> Result<DatabaseStatus, StoreError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

#[derive(Default)]
pub struct MemoryAuthStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    users: HashMap<Uuid, UserRecord>,
    refresh_tokens: HashMap<String, (Uuid, Instant)>,
}

impl MemoryAuthStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, StoreError> {
        let mut inner = self.lock();
        if inner.users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate);
        }
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            roles: with_default_role(Vec::new()),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn save_refresh_token(&self, token_hash: &str, user_id: Uuid, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut inner = self.lock();
        inner.refresh_tokens.retain(|_, (_, expires_at)| *expires_at > now);
        inner.refresh_tokens.insert(token_hash.to_owned(), (user_id, now + ttl));
        Ok(())
    }

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<Uuid>, StoreError> {
        let now = Instant::now();
        Ok(self
            .lock()
            .refresh_tokens
            .get(token_hash)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(user_id, _)| *user_id))
    }

    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), StoreError> {
        self.lock().refresh_tokens.remove(token_hash);
        Ok(())
    }

    async fn status(&self) -> Result<DatabaseStatus, StoreError> {
        Ok(DatabaseStatus {
            database: "memory".into(),
            driver: "memory".into(),
            server_version: env!("CARGO_PKG_VERSION").into(),
        })
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
