//! Database initialization, migrations, and the Postgres-backed auth store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses this module to create the shared SQLx pool and enforce schema
//! migrations before accepting API traffic. [`PgAuthStore`] implements
//! [`AuthStore`] with runtime-checked queries so the crate builds without a
//! live database.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::store::{AuthStore, DatabaseStatus, StoreError, UserRecord, with_default_role};

/// Initialize the `PostgreSQL` connection pool and run migrations.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}

#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        roles: with_default_role(row.get("roles")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl AuthStore for PgAuthStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserRecord, StoreError> {
        let row = sqlx::query(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, roles",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| if is_unique_violation(&e) { StoreError::Duplicate } else { StoreError::Db(e) })?;
        Ok(user_from_row(&row))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query("SELECT id, email, password_hash, roles FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query("SELECT id, email, password_hash, roles FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn save_refresh_token(&self, token_hash: &str, user_id: Uuid, ttl: Duration) -> Result<(), StoreError> {
        // Expired rows are pruned on write; there is no sweeper task.
        sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "INSERT INTO refresh_tokens (token_hash, user_id, expires_at)
             VALUES ($1, $2, now() + make_interval(secs => $3))",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(ttl.as_secs_f64())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<Uuid>, StoreError> {
        let row = sqlx::query("SELECT user_id FROM refresh_tokens WHERE token_hash = $1 AND expires_at > now()")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("user_id")))
    }

    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn status(&self) -> Result<DatabaseStatus, StoreError> {
        let row = sqlx::query(
            "SELECT current_database() AS database, current_setting('server_version') AS server_version",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(DatabaseStatus {
            database: row.get("database"),
            driver: "postgres".into(),
            server_version: row.get("server_version"),
        })
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
