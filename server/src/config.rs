//! Server configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` before this runs, so everything here reads the
//! process environment only.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_JWT_TOKEN_TTL_SECS: u64 = 3600;
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 2_592_000;
pub const DEFAULT_CORS_ALLOW_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_API_VERSION: &str = "1.0.0";
pub const DEFAULT_LOGIN_THROTTLE_MAX_ATTEMPTS: usize = 5;
pub const DEFAULT_LOGIN_THROTTLE_WINDOW_SECS: u64 = 60;
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnv(&'static str),
    #[error("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes")]
    WeakSecret,
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Postgres URL. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub cookie_secure: bool,
    pub cors_allow_origin: String,
    pub api_version: String,
    pub throttle_max_attempts: usize,
    pub throttle_window: Duration,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("cors_allow_origin", &self.cors_allow_origin)
            .field("api_version", &self.api_version)
            .field("throttle_max_attempts", &self.throttle_max_attempts)
            .field("throttle_window", &self.throttle_window)
            .finish()
    }
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Required:
    /// - `JWT_SECRET`: HMAC key, at least 32 bytes
    ///
    /// Optional:
    /// - `PORT` (8000), `DATABASE_URL`, `DB_MAX_CONNECTIONS` (5)
    /// - `JWT_TOKEN_TTL_SECS` (3600), `REFRESH_TOKEN_TTL_SECS` (30 days)
    /// - `COOKIE_SECURE` (false), `CORS_ALLOW_ORIGIN`, `API_VERSION`
    /// - `LOGIN_THROTTLE_MAX_ATTEMPTS` (5), `LOGIN_THROTTLE_WINDOW_SECS` (60)
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or weak, or `PORT` is not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = validate_jwt_secret(std::env::var("JWT_SECRET").ok())?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            database_url: env_nonempty("DATABASE_URL"),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            jwt_secret,
            access_ttl: Duration::from_secs(env_parse("JWT_TOKEN_TTL_SECS", DEFAULT_JWT_TOKEN_TTL_SECS)),
            refresh_ttl: Duration::from_secs(env_parse("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TOKEN_TTL_SECS)),
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(false),
            cors_allow_origin: env_nonempty("CORS_ALLOW_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ALLOW_ORIGIN.into()),
            api_version: env_nonempty("API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.into()),
            throttle_max_attempts: env_parse("LOGIN_THROTTLE_MAX_ATTEMPTS", DEFAULT_LOGIN_THROTTLE_MAX_ATTEMPTS),
            throttle_window: Duration::from_secs(env_parse(
                "LOGIN_THROTTLE_WINDOW_SECS",
                DEFAULT_LOGIN_THROTTLE_WINDOW_SECS,
            )),
        })
    }
}

// =============================================================================
// ENV HELPERS
// =============================================================================

pub(crate) fn validate_jwt_secret(raw: Option<String>) -> Result<String, ConfigError> {
    let secret = raw.filter(|s| !s.is_empty()).ok_or(ConfigError::MissingEnv("JWT_SECRET"))?;
    if secret.len() < MIN_JWT_SECRET_LEN {
        return Err(ConfigError::WeakSecret);
    }
    Ok(secret)
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
