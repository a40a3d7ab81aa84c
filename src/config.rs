//! Client configuration parsed from environment variables.

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("vsb-client/", env!("CARGO_PKG_VERSION"));

/// Paths of the auth endpoints, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub logout: String,
    /// "Who am I" probe answered from the ambient access-token cookies.
    pub identity: String,
    pub refresh: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/auth/login".into(),
            register: "/auth/register".into(),
            logout: "/auth/logout".into(),
            identity: "/user".into(),
            refresh: "/token/refresh".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute API base URL without a trailing slash.
    pub base_url: String,
    pub endpoints: Endpoints,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            endpoints: Endpoints::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl ClientConfig {
    /// Build a config for `base_url` with default endpoints and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the URL is not absolute http(s).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self { base_url: normalize_base_url(base_url)?, ..Self::default() })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `API_BASE_URL`: default `http://127.0.0.1:8000/api`
    /// - `API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `API_CONNECT_TIMEOUT_SECS`: default 10
    /// - `API_USER_AGENT`: default `vsb-client/<version>`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `API_BASE_URL` is malformed.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let request_secs = parse_or(lookup("API_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS);
        let connect_secs = parse_or(lookup("API_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS);
        let user_agent = lookup("API_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            endpoints: Endpoints::default(),
            request_timeout: Duration::from_secs(request_secs),
            connect_timeout: Duration::from_secs(connect_secs),
            user_agent,
        })
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Join an endpoint path onto the base URL.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn parse_or(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}

fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed).map_err(|e| ApiError::Config(format!("invalid API base URL {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(ApiError::Config(format!("unsupported API base URL: {raw}")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ApiError::Config(format!("API base URL must not carry a query or fragment: {raw}")));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
