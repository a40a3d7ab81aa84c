//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the auth store behind a trait object, the token issuer, cookie and
//! refresh settings, and the login throttle.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::rate_limit::LoginThrottle;
use crate::services::store::AuthStore;
use crate::services::token::TokenIssuer;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuthStore>,
    pub tokens: TokenIssuer,
    pub refresh_ttl: Duration,
    pub cookie_secure: bool,
    pub throttle: LoginThrottle,
    pub api_version: String,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn AuthStore>, config: &ServerConfig) -> Self {
        Self {
            store,
            tokens: TokenIssuer::new(&config.jwt_secret, config.access_ttl),
            refresh_ttl: config.refresh_ttl,
            cookie_secure: config.cookie_secure,
            throttle: LoginThrottle::new(config.throttle_max_attempts, config.throttle_window),
            api_version: config.api_version.clone(),
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
