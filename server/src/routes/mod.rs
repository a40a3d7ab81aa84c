//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under `/api` plus `/healthz`. The browser
//! frontend runs on its own origin, so CORS allows credentials for exactly
//! that origin; the auth cookies are useless otherwise.

pub mod auth;
pub mod cookies;
pub mod status;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ConfigError;
use crate::state::AppState;

/// CORS policy allowing credentialed requests from `origin`.
///
/// # Errors
///
/// Returns an error if `origin` is not a valid header value.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|_| ConfigError::Invalid { key: "CORS_ALLOW_ORIGIN", value: origin.to_owned() })?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true))
}

/// API routes with tracing and CORS applied.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/logout", get(auth::logout).post(auth::logout))
        .route("/api/user", get(auth::me))
        .route("/api/token/refresh", post(auth::refresh))
        .route("/api/status", get(status::status))
        .route("/api/database/status", get(status::database_status))
        .route("/healthz", get(status::healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
