//! HTTP error responses.
//!
//! Every handler returns `Result<_, ApiError>`. Auth failures render as
//! `{"code": 401, "message": ..}`, registration failures as `{"errors": [..]}`.
//! Internal failures are logged here and rendered without detail.

use axum::Json;
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::rate_limit::ThrottleError;
use crate::services::password::PasswordError;
use crate::services::store::StoreError;
use crate::services::token::TokenError;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const TOKEN_NOT_FOUND: &str = "JWT Token not found";
pub const REFRESH_TOKEN_NOT_FOUND: &str = "JWT Refresh Token Not Found";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Throttled(#[from] ThrottleError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Throttled(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Store(_) | Self::Password(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired | TokenError::Invalid => Self::Unauthorized(e.to_string()),
            TokenError::Sign(msg) => Self::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Validation(errors) => (status, Json(json!({ "errors": errors }))).into_response(),
            Self::Throttled(ThrottleError::TooManyAttempts { retry_after_secs }) => {
                let body = json!({
                    "code": status.as_u16(),
                    "message": format!("Too many failed login attempts, please try again in {retry_after_secs} seconds."),
                });
                let mut response = (status, Json(body)).into_response();
                if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                    response.headers_mut().insert(RETRY_AFTER, value);
                }
                response
            }
            Self::Unauthorized(message) | Self::BadRequest(message) => {
                (status, Json(json!({ "code": status.as_u16(), "message": message }))).into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (status, Json(json!({ "code": status.as_u16(), "message": "Internal server error" }))).into_response()
            }
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
