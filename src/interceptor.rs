//! Request interceptor: renew an expired access token and replay once.
//!
//! Every request walks a small state machine:
//!
//! ```text
//! Initial --401--> Refreshing --ok--> Retrying --> done
//!    |                  |
//!    +--other--> done   +--err--> done (refresh error)
//! ```
//!
//! A request enters `Refreshing` at most once, so a second 401 after the
//! replay is final. Requests to the refresh and login endpoints never refresh.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::session::SessionManager;
use crate::transport::{ApiRequest, ApiResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestPhase {
    Initial,
    Refreshing,
    Retrying,
}

/// API client that routes every call through the session's transport.
#[derive(Debug, Clone)]
pub struct ApiClient {
    session: SessionManager,
}

impl ApiClient {
    #[must_use]
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Send `request`, refreshing and replaying once on a 401.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when no response was received.
    /// - The refresh failure when the 401 could not be recovered.
    /// - [`ApiError::Status`] for any other non-2xx, including a 401 on replay.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let transport = self.session.transport();
        let mut phase = RequestPhase::Initial;

        loop {
            match phase {
                RequestPhase::Initial => {
                    let response = transport.send(&request).await?;
                    if response.status == 401 && self.may_refresh(&request.path) {
                        tracing::debug!(path = %request.path, "401 received; refreshing access token");
                        phase = RequestPhase::Refreshing;
                        continue;
                    }
                    return response.error_for_status(&request.path);
                }
                RequestPhase::Refreshing => {
                    if let Err(e) = self.session.refresh_token().await {
                        tracing::debug!(path = %request.path, error = %e, "refresh failed; giving up");
                        return Err(e);
                    }
                    phase = RequestPhase::Retrying;
                }
                RequestPhase::Retrying => {
                    let response = transport.send(&request).await?;
                    tracing::debug!(path = %request.path, status = response.status, "replayed after refresh");
                    return response.error_for_status(&request.path);
                }
            }
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::post(path).json(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::put(path).json(body)).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::patch(path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(ApiRequest::delete(path)).await
    }

    /// GET `path` and decode the body as `T`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`], plus [`ApiError::Decode`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get(path).await?.json()
    }

    fn may_refresh(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path);
        let endpoints = self.session.endpoints();
        path != endpoints.refresh && path != endpoints.login
    }
}

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod tests;
