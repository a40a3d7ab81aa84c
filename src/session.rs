//! Auth session manager: who is signed in, and keeping them signed in.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend authenticates requests with short-lived access-token cookies
//! and a long-lived refresh-token cookie. The transport's cookie store carries
//! both; this module never sees a token value. It tracks the current user,
//! performs login/register/logout, and renews the access token on demand for
//! the request interceptor.
//!
//! DESIGN
//! ======
//! - `SessionManager` is a cheap `Clone` handle over one shared session.
//! - The observable state lives in a `watch` channel so UI code can
//!   `subscribe()` and re-render on change; only this module writes it.
//! - A refresh is a single shared future. The first caller creates it and
//!   parks it in a slot; every concurrent caller clones and awaits the same
//!   future and sees the same outcome. The future clears the slot itself when
//!   it finishes, so the next 401 starts a fresh cycle.
//! - Login, register, refresh and logout go straight to the transport. Only
//!   the identity probe in `check_auth` goes through the interceptor.
//!
//! TRADE-OFFS
//! ==========
//! A waiter that is dropped mid-refresh does not cancel the refresh for the
//! others; the shared future keeps running as long as anyone polls it.

use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::watch;

use crate::config::{ClientConfig, Endpoints};
use crate::error::ApiError;
use crate::interceptor::ApiClient;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
use crate::types::{Credentials, Registered, Registration, SessionSnapshot, User, ValidationErrors};

type PendingRefresh = Shared<BoxFuture<'static, Result<(), ApiError>>>;

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    state: watch::Sender<SessionSnapshot>,
    refresh: Mutex<Option<PendingRefresh>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("endpoints", &self.inner.endpoints)
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                endpoints,
                state: watch::Sender::new(SessionSnapshot::default()),
                refresh: Mutex::new(None),
            }),
        }
    }

    /// Session over a cookie-carrying HTTP transport built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config.endpoints.clone()))
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().current_user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refresh_slot().is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    /// Intercepting API client bound to this session.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.clone())
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    // =========================================================================
    // AUTH OPERATIONS
    // =========================================================================

    /// Submit credentials, then confirm the identity the backend now sees.
    ///
    /// Returns the result of the follow-up [`SessionManager::check_auth`].
    ///
    /// # Errors
    ///
    /// Returns the login failure (bad credentials, throttled, network). The
    /// session is cleared first.
    pub async fn login(&self, credentials: &Credentials) -> Result<bool, ApiError> {
        let body = serde_json::to_value(credentials).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = ApiRequest::post(&self.inner.endpoints.login).json(body);

        if let Err(e) = self.send_direct(&request).await {
            tracing::warn!(email = %credentials.email, error = %e, "login failed");
            self.clear_user();
            return Err(e);
        }

        tracing::info!(email = %credentials.email, "login accepted");
        Ok(self.check_auth().await)
    }

    /// Create an account. Does not sign the user in.
    ///
    /// # Errors
    ///
    /// A 400 carrying `{"errors": [..]}` becomes [`ApiError::Validation`];
    /// anything else is returned as-is. The session is cleared on failure.
    pub async fn register(&self, registration: &Registration) -> Result<Registered, ApiError> {
        let body = serde_json::to_value(registration).map_err(|e| ApiError::Decode(e.to_string()))?;
        let request = ApiRequest::post(&self.inner.endpoints.register).json(body);

        let result = match self.send_direct(&request).await {
            Ok(response) => response.json::<Registered>(),
            Err(e) => Err(validation_or(e)),
        };

        match result {
            Ok(registered) => {
                tracing::info!(email = %registration.email, "registration accepted");
                Ok(registered)
            }
            Err(e) => {
                tracing::warn!(email = %registration.email, error = %e, "registration failed");
                self.clear_user();
                Err(e)
            }
        }
    }

    /// Ask the backend who the cookies belong to and record the answer.
    ///
    /// Goes through the interceptor, so an expired access token is renewed
    /// transparently. Never errors: any failure means "not signed in".
    pub async fn check_auth(&self) -> bool {
        match self.client().get_json::<User>(&self.inner.endpoints.identity).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "identity confirmed");
                self.set_user(user);
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "identity check failed");
                self.clear_user();
                false
            }
        }
    }

    /// Renew the access token, sharing one network call among all callers.
    ///
    /// # Errors
    ///
    /// Returns the refresh failure after the session has been logged out.
    pub async fn refresh_token(&self) -> Result<(), ApiError> {
        let pending = {
            let mut slot = self.inner.refresh.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(pending) = slot.clone() {
                tracing::debug!("joining in-flight token refresh");
                pending
            } else {
                let this = self.clone();
                let pending = async move { this.run_refresh().await }.boxed().shared();
                *slot = Some(pending.clone());
                self.inner.state.send_modify(|s| s.is_refreshing = true);
                pending
            }
        };
        pending.await
    }

    /// End the session on the backend and locally.
    ///
    /// # Errors
    ///
    /// Returns the network failure, if any. Local state is cleared either way.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let request = ApiRequest::post(&self.inner.endpoints.logout);
        let result = self.send_direct(&request).await;
        self.clear_user();
        match result {
            Ok(_) => {
                tracing::info!("logged out");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "logout request failed; local session cleared");
                Err(e)
            }
        }
    }

    pub fn clear_user(&self) {
        self.inner.state.send_if_modified(|s| {
            let changed = s.current_user.is_some() || s.is_authenticated;
            s.current_user = None;
            s.is_authenticated = false;
            changed
        });
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn set_user(&self, user: User) {
        self.inner.state.send_modify(|s| {
            s.current_user = Some(user);
            s.is_authenticated = true;
        });
    }

    fn refresh_slot(&self) -> Option<PendingRefresh> {
        self.inner.refresh.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    async fn run_refresh(self) -> Result<(), ApiError> {
        let request = ApiRequest::post(&self.inner.endpoints.refresh);
        let result = self.send_direct(&request).await.map(|_| ());

        if let Err(e) = &result {
            tracing::warn!(error = %e, "token refresh failed; logging out");
            if let Err(logout_err) = self.logout().await {
                tracing::debug!(error = %logout_err, "logout after failed refresh also failed");
            }
        } else {
            tracing::debug!("access token refreshed");
        }

        // Cleared under the slot lock so a refresh started right after this
        // one cannot have its `is_refreshing = true` overwritten.
        let mut slot = self.inner.refresh.lock().unwrap_or_else(PoisonError::into_inner);
        slot.take();
        self.inner.state.send_modify(|s| s.is_refreshing = false);
        drop(slot);
        result
    }

    async fn send_direct(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.inner.transport.send(request).await?.error_for_status(&request.path)
    }
}

fn validation_or(err: ApiError) -> ApiError {
    if let ApiError::Status { status: 400, body, .. } = &err {
        if let Ok(parsed) = serde_json::from_str::<ValidationErrors>(body) {
            if !parsed.errors.is_empty() {
                return ApiError::Validation(parsed.errors);
            }
        }
    }
    err
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
