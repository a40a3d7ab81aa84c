//! Auth routes: login, registration, logout, identity, token refresh.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ApiError, INVALID_CREDENTIALS, REFRESH_TOKEN_NOT_FOUND, TOKEN_NOT_FOUND};
use crate::routes::cookies;
use crate::services::store::{StoreError, UserRecord};
use crate::services::token::TokenError;
use crate::services::validation::{EMAIL_INVALID, EMAIL_TAKEN, normalize_email, registration_errors};
use crate::services::{password, refresh};
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user resolved from the access-token cookies (or a bearer
/// header). Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: UserRecord,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token =
            cookies::access_token_from(&parts.headers).ok_or_else(|| ApiError::unauthorized(TOKEN_NOT_FOUND))?;

        let app_state = AppState::from_ref(state);
        let claims = app_state.tokens.verify(&token)?;
        let user = app_state
            .store
            .find_user(claims.user_id()?)
            .await?
            .ok_or_else(|| ApiError::from(TokenError::Invalid))?;

        Ok(Self { user })
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "username")]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/login`: check credentials, set access + refresh cookies.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let Some(raw_email) = body.email else {
        return Err(ApiError::BadRequest("The key \"email\" must be provided.".into()));
    };
    let Some(candidate) = body.password else {
        return Err(ApiError::BadRequest("The key \"password\" must be provided.".into()));
    };

    let normalized = normalize_email(&raw_email);
    let throttle_key = normalized.clone().unwrap_or_else(|| raw_email.trim().to_ascii_lowercase());
    state.throttle.check(&throttle_key)?;

    let user = match &normalized {
        Some(email) => state.store.find_user_by_email(email).await?,
        None => None,
    };
    let verified = match &user {
        Some(user) => check_password(user.password_hash.clone(), candidate).await?,
        None => {
            // Same Argon2 cost as a wrong password, so timing does not reveal accounts.
            if let Some(hash) = password::dummy_hash() {
                check_password(hash.to_owned(), candidate).await?;
            }
            false
        }
    };
    let Some(user) = user.filter(|_| verified) else {
        state.throttle.record_failure(&throttle_key);
        tracing::warn!(email = %throttle_key, "login rejected");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };
    state.throttle.reset(&throttle_key);

    let access = state.tokens.issue(&user)?;
    let refresh_token = refresh::generate_token();
    state
        .store
        .save_refresh_token(&refresh::hash_token(&refresh_token), user.id, state.refresh_ttl)
        .await?;

    let jar = cookies::with_access_cookies(CookieJar::new(), &access, state.tokens.ttl(), state.cookie_secure)?
        .add(cookies::refresh_cookie(refresh_token, state.refresh_ttl, state.cookie_secure));

    tracing::info!(user_id = %user.id, "login succeeded");
    Ok((jar, Json(json!({ "user": user }))))
}

/// `POST /api/auth/register`: create an account. Does not log in.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let errors = registration_errors(&body.email, &body.password);
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    let Some(email) = normalize_email(&body.email) else {
        return Err(ApiError::Validation(vec![EMAIL_INVALID.into()]));
    };
    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Validation(vec![EMAIL_TAKEN.into()]));
    }

    let hash = tokio::task::spawn_blocking(move || password::hash_password(&body.password))
        .await
        .map_err(|e| ApiError::Internal(format!("hash task failed: {e}")))??;

    let user = match state.store.create_user(&email, &hash).await {
        Ok(user) => user,
        Err(StoreError::Duplicate) => return Err(ApiError::Validation(vec![EMAIL_TAKEN.into()])),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "email": user.email })),
    ))
}

/// `POST|GET /api/auth/logout`: revoke the refresh token and clear cookies.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    if let Some(token) = cookies::refresh_token_from(&jar) {
        if let Err(e) = state.store.delete_refresh_token(&refresh::hash_token(&token)).await {
            tracing::error!(error = %e, "refresh token revocation failed");
        }
    }

    let jar = cookies::clear_auth_cookies(CookieJar::new(), state.cookie_secure);
    (jar, Json(json!({ "message": "Logged out successfully" })))
}

/// `POST /api/token/refresh`: re-issue access cookies from a refresh cookie.
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Result<(CookieJar, Json<Value>), ApiError> {
    let token = cookies::refresh_token_from(&jar).ok_or_else(|| ApiError::unauthorized(REFRESH_TOKEN_NOT_FOUND))?;

    let user_id = state
        .store
        .find_refresh_token(&refresh::hash_token(&token))
        .await?
        .ok_or_else(|| ApiError::unauthorized(REFRESH_TOKEN_NOT_FOUND))?;
    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(REFRESH_TOKEN_NOT_FOUND))?;

    let access = state.tokens.issue(&user)?;
    let jar = cookies::with_access_cookies(CookieJar::new(), &access, state.tokens.ttl(), state.cookie_secure)?;

    tracing::debug!(user_id = %user.id, "access token refreshed");
    Ok((jar, Json(json!({ "message": "Token refreshed successfully" }))))
}

/// `GET /api/user`: return the current user.
pub async fn me(auth: AuthUser) -> Json<UserRecord> {
    Json(auth.user)
}

async fn check_password(hash: String, candidate: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || password::verify_password(&hash, &candidate))
        .await
        .map_err(|e| ApiError::Internal(format!("verify task failed: {e}")))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
