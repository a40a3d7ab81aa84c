//! Auth cookie construction and parsing.

use std::time::Duration;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::ApiError;
use crate::services::token::{join_token, split_token};

pub const ACCESS_HP_COOKIE: &str = "jwt_hp";
pub const ACCESS_S_COOKIE: &str = "jwt_s";
pub const REFRESH_COOKIE: &str = "refresh_token";

fn max_age(ttl: Duration) -> time::Duration {
    time::Duration::seconds(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
}

fn base_cookie(name: &'static str, value: String, http_only: bool, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Add the split access-token cookies to `jar`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if `token` is not a compact JWT.
pub fn with_access_cookies(jar: CookieJar, token: &str, ttl: Duration, secure: bool) -> Result<CookieJar, ApiError> {
    let (header_payload, signature) =
        split_token(token).ok_or_else(|| ApiError::Internal("issued token is not a compact JWT".into()))?;

    let mut hp = base_cookie(ACCESS_HP_COOKIE, header_payload, false, secure);
    hp.set_max_age(max_age(ttl));
    let mut sig = base_cookie(ACCESS_S_COOKIE, signature, true, secure);
    sig.set_max_age(max_age(ttl));

    Ok(jar.add(hp).add(sig))
}

#[must_use]
pub fn refresh_cookie(token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(REFRESH_COOKIE, token, true, secure);
    cookie.set_max_age(max_age(ttl));
    cookie
}

/// Zero-age removals for all three auth cookies.
#[must_use]
pub fn clear_auth_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    [(ACCESS_HP_COOKIE, false), (ACCESS_S_COOKIE, true), (REFRESH_COOKIE, true)]
        .into_iter()
        .fold(jar, |jar, (name, http_only)| {
            let mut cookie = base_cookie(name, String::new(), http_only, secure);
            cookie.set_max_age(time::Duration::ZERO);
            jar.add(cookie)
        })
}

/// Reassemble the access token from the split cookies, falling back to an
/// `Authorization: Bearer` header.
#[must_use]
pub fn access_token_from(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    let hp = jar.get(ACCESS_HP_COOKIE).map(Cookie::value).unwrap_or_default();
    let sig = jar.get(ACCESS_S_COOKIE).map(Cookie::value).unwrap_or_default();
    if !hp.is_empty() && !sig.is_empty() {
        return Some(join_token(hp, sig));
    }

    let bearer = headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if bearer.is_empty() { None } else { Some(bearer.to_owned()) }
}

#[must_use]
pub fn refresh_token_from(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE).map(Cookie::value).filter(|v| !v.is_empty()).map(str::to_owned)
}

#[cfg(test)]
#[path = "cookies_test.rs"]
mod tests;
