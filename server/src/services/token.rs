//! HS256 access tokens and the split-cookie encoding.
//!
//! DESIGN
//! ======
//! An access token `header.payload.signature` travels as two cookies:
//! `jwt_hp` holds `header.payload` and stays readable by browser code (so a
//! frontend can decode claims), while `jwt_s` holds the signature and is
//! HttpOnly. Script on the page can read identity hints but can never
//! reassemble a usable token on its own.

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::store::UserRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Expired JWT Token")]
    Expired,
    #[error("Invalid JWT Token")]
    Invalid,
    #[error("token signing failed: {0}")]
    Sign(String),
}

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Parse `sub` back into a user id.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] if `sub` is not a UUID.
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Invalid)
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a fresh access token for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Sign`] if encoding fails.
    pub fn issue(&self, user: &UserRecord) -> Result<String, TokenError> {
        self.issue_at(user, time::OffsetDateTime::now_utc().unix_timestamp())
    }

    pub(crate) fn issue_at(&self, user: &UserRecord, now: i64) -> Result<String, TokenError> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            iat: now,
            exp: now.saturating_add(ttl),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| TokenError::Sign(e.to_string()))
    }

    /// Check signature and expiry.
    ///
    /// # Errors
    ///
    /// [`TokenError::Expired`] past `exp`, [`TokenError::Invalid`] otherwise.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

// =============================================================================
// SPLIT COOKIE ENCODING
// =============================================================================

/// Split a compact JWT into (`header.payload`, `signature`).
#[must_use]
pub fn split_token(token: &str) -> Option<(String, String)> {
    let (header_payload, signature) = token.rsplit_once('.')?;
    if header_payload.is_empty() || signature.is_empty() || !header_payload.contains('.') {
        return None;
    }
    Some((header_payload.to_owned(), signature.to_owned()))
}

#[must_use]
pub fn join_token(header_payload: &str, signature: &str) -> String {
    format!("{header_payload}.{signature}")
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
