//! Argon2id password hashing (PHC strings).

use std::sync::LazyLock;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::Rng;

pub(crate) const DUMMY_PASSWORD: &str = "no-account-matches-this-email";

/// Hash verified against when the login email has no account, so both
/// rejections cost one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| hash_password(DUMMY_PASSWORD).ok());

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hash `password` with a fresh random salt.
///
/// # Errors
///
/// Returns an error if the salt cannot be encoded or Argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hash(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(phc.to_string())
}

/// Check `password` against a stored PHC hash. Malformed hashes never verify.
#[must_use]
pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

/// PHC hash standing in for a missing account.
#[must_use]
pub fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH.as_deref()
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;
