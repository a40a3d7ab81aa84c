//! Registration input checks.

pub const EMAIL_BLANK: &str = "Email should not be blank.";
pub const EMAIL_INVALID: &str = "Email is not a valid email address.";
pub const EMAIL_TAKEN: &str = "Email already used";
pub const PASSWORD_BLANK: &str = "Password should not be blank.";

/// Trim and lower-case an email, rejecting anything without exactly one `@`
/// between non-empty parts.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || normalized.contains(char::is_whitespace) {
        return None;
    }
    Some(normalized)
}

/// Field messages for a registration attempt, in field order.
///
/// Uniqueness is checked later against the store.
#[must_use]
pub fn registration_errors(email: &str, password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if email.trim().is_empty() {
        errors.push(EMAIL_BLANK.to_owned());
    } else if normalize_email(email).is_none() {
        errors.push(EMAIL_INVALID.to_owned());
    }
    if password.is_empty() {
        errors.push(PASSWORD_BLANK.to_owned());
    }
    errors
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
