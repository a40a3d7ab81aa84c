//! Client error type.
//!
//! `ApiError` is `Clone` because a single refresh outcome is handed to every
//! caller waiting on the shared in-flight refresh.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

/// Errors produced by the session manager, interceptor and transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout, IO).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{path} returned status {status}")]
    Status { status: u16, path: String, body: String },

    /// Registration was rejected with a list of field messages.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The client could not be configured or built.
    #[error("client config error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
