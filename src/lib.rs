//! Client-side session continuity for the cookie-authenticated API.
//!
//! [`SessionManager`] owns the signed-in state and the token-refresh cycle.
//! [`ApiClient`] (from [`SessionManager::client`]) sends requests and, on a
//! 401, renews the access token and replays the request once.
//!
//! ```no_run
//! # async fn demo() -> Result<(), vsb_client::ApiError> {
//! use vsb_client::{ClientConfig, Credentials, SessionManager};
//!
//! let session = SessionManager::from_config(&ClientConfig::from_env()?)?;
//! if session.login(&Credentials::new("ada@example.com", "secret")).await? {
//!     let body = session.client().get("/widgets").await?.body;
//!     println!("{body}");
//! }
//! session.logout().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod interceptor;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod test_helpers;

pub use config::{ClientConfig, Endpoints};
pub use error::ApiError;
pub use interceptor::ApiClient;
pub use session::SessionManager;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use types::{Credentials, Registered, Registration, SessionSnapshot, User, ValidationErrors};
