//! Auth services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own credential, token, and persistence concerns so route
//! handlers stay focused on cookies and status codes.

pub mod password;
pub mod refresh;
pub mod store;
pub mod token;
pub mod validation;
