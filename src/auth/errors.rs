//! auth::errors
//!
//! Authentication error types.
//!
//! # Example
//!
//! ```
//! use studio_git::auth::AuthError;
//!
//! let err = AuthError::MissingToken("STUDIO_GITHUB_TOKEN".to_string());
//! assert!(err.to_string().contains("STUDIO_GITHUB_TOKEN"));
//! ```

use thiserror::Error;

/// Errors from building a session.
///
/// Messages name the variable or provider involved, never a token value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The environment variable holding the token is unset or empty.
    #[error("{0} is not set")]
    MissingToken(String),
}
