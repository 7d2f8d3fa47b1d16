//! auth
//!
//! Session users and the credential sources that feed provider options.
//!
//! # Architecture
//!
//! Adapters never authenticate on their own. A session produces a
//! [`StudioUser`] carrying the access token; configuration turns that into
//! `GitOptions`. This module owns:
//!
//! - [`StudioUser`] and [`SessionProvider`]: the session identity
//! - [`azure_devops_login`]: the PAT-backed Azure DevOps login route
//! - [`session_from_env`]: token lookup for the command line
//!
//! # Security
//!
//! Tokens never appear in logs, error messages or `Debug` output.

mod errors;
mod routes;
mod session;

pub use errors::AuthError;
pub use routes::{
    azure_devops_login, azure_devops_login_from_env, safe_redirect, LoginOutcome,
    AZURE_DEVOPS_TOKEN_ENV, REDIRECT_COOKIE,
};
pub use session::{
    session_from_env, session_from_token, token_env_var, SessionProvider, StudioUser,
};
