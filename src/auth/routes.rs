//! auth::routes
//!
//! Login routes that do not go through an OAuth dance.
//!
//! # Azure DevOps
//!
//! Azure DevOps sessions are backed by a PAT read from
//! `STUDIO_AZURE_DEVOPS_TOKEN`. The route stores a session user holding that
//! PAT and sends the browser back to where it came from, as recorded in the
//! `studio-redirect` cookie. Only same-origin relative paths are honored.

use tracing::{debug, warn};

use super::errors::AuthError;
use super::session::{SessionProvider, StudioUser};

/// Environment variable holding the Azure DevOps PAT.
pub const AZURE_DEVOPS_TOKEN_ENV: &str = "STUDIO_AZURE_DEVOPS_TOKEN";

/// Cookie recording where to send the user after login.
pub const REDIRECT_COOKIE: &str = "studio-redirect";

/// Result of a successful login route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Session user to store
    pub user: StudioUser,
    /// Relative path to redirect to
    pub redirect: String,
}

/// Run the Azure DevOps login route.
///
/// # Errors
///
/// `AuthError::MissingToken` if no PAT is available.
pub fn azure_devops_login(
    env_token: Option<&str>,
    redirect_cookie: Option<&str>,
) -> Result<LoginOutcome, AuthError> {
    let Some(token) = env_token.filter(|t| !t.is_empty()) else {
        warn!("{} is not set", AZURE_DEVOPS_TOKEN_ENV);
        return Err(AuthError::MissingToken(AZURE_DEVOPS_TOKEN_ENV.to_string()));
    };

    let user = StudioUser::new(
        "Azure DevOps User",
        "user@example.com",
        SessionProvider::AzureDevOps,
        token,
    );
    let redirect = safe_redirect(redirect_cookie);
    debug!(redirect = %redirect, "azure devops session created");

    Ok(LoginOutcome { user, redirect })
}

/// Run the Azure DevOps login route with the PAT from the environment.
pub fn azure_devops_login_from_env(
    redirect_cookie: Option<&str>,
) -> Result<LoginOutcome, AuthError> {
    let token = std::env::var(AZURE_DEVOPS_TOKEN_ENV).ok();
    azure_devops_login(token.as_deref(), redirect_cookie)
}

/// Resolve the post-login redirect from the raw cookie value.
///
/// The value is percent-decoded and accepted only if it is a relative path
/// (`/…` but not the protocol-relative `//…`). Anything else yields `/`.
pub fn safe_redirect(cookie: Option<&str>) -> String {
    let decoded = cookie
        .and_then(|raw| urlencoding::decode(raw).ok())
        .map(|value| value.into_owned())
        .unwrap_or_default();

    if decoded.starts_with('/') && !decoded.starts_with("//") {
        decoded
    } else {
        "/".to_string()
    }
}
