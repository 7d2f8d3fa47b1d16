//! auth::session
//!
//! The studio session user.

use serde::{Deserialize, Serialize};

use super::errors::AuthError;
use crate::provider::ProviderType;

/// Identity provider that created a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionProvider {
    /// GitHub OAuth
    #[serde(rename = "github")]
    GitHub,
    /// GitLab OAuth
    #[serde(rename = "gitlab")]
    GitLab,
    /// Azure DevOps PAT
    #[serde(rename = "azure-devops")]
    AzureDevOps,
    /// Google OAuth (identity only, no repository access)
    #[serde(rename = "google")]
    Google,
}

impl SessionProvider {
    /// Provider name as used in sessions.
    pub fn name(&self) -> &'static str {
        match self {
            SessionProvider::GitHub => "github",
            SessionProvider::GitLab => "gitlab",
            SessionProvider::AzureDevOps => "azure-devops",
            SessionProvider::Google => "google",
        }
    }

    /// The git hosting provider backed by this session, if any.
    pub fn git_provider(&self) -> Option<ProviderType> {
        match self {
            SessionProvider::GitHub => Some(ProviderType::GitHub),
            SessionProvider::GitLab => Some(ProviderType::GitLab),
            SessionProvider::AzureDevOps => Some(ProviderType::AzureDevOps),
            SessionProvider::Google => None,
        }
    }
}

impl From<ProviderType> for SessionProvider {
    fn from(provider: ProviderType) -> Self {
        match provider {
            ProviderType::GitHub => SessionProvider::GitHub,
            ProviderType::GitLab => SessionProvider::GitLab,
            ProviderType::AzureDevOps => SessionProvider::AzureDevOps,
        }
    }
}

impl std::fmt::Display for SessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An authenticated studio user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioUser {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Provider that created the session
    pub provider: SessionProvider,
    /// Token used for repository access
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Set on sessions created through the studio; drives preview activation
    #[serde(default)]
    pub content_user: bool,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for StudioUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("avatar", &self.avatar)
            .field("provider", &self.provider)
            .field("has_token", &self.access_token.is_some())
            .field("content_user", &self.content_user)
            .finish()
    }
}

impl StudioUser {
    /// A studio session user for `provider` holding `token`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        provider: SessionProvider,
        token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            avatar: None,
            provider,
            access_token: Some(token.into()),
            content_user: true,
        }
    }
}

/// Environment variable holding the command-line token for `provider`.
pub fn token_env_var(provider: ProviderType) -> &'static str {
    match provider {
        ProviderType::GitHub => "STUDIO_GITHUB_TOKEN",
        ProviderType::GitLab => "STUDIO_GITLAB_TOKEN",
        ProviderType::AzureDevOps => "STUDIO_AZURE_DEVOPS_TOKEN",
    }
}

/// Build a session user from an already-read token.
///
/// # Errors
///
/// `AuthError::MissingToken` if `token` is absent or empty.
pub fn session_from_token(
    provider: ProviderType,
    token: Option<String>,
) -> Result<StudioUser, AuthError> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::MissingToken(token_env_var(provider).to_string()))?;

    Ok(StudioUser::new(
        format!("{} User", provider.display_name()),
        "user@example.com",
        provider.into(),
        token,
    ))
}

/// Build a session user from the provider's token environment variable.
///
/// # Errors
///
/// `AuthError::MissingToken` if the variable is unset or empty.
pub fn session_from_env(provider: ProviderType) -> Result<StudioUser, AuthError> {
    session_from_token(provider, std::env::var(token_env_var(provider)).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod session_provider {
        use super::*;

        #[test]
        fn google_has_no_git_provider() {
            assert_eq!(SessionProvider::Google.git_provider(), None);
            assert_eq!(
                SessionProvider::AzureDevOps.git_provider(),
                Some(ProviderType::AzureDevOps)
            );
        }

        #[test]
        fn serde_names() {
            let json = serde_json::to_string(&SessionProvider::AzureDevOps).unwrap();
            assert_eq!(json, "\"azure-devops\"");
        }

        #[test]
        fn from_provider_type() {
            for provider in ProviderType::all() {
                assert_eq!(SessionProvider::from(*provider).name(), provider.name());
            }
        }
    }

    mod studio_user {
        use super::*;

        #[test]
        fn debug_redacts_token() {
            let user = StudioUser::new("Jane", "jane@example.com", SessionProvider::GitHub, "ghp_abc");
            let debug_output = format!("{:?}", user);
            assert!(!debug_output.contains("ghp_abc"));
            assert!(debug_output.contains("has_token: true"));
        }

        #[test]
        fn serializes_camel_case() {
            let user = StudioUser::new("Jane", "jane@example.com", SessionProvider::GitLab, "t");
            let json = serde_json::to_value(&user).unwrap();
            assert_eq!(json["contentUser"], true);
            assert_eq!(json["accessToken"], "t");
            assert!(json.get("avatar").is_none());
        }

        #[test]
        fn content_user_defaults_to_false() {
            let user: StudioUser = serde_json::from_str(
                r#"{"name": "Jane", "email": "j@example.com", "provider": "google"}"#,
            )
            .unwrap();
            assert!(!user.content_user);
            assert!(user.access_token.is_none());
        }
    }

    mod session_from_token {
        use super::*;

        #[test]
        fn builds_marked_user() {
            let user = session_from_token(ProviderType::GitLab, Some("glpat".into())).unwrap();
            assert_eq!(user.name, "GitLab User");
            assert_eq!(user.provider, SessionProvider::GitLab);
            assert_eq!(user.access_token.as_deref(), Some("glpat"));
            assert!(user.content_user);
        }

        #[test]
        fn missing_or_empty_token() {
            assert_eq!(
                session_from_token(ProviderType::GitHub, None),
                Err(AuthError::MissingToken("STUDIO_GITHUB_TOKEN".into()))
            );
            assert!(session_from_token(ProviderType::GitHub, Some(String::new())).is_err());
        }
    }
}
