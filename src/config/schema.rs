//! config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: the provider must be a known name,
//! the branch must not be empty, and a repository must be identified
//! (directly or through `remote`) whenever a provider is set.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::auth::StudioUser;
use crate::provider::{detect_remote, valid_provider_names, GitOptions, ProviderType};

/// Branch used when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Studio configuration.
///
/// # Example
///
/// ```toml
/// dev = false
///
/// [git]
/// provider = "azure-devops"
/// organization = "acme"
/// project = "site"
/// repo = "docs"
/// branch = "main"
/// root_dir = "content"
///
/// [author]
/// name = "Studio Bot"
/// email = "bot@example.com"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Dev mode: always use the local provider
    pub dev: bool,

    /// Repository settings
    pub git: GitConfig,

    /// Commit author override
    pub author: Option<AuthorConfig>,
}

/// Repository settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Provider name (`github`, `gitlab`, `azure-devops`)
    pub provider: Option<String>,
    /// Repository owner or group path
    pub owner: Option<String>,
    /// Azure DevOps organization
    pub organization: Option<String>,
    /// Azure DevOps project
    pub project: Option<String>,
    /// Repository name
    pub repo: Option<String>,
    /// Branch (default: "main")
    pub branch: Option<String>,
    /// Directory prefix for content
    pub root_dir: Option<String>,
    /// Self-hosted GitLab URL
    pub instance_url: Option<String>,
    /// Git remote URL used to fill in provider and coordinates
    pub remote: Option<String>,
}

/// Commit author override.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorConfig {
    /// Author name
    pub name: Option<String>,
    /// Author email
    pub email: Option<String>,
}

impl StudioConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.git.resolve().map(|_| ())
    }

    /// Build adapter options from this configuration and a session.
    ///
    /// The token always comes from the session. Author identity comes from
    /// `[author]` when set, falling back to the session user.
    pub fn git_options(&self, session: Option<&StudioUser>) -> Result<GitOptions, ConfigError> {
        let mut options = self.git.resolve()?;
        let author = self.author.clone().unwrap_or_default();

        options.token = session.and_then(|user| user.access_token.clone());
        options.author_name = author
            .name
            .or_else(|| session.map(|user| user.name.clone()))
            .unwrap_or_default();
        options.author_email = author
            .email
            .or_else(|| session.map(|user| user.email.clone()))
            .unwrap_or_default();

        Ok(options)
    }

    /// The configured provider type, if any.
    pub fn provider(&self) -> Result<Option<ProviderType>, ConfigError> {
        Ok(self.git.resolve()?.provider)
    }
}

impl GitConfig {
    /// Resolve into adapter options without credentials or author.
    fn resolve(&self) -> Result<GitOptions, ConfigError> {
        let detected = match &self.remote {
            Some(url) => Some(detect_remote(url).ok_or_else(|| {
                ConfigError::InvalidValue(format!("unrecognized git remote '{}'", url))
            })?),
            None => None,
        };

        let provider = match &self.provider {
            Some(name) => Some(ProviderType::parse(name).ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "invalid provider '{}', must be one of: {}",
                    name,
                    valid_provider_names().join(", ")
                ))
            })?),
            None => detected.as_ref().map(|remote| remote.provider),
        };

        let branch = self.branch.as_deref().unwrap_or(DEFAULT_BRANCH);
        if branch.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "branch cannot be empty".to_string(),
            ));
        }

        let owner = self
            .owner
            .clone()
            .or_else(|| detected.as_ref().map(|remote| remote.owner.clone()))
            .unwrap_or_default();
        let repo = self
            .repo
            .clone()
            .or_else(|| detected.as_ref().map(|remote| remote.repo.clone()))
            .unwrap_or_default();
        if provider.is_some() && repo.is_empty() {
            return Err(ConfigError::InvalidValue(
                "repo is required when a provider is set".to_string(),
            ));
        }

        Ok(GitOptions {
            provider,
            owner,
            organization: self
                .organization
                .clone()
                .or_else(|| detected.as_ref().and_then(|remote| remote.organization.clone())),
            project: self
                .project
                .clone()
                .or_else(|| detected.as_ref().and_then(|remote| remote.project.clone())),
            repo,
            token: None,
            branch: branch.to_string(),
            root_dir: self.root_dir.clone().unwrap_or_default(),
            author_name: String::new(),
            author_email: String::new(),
            instance_url: self.instance_url.clone(),
        })
    }
}
