//! provider::factory
//!
//! Provider selection and creation.
//!
//! # Design
//!
//! The set of hosting providers is closed. Callers name one through
//! [`ProviderType`] and get a boxed [`GitProvider`] back from
//! [`create_provider`]; nothing outside this module imports a concrete
//! adapter to build it.
//!
//! # Provider Detection
//!
//! [`detect_remote`] maps a git remote URL to a provider and its
//! coordinates:
//! - `github.com` → GitHub
//! - `gitlab.com` → GitLab (nested groups stay in `owner`)
//! - `dev.azure.com/{org}/{project}/_git/{repo}` → Azure DevOps
//!
//! # Example
//!
//! ```ignore
//! use studio_git::provider::{create_provider, GitOptions, ProviderType};
//!
//! let options = GitOptions {
//!     provider: Some(ProviderType::GitHub),
//!     owner: "acme".into(),
//!     repo: "docs".into(),
//!     branch: "main".into(),
//!     ..Default::default()
//! };
//! let api = create_provider(options)?;
//! println!("{}", api.get_repository_url());
//! ```

use serde::{Deserialize, Serialize};

use super::azure_devops::{parse_azure_devops_url, AzureDevOpsProvider};
use super::github::{parse_github_url, GitHubProvider};
use super::gitlab::{parse_gitlab_url, GitLabProvider};
use super::null::NullProvider;
use super::traits::{GitProvider, ProviderError};
use super::types::GitOptions;

/// Supported hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    /// GitHub
    #[serde(rename = "github")]
    GitHub,
    /// GitLab (gitlab.com or self-hosted)
    #[serde(rename = "gitlab")]
    GitLab,
    /// Azure DevOps Services
    #[serde(rename = "azure-devops")]
    AzureDevOps,
}

impl ProviderType {
    /// Get all providers.
    ///
    /// # Example
    ///
    /// ```
    /// use studio_git::provider::ProviderType;
    ///
    /// assert_eq!(ProviderType::all().len(), 3);
    /// ```
    pub fn all() -> &'static [ProviderType] {
        &[
            ProviderType::GitHub,
            ProviderType::GitLab,
            ProviderType::AzureDevOps,
        ]
    }

    /// Get the provider name as a string.
    ///
    /// This matches the name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderType::GitHub => "github",
            ProviderType::GitLab => "gitlab",
            ProviderType::AzureDevOps => "azure-devops",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderType::GitHub => "GitHub",
            ProviderType::GitLab => "GitLab",
            ProviderType::AzureDevOps => "Azure DevOps",
        }
    }

    /// Icon identifier for UI surfaces.
    pub fn icon(&self) -> &'static str {
        match self {
            ProviderType::GitHub => "i-simple-icons:github",
            ProviderType::GitLab => "i-simple-icons:gitlab",
            ProviderType::AzureDevOps => "i-simple-icons:azuredevops",
        }
    }

    /// Parse a provider from a string, ignoring case.
    ///
    /// # Example
    ///
    /// ```
    /// use studio_git::provider::ProviderType;
    ///
    /// assert_eq!(ProviderType::parse("Azure-DevOps"), Some(ProviderType::AzureDevOps));
    /// assert_eq!(ProviderType::parse("bitbucket"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(ProviderType::GitHub),
            "gitlab" => Some(ProviderType::GitLab),
            "azure-devops" => Some(ProviderType::AzureDevOps),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Repository coordinates detected from a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    /// Detected provider
    pub provider: ProviderType,
    /// Owner, group path or organization
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Azure DevOps organization
    pub organization: Option<String>,
    /// Azure DevOps project
    pub project: Option<String>,
}

/// Detect the provider and repository coordinates from a remote URL.
///
/// # Example
///
/// ```
/// use studio_git::provider::{detect_remote, ProviderType};
///
/// let remote = detect_remote("git@github.com:acme/docs.git").unwrap();
/// assert_eq!(remote.provider, ProviderType::GitHub);
/// assert_eq!(remote.repo, "docs");
/// ```
pub fn detect_remote(remote_url: &str) -> Option<RemoteRepo> {
    if let Some((owner, repo)) = parse_github_url(remote_url) {
        return Some(RemoteRepo {
            provider: ProviderType::GitHub,
            owner,
            repo,
            organization: None,
            project: None,
        });
    }

    if let Some((owner, repo)) = parse_gitlab_url(remote_url) {
        return Some(RemoteRepo {
            provider: ProviderType::GitLab,
            owner,
            repo,
            organization: None,
            project: None,
        });
    }

    parse_azure_devops_url(remote_url).map(|remote| RemoteRepo {
        provider: ProviderType::AzureDevOps,
        owner: remote.organization.clone(),
        repo: remote.repo,
        organization: Some(remote.organization),
        project: Some(remote.project),
    })
}

/// Create the adapter for `options.provider`.
///
/// A missing provider yields the local [`NullProvider`].
///
/// # Errors
///
/// `ProviderError::Configuration` when the options are incomplete for the
/// chosen provider.
pub fn create_provider(options: GitOptions) -> Result<Box<dyn GitProvider>, ProviderError> {
    match options.provider {
        None => Ok(Box::new(NullProvider::new(&options))),
        Some(ProviderType::GitHub) => Ok(Box::new(GitHubProvider::new(options)?)),
        Some(ProviderType::GitLab) => Ok(Box::new(GitLabProvider::new(options)?)),
        Some(ProviderType::AzureDevOps) => Ok(Box::new(AzureDevOpsProvider::new(options)?)),
    }
}

/// Get list of valid provider names for configuration validation.
pub fn valid_provider_names() -> Vec<&'static str> {
    ProviderType::all().iter().map(|p| p.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod provider_type {
        use super::*;

        #[test]
        fn parse_is_case_insensitive() {
            assert_eq!(ProviderType::parse("github"), Some(ProviderType::GitHub));
            assert_eq!(ProviderType::parse("GitLab"), Some(ProviderType::GitLab));
            assert_eq!(
                ProviderType::parse("AZURE-DEVOPS"),
                Some(ProviderType::AzureDevOps)
            );
        }

        #[test]
        fn parse_unknown() {
            assert_eq!(ProviderType::parse("bitbucket"), None);
            assert_eq!(ProviderType::parse(""), None);
        }

        #[test]
        fn names_round_trip_through_parse() {
            for provider in ProviderType::all() {
                assert_eq!(ProviderType::parse(provider.name()), Some(*provider));
            }
        }

        #[test]
        fn serde_uses_config_names() {
            assert_eq!(
                serde_json::to_string(&ProviderType::AzureDevOps).unwrap(),
                "\"azure-devops\""
            );
            let parsed: ProviderType = serde_json::from_str("\"gitlab\"").unwrap();
            assert_eq!(parsed, ProviderType::GitLab);
        }

        #[test]
        fn display_and_icon() {
            assert_eq!(ProviderType::AzureDevOps.to_string(), "azure-devops");
            assert_eq!(ProviderType::AzureDevOps.display_name(), "Azure DevOps");
            assert_eq!(
                ProviderType::AzureDevOps.icon(),
                "i-simple-icons:azuredevops"
            );
        }
    }

    mod detect_remote {
        use super::*;

        #[test]
        fn github_ssh() {
            let remote = detect_remote("git@github.com:acme/docs.git").unwrap();
            assert_eq!(remote.provider, ProviderType::GitHub);
            assert_eq!(remote.owner, "acme");
        }

        #[test]
        fn gitlab_nested_group() {
            let remote = detect_remote("https://gitlab.com/acme/web/docs.git").unwrap();
            assert_eq!(remote.provider, ProviderType::GitLab);
            assert_eq!(remote.owner, "acme/web");
            assert_eq!(remote.repo, "docs");
        }

        #[test]
        fn azure_devops_fills_org_and_project() {
            let remote = detect_remote("https://dev.azure.com/acme/site/_git/docs").unwrap();
            assert_eq!(remote.provider, ProviderType::AzureDevOps);
            assert_eq!(remote.organization.as_deref(), Some("acme"));
            assert_eq!(remote.project.as_deref(), Some("site"));
        }

        #[test]
        fn unknown_url() {
            assert_eq!(detect_remote("git@unknown.com:owner/repo.git"), None);
        }
    }

    mod create_provider {
        use super::*;

        #[test]
        fn no_provider_is_local() {
            let api = create_provider(GitOptions::default()).unwrap();
            assert_eq!(api.name(), "local");
        }

        #[test]
        fn each_provider_by_type() {
            let base = GitOptions {
                owner: "acme".into(),
                organization: Some("acme".into()),
                project: Some("site".into()),
                repo: "docs".into(),
                branch: "main".into(),
                ..Default::default()
            };
            for provider in ProviderType::all() {
                let api = create_provider(GitOptions {
                    provider: Some(*provider),
                    ..base.clone()
                })
                .unwrap();
                assert_eq!(api.name(), provider.name());
            }
        }

        #[test]
        fn incomplete_options_fail() {
            let result = create_provider(GitOptions {
                provider: Some(ProviderType::AzureDevOps),
                organization: Some("acme".into()),
                repo: "docs".into(),
                ..Default::default()
            });
            assert!(matches!(result, Err(ProviderError::Configuration(_))));
        }
    }

    #[test]
    fn valid_names() {
        assert_eq!(
            valid_provider_names(),
            vec!["github", "gitlab", "azure-devops"]
        );
    }
}
