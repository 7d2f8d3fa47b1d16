//! provider::traits
//!
//! The `GitProvider` contract shared by every adapter.
//!
//! # Design
//!
//! The trait is async because reads and commits are network calls. Reads and
//! writes have exactly three outcomes each:
//!
//! - `Ok(Some(value))` - the file was found / the commit was pushed
//! - `Ok(None)` - the file does not exist / there was nothing to commit
//! - `Err(ProviderError)` - configuration, credential, vendor or network failure
//!
//! Adapters never panic and never retry. Failures are logged where they
//! happen and handed back to the caller unchanged.
//!
//! URL builders and [`GitProvider::get_repository_info`] are pure: they never
//! touch the network and cannot fail.
//!
//! # Example
//!
//! ```ignore
//! use studio_git::provider::{FetchOptions, GitProvider, RawFile, DraftStatus};
//!
//! async fn update_readme(api: &dyn GitProvider) -> Result<(), ProviderError> {
//!     let current = api.fetch_file("README.md", FetchOptions::cached()).await?;
//!     if current.is_some() {
//!         let edit = RawFile::text("README.md", "# Hello\n", DraftStatus::Modified);
//!         if let Some(commit) = api.commit_files(&[edit], "Update README").await? {
//!             println!("pushed {}", commit.url);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{CommitResult, GitFile, RawFile, RepositoryInfo};

/// Errors from provider operations.
///
/// A missing file is not an error: reads report it as `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The adapter cannot be constructed from the supplied options.
    #[error("invalid provider configuration: {0}")]
    Configuration(String),

    /// A write was attempted without an access token.
    #[error("authentication required")]
    AuthRequired,

    /// The vendor rejected the credential.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The configured branch does not exist on the remote.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// The vendor reported a missing resource outside a plain file read.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The vendor API returned an error.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The vendor answered with a body we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Options for [`GitProvider::fetch_file`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Consult (and fill) the adapter's in-memory file cache.
    pub cached: bool,
}

impl FetchOptions {
    /// Options for a cache-backed read.
    pub fn cached() -> Self {
        Self { cached: true }
    }
}

/// Which part of the site a file belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudioFeature {
    /// Content documents (markdown, yaml, json)
    #[default]
    Content,
    /// Media assets (images, video)
    Media,
}

impl std::fmt::Display for StudioFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudioFeature::Content => write!(f, "content"),
            StudioFeature::Media => write!(f, "media"),
        }
    }
}

/// The contract every git hosting adapter implements.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// caller in a session.
///
/// # Paths
///
/// Callers pass paths relative to the configured root directory. The
/// adapter prefixes them with `root_dir` before talking to the vendor.
#[async_trait]
pub trait GitProvider: Send + Sync {
    /// Provider tag (e.g., "github", "azure-devops", "local").
    fn name(&self) -> &'static str;

    /// Read a file at the configured branch.
    ///
    /// With `opts.cached`, a previously fetched copy is returned without a
    /// network call, and a fresh network result is stored for next time.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the vendor reports the file as missing.
    ///
    /// # Errors
    ///
    /// Any other vendor or network failure.
    async fn fetch_file(
        &self,
        path: &str,
        opts: FetchOptions,
    ) -> Result<Option<GitFile>, ProviderError>;

    /// Push pending edits as one atomic commit on the configured branch.
    ///
    /// `Pristine` entries are dropped first and the studio co-author trailer
    /// is appended to `message`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` without any network call when nothing is left to commit.
    ///
    /// # Errors
    ///
    /// - `AuthRequired` when no token is configured (no network call)
    /// - `BranchNotFound` when the branch is missing (nothing is pushed)
    /// - any vendor failure, including a lost compare-and-swap on the branch head
    async fn commit_files(
        &self,
        files: &[RawFile],
        message: &str,
    ) -> Result<Option<CommitResult>, ProviderError>;

    /// Web URL of the repository root.
    fn get_repository_url(&self) -> String;

    /// Web URL of the configured branch.
    fn get_branch_url(&self) -> String;

    /// Web URL of a single commit.
    fn get_commit_url(&self, sha: &str) -> String;

    /// Web URL of a single file on the configured branch.
    fn get_file_url(&self, feature: StudioFeature, path: &str) -> String;

    /// Owner, repository, branch and provider of this adapter.
    fn get_repository_info(&self) -> RepositoryInfo;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_options_default_is_uncached() {
        assert!(!FetchOptions::default().cached);
        assert!(FetchOptions::cached().cached);
    }

    #[test]
    fn studio_feature_display() {
        assert_eq!(StudioFeature::Content.to_string(), "content");
        assert_eq!(StudioFeature::Media.to_string(), "media");
    }

    #[test]
    fn studio_feature_serde_lowercase() {
        let json = serde_json::to_string(&StudioFeature::Media).unwrap();
        assert_eq!(json, "\"media\"");
    }

    #[test]
    fn provider_error_display() {
        assert_eq!(
            ProviderError::AuthRequired.to_string(),
            "authentication required"
        );
        assert_eq!(
            ProviderError::Configuration("missing project".into()).to_string(),
            "invalid provider configuration: missing project"
        );
        assert_eq!(
            ProviderError::BranchNotFound("main".into()).to_string(),
            "branch not found: main"
        );
        assert_eq!(
            ProviderError::Api {
                status: 409,
                message: "ref moved".into()
            }
            .to_string(),
            "API error: 409 - ref moved"
        );
        assert_eq!(
            ProviderError::Network("connection refused".into()).to_string(),
            "network error: connection refused"
        );
        assert_eq!(ProviderError::RateLimited.to_string(), "rate limited");
    }
}
