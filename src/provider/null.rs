//! provider::null
//!
//! Local provider used in dev mode or when no hosting provider is configured.
//!
//! Every read misses, every commit is a no-op and every URL is empty. It
//! never touches the network.

use async_trait::async_trait;

use super::traits::{FetchOptions, GitProvider, ProviderError, StudioFeature};
use super::types::{CommitResult, GitFile, GitOptions, RawFile, RepositoryInfo};

/// Name reported by the local provider.
pub const LOCAL_PROVIDER_NAME: &str = "local";

/// No-op provider.
#[derive(Debug, Clone, Default)]
pub struct NullProvider {
    owner: String,
    repo: String,
    branch: String,
}

impl NullProvider {
    /// Create a local provider that still reports the configured coordinates.
    pub fn new(options: &GitOptions) -> Self {
        Self {
            owner: options.owner.clone(),
            repo: options.repo.clone(),
            branch: options.branch.clone(),
        }
    }
}

#[async_trait]
impl GitProvider for NullProvider {
    fn name(&self) -> &'static str {
        LOCAL_PROVIDER_NAME
    }

    async fn fetch_file(
        &self,
        _path: &str,
        _opts: FetchOptions,
    ) -> Result<Option<GitFile>, ProviderError> {
        Ok(None)
    }

    async fn commit_files(
        &self,
        _files: &[RawFile],
        _message: &str,
    ) -> Result<Option<CommitResult>, ProviderError> {
        Ok(None)
    }

    fn get_repository_url(&self) -> String {
        String::new()
    }

    fn get_branch_url(&self) -> String {
        String::new()
    }

    fn get_commit_url(&self, _sha: &str) -> String {
        String::new()
    }

    fn get_file_url(&self, _feature: StudioFeature, _path: &str) -> String {
        String::new()
    }

    fn get_repository_info(&self) -> RepositoryInfo {
        RepositoryInfo {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            provider: None,
        }
    }
}
