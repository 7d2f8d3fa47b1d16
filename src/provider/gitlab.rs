//! provider::gitlab
//!
//! GitLab adapter using the Repository Files and Commits APIs.
//!
//! # Design
//!
//! Projects are addressed by their URL-encoded full path (`owner/repo`), so
//! nested groups work without a project id lookup. A commit is a single
//! `POST /projects/{id}/repository/commits` carrying one action per file;
//! GitLab applies them atomically on top of the branch head.
//!
//! Self-hosted instances are supported through `instance_url`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::cache::FileCache;
use super::factory::ProviderType;
use super::traits::{FetchOptions, GitProvider, ProviderError, StudioFeature};
use super::types::{
    commit_message_with_trailer, file_name, join_root, pending_changes, CommitResult,
    ContentEncoding, DraftStatus, GitFile, GitOptions, RawFile, RepositoryInfo,
};

/// Default GitLab instance.
pub const DEFAULT_INSTANCE_URL: &str = "https://gitlab.com";

/// GitLab adapter.
pub struct GitLabProvider {
    /// HTTP client for making requests
    client: Client,
    /// Options this adapter was built from
    options: GitOptions,
    /// Web root of the instance
    instance_url: String,
    /// REST API root (`{instance}/api/v4` unless overridden)
    api_base: String,
    /// URL-encoded `owner/repo`
    project_id: String,
    /// Fetched files keyed by full path
    cache: FileCache,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitLabProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabProvider")
            .field("has_token", &self.options.token().is_some())
            .field("owner", &self.options.owner)
            .field("repo", &self.options.repo)
            .field("branch", &self.options.branch)
            .field("instance_url", &self.instance_url)
            .finish()
    }
}

impl GitLabProvider {
    /// Create a GitLab adapter.
    ///
    /// Uses `options.instance_url` when set, `https://gitlab.com` otherwise.
    ///
    /// # Errors
    ///
    /// `Configuration` if owner or repository is empty.
    pub fn new(options: GitOptions) -> Result<Self, ProviderError> {
        let api_base = format!("{}/api/v4", instance_root(&options));
        Self::with_api_base(options, api_base)
    }

    /// Create a GitLab adapter with an explicit API root.
    ///
    /// Web URLs still derive from `instance_url` (or gitlab.com).
    pub fn with_api_base(
        options: GitOptions,
        api_base: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        if options.owner.is_empty() || options.repo.is_empty() {
            return Err(ProviderError::Configuration(
                "GitLab provider requires owner and repo to be specified".into(),
            ));
        }

        let instance_url = instance_root(&options);
        let project_id =
            urlencoding::encode(&format!("{}/{}", options.owner, options.repo)).into_owned();

        debug!(
            project = %format!("{}/{}", options.owner, options.repo),
            instance = %instance_url,
            "initialized GitLab provider"
        );

        Ok(Self {
            client: Client::new(),
            options,
            instance_url,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            project_id,
            cache: FileCache::new(),
        })
    }

    /// Get the instance web root.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the file cache.
    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.options.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ProviderError::Configuration("access token contains invalid characters".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Build URL for a project endpoint.
    fn project_url(&self, path: &str) -> String {
        format!("{}/projects/{}/{}", self.api_base, self.project_id, path)
    }

    /// Web root of the project.
    fn web_repo_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.instance_url, self.options.owner, self.options.repo
        )
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
            });
        }

        let message = response
            .json::<GitLabErrorResponse>()
            .await
            .map(|body| body.text())
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(map_error(status, message))
    }

    /// Read a file through the Repository Files API.
    async fn request_file(&self, full_path: &str) -> Result<Option<GitFile>, ProviderError> {
        let url = self.project_url(&format!(
            "repository/files/{}",
            urlencoding::encode(full_path)
        ));

        debug!(path = full_path, "requesting file from GitLab");

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .query(&[("ref", self.options.branch.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            warn!(path = full_path, "file not found");
            return Ok(None);
        }

        let file: GitLabFile = self.handle_response(response).await?;
        let name = if file.file_name.is_empty() {
            file_name(full_path)
        } else {
            file.file_name
        };

        Ok(Some(GitFile {
            provider: ProviderType::GitLab,
            url: format!(
                "{}/-/blob/{}/{}",
                self.web_repo_url(),
                self.options.branch,
                file.file_path
            ),
            name,
            path: file.file_path,
            sha: file.blob_id,
            size: file.size,
            content: file.content,
            encoding: ContentEncoding::from_label(&file.encoding),
        }))
    }

    /// Create the commit and return its id.
    async fn push(&self, files: &[&RawFile], message: &str) -> Result<String, ProviderError> {
        let body = CreateCommitBody {
            branch: &self.options.branch,
            commit_message: message,
            author_name: &self.options.author_name,
            author_email: &self.options.author_email,
            actions: files
                .iter()
                .map(|f| build_action(f, &self.options.root_dir))
                .collect(),
        };

        let response = self
            .client
            .post(self.project_url("repository/commits"))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        match self.handle_response::<GitLabCommit>(response).await {
            Ok(commit) => Ok(commit.id),
            Err(ProviderError::NotFound(msg)) | Err(ProviderError::Api { message: msg, .. })
                if is_branch_error(status, &msg) =>
            {
                Err(ProviderError::BranchNotFound(self.options.branch.clone()))
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl GitProvider for GitLabProvider {
    fn name(&self) -> &'static str {
        ProviderType::GitLab.name()
    }

    async fn fetch_file(
        &self,
        path: &str,
        opts: FetchOptions,
    ) -> Result<Option<GitFile>, ProviderError> {
        let full_path = join_root(&self.options.root_dir, path);

        self.cache
            .get_or_fetch(&full_path, opts.cached, || self.request_file(&full_path))
            .await
            .inspect_err(|e| error!(path = %full_path, error = %e, "failed to fetch file"))
    }

    async fn commit_files(
        &self,
        files: &[RawFile],
        message: &str,
    ) -> Result<Option<CommitResult>, ProviderError> {
        if self.options.token().is_none() {
            warn!("no token available, aborting commit");
            return Err(ProviderError::AuthRequired);
        }

        let pending = pending_changes(files);
        if pending.is_empty() {
            debug!("nothing to commit");
            return Ok(None);
        }

        let message = commit_message_with_trailer(message);
        match self.push(&pending, &message).await {
            Ok(id) => {
                info!(commit = %id, files = pending.len(), "commit pushed to GitLab");
                Ok(Some(CommitResult {
                    success: true,
                    url: self.get_commit_url(&id),
                    commit_sha: id,
                }))
            }
            Err(e) => {
                error!(error = %e, "failed to commit files to GitLab");
                Err(e)
            }
        }
    }

    fn get_repository_url(&self) -> String {
        self.web_repo_url()
    }

    fn get_branch_url(&self) -> String {
        format!("{}/-/tree/{}", self.web_repo_url(), self.options.branch)
    }

    fn get_commit_url(&self, sha: &str) -> String {
        format!("{}/-/commit/{}", self.web_repo_url(), sha)
    }

    fn get_file_url(&self, _feature: StudioFeature, path: &str) -> String {
        format!(
            "{}/-/blob/{}/{}",
            self.web_repo_url(),
            self.options.branch,
            join_root(&self.options.root_dir, path)
        )
    }

    fn get_repository_info(&self) -> RepositoryInfo {
        RepositoryInfo {
            owner: self.options.owner.clone(),
            repo: self.options.repo.clone(),
            branch: self.options.branch.clone(),
            provider: Some(ProviderType::GitLab),
        }
    }
}

/// Instance web root from the options, without a trailing slash.
fn instance_root(options: &GitOptions) -> String {
    options
        .instance_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_INSTANCE_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Map one pending edit to a commit action.
fn build_action<'a>(file: &'a RawFile, root_dir: &str) -> CommitAction<'a> {
    let file_path = join_root(root_dir, &file.path);
    let encoding = match file.encoding {
        ContentEncoding::Base64 => "base64",
        ContentEncoding::Utf8 => "text",
    };

    match file.status {
        DraftStatus::Deleted => CommitAction {
            action: "delete",
            file_path,
            content: None,
            encoding: None,
        },
        DraftStatus::Created => CommitAction {
            action: "create",
            file_path,
            content: Some(&file.content),
            encoding: Some(encoding),
        },
        DraftStatus::Modified | DraftStatus::Pristine => CommitAction {
            action: "update",
            file_path,
            content: Some(&file.content),
            encoding: Some(encoding),
        },
    }
}

/// Whether a failed commit means the target branch is missing.
fn is_branch_error(status: StatusCode, message: &str) -> bool {
    matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND)
        && message.to_lowercase().contains("branch")
}

/// Map an error status and message to a `ProviderError`.
fn map_error(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED => ProviderError::AuthFailed(message),
        StatusCode::FORBIDDEN => ProviderError::AuthFailed(format!("Permission denied: {}", message)),
        StatusCode::NOT_FOUND => ProviderError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        _ => ProviderError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// GitLab error response format.
///
/// `message` is a string for most errors and an object for validation errors.
#[derive(Deserialize)]
struct GitLabErrorResponse {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl GitLabErrorResponse {
    fn text(self) -> String {
        match (self.message, self.error) {
            (Some(serde_json::Value::String(s)), _) => s,
            (Some(other), _) => other.to_string(),
            (None, Some(e)) => e,
            (None, None) => "Unknown error".to_string(),
        }
    }
}

/// Repository Files API response.
#[derive(Deserialize)]
struct GitLabFile {
    #[serde(default)]
    file_name: String,
    file_path: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    encoding: String,
    #[serde(default)]
    content: String,
    blob_id: String,
}

/// Commit creation response (subset).
#[derive(Deserialize)]
struct GitLabCommit {
    id: String,
}

/// Request body for the Commits API.
#[derive(Serialize)]
struct CreateCommitBody<'a> {
    branch: &'a str,
    commit_message: &'a str,
    author_name: &'a str,
    author_email: &'a str,
    actions: Vec<CommitAction<'a>>,
}

/// One file action within a commit.
#[derive(Debug, Serialize)]
struct CommitAction<'a> {
    action: &'static str,
    file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<&'static str>,
}

// --------------------------------------------------------------------------
// URL Parsing
// --------------------------------------------------------------------------

/// Parse a GitLab remote URL to extract owner and project.
///
/// Supports both SSH and HTTPS formats:
/// - `git@gitlab.com:owner/project.git`
/// - `https://gitlab.com/owner/project.git`
/// - `https://gitlab.com/group/subgroup/project`
///
/// # Example
///
/// ```
/// use studio_git::provider::gitlab::parse_gitlab_url;
///
/// let (owner, project) = parse_gitlab_url("git@gitlab.com:group/sub/project.git").unwrap();
/// assert_eq!(owner, "group/sub");
/// assert_eq!(project, "project");
/// ```
pub fn parse_gitlab_url(url: &str) -> Option<(String, String)> {
    let rest = url
        .strip_prefix("git@gitlab.com:")
        .or_else(|| url.strip_prefix("https://gitlab.com/"))
        .or_else(|| url.strip_prefix("http://gitlab.com/"))?;
    let rest = rest.strip_suffix(".git").unwrap_or(rest);

    // Last segment is the project, everything before is the (nested) group
    let (owner, project) = rest.rsplit_once('/')?;
    if owner.is_empty() || project.is_empty() {
        return None;
    }
    Some((owner.to_string(), project.to_string()))
}
