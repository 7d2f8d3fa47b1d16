//! provider::github
//!
//! GitHub adapter using the Contents and Git Data REST APIs.
//!
//! # Design
//!
//! Reads go through the Contents API. Writes use the Git Data API so that
//! any number of files lands in a single commit:
//!
//! 1. `GET git/ref/heads/{branch}` for the head commit
//! 2. `GET git/commits/{head}` for its tree
//! 3. `POST git/blobs` for each base64 (binary) file
//! 4. `POST git/trees` on top of the base tree
//! 5. `POST git/commits` with the head as parent
//! 6. `PATCH git/refs/heads/{branch}` without `force`
//!
//! The final ref update is a fast-forward-only compare-and-swap: if the
//! branch moved since step 1, GitHub answers 422 and nothing is updated.
//!
//! # Rate Limiting
//!
//! Returns `ProviderError::RateLimited` when limits are hit. There is no
//! automatic retry.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::cache::FileCache;
use super::factory::ProviderType;
use super::traits::{FetchOptions, GitProvider, ProviderError, StudioFeature};
use super::types::{
    author_timestamp, commit_message_with_trailer, file_name, join_root, pending_changes,
    CommitResult, ContentEncoding, DraftStatus, GitFile, GitOptions, RawFile, RepositoryInfo,
};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub web UI host.
const WEB_BASE: &str = "https://github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "studio-git";

/// GitHub adapter.
pub struct GitHubProvider {
    /// HTTP client for making requests
    client: Client,
    /// Options this adapter was built from
    options: GitOptions,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
    /// Fetched files keyed by full path
    cache: FileCache,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubProvider")
            .field("has_token", &self.options.token().is_some())
            .field("owner", &self.options.owner)
            .field("repo", &self.options.repo)
            .field("branch", &self.options.branch)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubProvider {
    /// Create a GitHub adapter against `api.github.com`.
    ///
    /// # Errors
    ///
    /// `Configuration` if owner or repository is empty.
    pub fn new(options: GitOptions) -> Result<Self, ProviderError> {
        Self::with_api_base(options, DEFAULT_API_BASE)
    }

    /// Create a GitHub adapter with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (e.g., `https://github.example.com/api/v3`).
    pub fn with_api_base(
        options: GitOptions,
        api_base: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        if options.owner.is_empty() || options.repo.is_empty() {
            return Err(ProviderError::Configuration(
                "GitHub provider requires owner and repo to be specified".into(),
            ));
        }

        let api_base = api_base.into().trim_end_matches('/').to_string();
        debug!(
            owner = %options.owner,
            repo = %options.repo,
            branch = %options.branch,
            "initialized GitHub provider"
        );

        Ok(Self {
            client: Client::new(),
            options,
            api_base,
            cache: FileCache::new(),
        })
    }

    /// Get the repository owner.
    pub fn owner(&self) -> &str {
        &self.options.owner
    }

    /// Get the repository name.
    pub fn repo(&self) -> &str {
        &self.options.repo
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
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.options.owner, self.options.repo, path
        )
    }

    /// Web root of the repository.
    fn web_repo_url(&self) -> String {
        format!("{}/{}/{}", WEB_BASE, self.options.owner, self.options.repo)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ProviderError> {
        // Extract permission headers before consuming response body.
        let required_permissions = response
            .headers()
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                ProviderError::AuthFailed("Invalid or expired token".into())
            }
            StatusCode::FORBIDDEN if message.to_lowercase().contains("rate limit") => {
                ProviderError::RateLimited
            }
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);
                if let Some(perms) = required_permissions.filter(|p| !p.is_empty()) {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                }
                ProviderError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => ProviderError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
            _ if status.is_server_error() => ProviderError::Api {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ProviderError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Read a file through the Contents API.
    async fn request_contents(&self, full_path: &str) -> Result<Option<GitFile>, ProviderError> {
        let url = self.repo_url(&format!("contents/{}", encode_path(full_path)));

        debug!(path = full_path, "requesting file from GitHub");

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

        let contents: GitHubContents = self.handle_response(response).await?;
        let encoding = contents
            .encoding
            .as_deref()
            .map(ContentEncoding::from_label)
            .unwrap_or_default();
        let content = match encoding {
            // GitHub wraps base64 at 60 columns
            ContentEncoding::Base64 => contents.content.unwrap_or_default().replace('\n', ""),
            ContentEncoding::Utf8 => contents.content.unwrap_or_default(),
        };

        Ok(Some(GitFile {
            provider: ProviderType::GitHub,
            name: if contents.name.is_empty() {
                file_name(full_path)
            } else {
                contents.name
            },
            path: full_path.to_string(),
            sha: contents.sha,
            size: contents.size,
            url: contents.html_url.unwrap_or_default(),
            content,
            encoding,
        }))
    }

    /// Resolve the branch head and its tree.
    async fn resolve_head(&self) -> Result<(String, String), ProviderError> {
        let url = self.repo_url(&format!("git/ref/heads/{}", self.options.branch));

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let git_ref: GitHubRef = match self.handle_response(response).await {
            Err(ProviderError::NotFound(_)) => {
                return Err(ProviderError::BranchNotFound(self.options.branch.clone()))
            }
            other => other?,
        };
        let head = git_ref.object.sha;

        let url = self.repo_url(&format!("git/commits/{}", head));
        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let commit: GitHubCommit = self.handle_response(response).await?;

        Ok((head, commit.tree.sha))
    }

    /// Upload a base64 file as a blob and return its sha.
    async fn create_blob(&self, content: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.repo_url("git/blobs"))
            .headers(self.headers()?)
            .json(&CreateBlobBody {
                content,
                encoding: "base64",
            })
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let blob: GitHubSha = self.handle_response(response).await?;
        Ok(blob.sha)
    }

    /// Build the tree entries for the pending files.
    async fn tree_entries(&self, files: &[&RawFile]) -> Result<Vec<serde_json::Value>, ProviderError> {
        let mut entries = Vec::with_capacity(files.len());
        for file in files {
            let path = join_root(&self.options.root_dir, &file.path);
            let entry = match (file.status, file.encoding) {
                (DraftStatus::Deleted, _) => serde_json::json!({
                    "path": path,
                    "mode": "100644",
                    "type": "blob",
                    "sha": serde_json::Value::Null,
                }),
                (_, ContentEncoding::Base64) => {
                    let sha = self.create_blob(&file.content).await?;
                    serde_json::json!({
                        "path": path,
                        "mode": "100644",
                        "type": "blob",
                        "sha": sha,
                    })
                }
                (_, ContentEncoding::Utf8) => serde_json::json!({
                    "path": path,
                    "mode": "100644",
                    "type": "blob",
                    "content": file.content,
                }),
            };
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Run the full Git Data API sequence and return the new commit sha.
    async fn push(&self, files: &[&RawFile], message: &str) -> Result<String, ProviderError> {
        let (head, base_tree) = self.resolve_head().await?;
        debug!(head = %head, "branch head resolved");

        let tree = self.tree_entries(files).await?;
        let response = self
            .client
            .post(self.repo_url("git/trees"))
            .headers(self.headers()?)
            .json(&serde_json::json!({ "base_tree": base_tree, "tree": tree }))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let new_tree: GitHubSha = self.handle_response(response).await?;

        let body = CreateCommitBody {
            message,
            tree: &new_tree.sha,
            parents: [head.as_str()],
            author: CommitAuthor {
                name: &self.options.author_name,
                email: &self.options.author_email,
                date: author_timestamp(),
            },
        };
        let response = self
            .client
            .post(self.repo_url("git/commits"))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let commit: GitHubSha = self.handle_response(response).await?;

        let response = self
            .client
            .patch(self.repo_url(&format!("git/refs/heads/{}", self.options.branch)))
            .headers(self.headers()?)
            .json(&UpdateRefBody {
                sha: &commit.sha,
                force: false,
            })
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let _: serde_json::Value = self.handle_response(response).await?;

        Ok(commit.sha)
    }
}

#[async_trait]
impl GitProvider for GitHubProvider {
    fn name(&self) -> &'static str {
        ProviderType::GitHub.name()
    }

    async fn fetch_file(
        &self,
        path: &str,
        opts: FetchOptions,
    ) -> Result<Option<GitFile>, ProviderError> {
        let full_path = join_root(&self.options.root_dir, path);

        self.cache
            .get_or_fetch(&full_path, opts.cached, || self.request_contents(&full_path))
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
            Ok(sha) => {
                info!(commit = %sha, files = pending.len(), "commit pushed to GitHub");
                Ok(Some(CommitResult {
                    success: true,
                    url: self.get_commit_url(&sha),
                    commit_sha: sha,
                }))
            }
            Err(e) => {
                error!(error = %e, "failed to commit files to GitHub");
                Err(e)
            }
        }
    }

    fn get_repository_url(&self) -> String {
        self.web_repo_url()
    }

    fn get_branch_url(&self) -> String {
        format!("{}/tree/{}", self.web_repo_url(), self.options.branch)
    }

    fn get_commit_url(&self, sha: &str) -> String {
        format!("{}/commit/{}", self.web_repo_url(), sha)
    }

    fn get_file_url(&self, _feature: StudioFeature, path: &str) -> String {
        format!(
            "{}/blob/{}/{}",
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
            provider: Some(ProviderType::GitHub),
        }
    }
}

/// Percent-encode each path segment, keeping the separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Contents API response for a single file.
#[derive(Deserialize)]
struct GitHubContents {
    #[serde(default)]
    name: String,
    sha: String,
    #[serde(default)]
    size: u64,
    html_url: Option<String>,
    content: Option<String>,
    encoding: Option<String>,
}

/// Ref response.
#[derive(Deserialize)]
struct GitHubRef {
    object: GitHubSha,
}

/// Commit response (subset).
#[derive(Deserialize)]
struct GitHubCommit {
    tree: GitHubSha,
}

/// Any response carrying a `sha`.
#[derive(Deserialize)]
struct GitHubSha {
    sha: String,
}

/// Request body for creating a blob.
#[derive(Serialize)]
struct CreateBlobBody<'a> {
    content: &'a str,
    encoding: &'a str,
}

/// Request body for creating a commit.
#[derive(Serialize)]
struct CreateCommitBody<'a> {
    message: &'a str,
    tree: &'a str,
    parents: [&'a str; 1],
    author: CommitAuthor<'a>,
}

/// Commit author.
#[derive(Serialize)]
struct CommitAuthor<'a> {
    name: &'a str,
    email: &'a str,
    date: String,
}

/// Request body for moving a branch.
#[derive(Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a str,
    force: bool,
}

// --------------------------------------------------------------------------
// URL Parsing
// --------------------------------------------------------------------------

/// Parse a GitHub remote URL to extract owner and repo.
///
/// Supports both SSH and HTTPS formats:
/// - `git@github.com:owner/repo.git`
/// - `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo`
///
/// # Example
///
/// ```
/// use studio_git::provider::github::parse_github_url;
///
/// let (owner, repo) = parse_github_url("git@github.com:octocat/hello-world.git").unwrap();
/// assert_eq!(owner, "octocat");
/// assert_eq!(repo, "hello-world");
/// ```
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let rest = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("https://github.com/"))
        .or_else(|| url.strip_prefix("http://github.com/"))?;
    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    let parts: Vec<&str> = rest.splitn(2, '/').collect();
    if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        Some((parts[0].to_string(), parts[1].to_string()))
    } else {
        None
    }
}
