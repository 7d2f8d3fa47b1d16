//! provider::azure_devops
//!
//! Azure DevOps adapter using the Git Items, Refs and Pushes APIs.
//!
//! # Authentication
//!
//! Azure DevOps PATs use HTTP Basic auth with an empty username and the PAT
//! as the password: `Basic base64(":" + pat)`. Tokens issued by the studio
//! login route carry an `az_pat_` marker which Azure does not recognize, so
//! it is stripped before use.
//!
//! # Commits
//!
//! A commit is two calls:
//!
//! 1. Resolve the branch head via `refs?filter=heads/{branch}`.
//! 2. `POST pushes` with one ref update (old object id = resolved head) and
//!    one commit carrying every change.
//!
//! The push is a compare-and-swap on the branch head. If another client
//! moved the head in between, Azure rejects the whole push and the error is
//! returned as-is. There is no merge and no retry.
//!
//! # Example
//!
//! ```ignore
//! use studio_git::provider::azure_devops::AzureDevOpsProvider;
//! use studio_git::provider::{GitOptions, GitProvider, RawFile, DraftStatus};
//!
//! let provider = AzureDevOpsProvider::new(GitOptions {
//!     organization: Some("acme".into()),
//!     project: Some("site".into()),
//!     repo: "docs".into(),
//!     branch: "main".into(),
//!     root_dir: "content".into(),
//!     token: Some("az_pat_XYZ".into()),
//!     ..Default::default()
//! })?;
//!
//! let edit = RawFile::text("a.md", "hi", DraftStatus::Modified);
//! let commit = provider.commit_files(&[edit], "update a").await?;
//! ```

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
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

/// Default Azure DevOps host, used for both the API and the web UI.
pub const DEFAULT_API_ROOT: &str = "https://dev.azure.com";

/// Web UI host for browsing URLs.
const WEB_ROOT: &str = "https://dev.azure.com";

/// REST API version sent with every call.
const API_VERSION: &str = "7.1";

/// Marker prefix on tokens issued by the studio login route.
pub const TOOL_TOKEN_PREFIX: &str = "az_pat_";

/// Vendor error key for a missing item.
const ITEM_NOT_FOUND_TYPE_KEY: &str = "GitItemNotFoundException";

/// Azure DevOps adapter.
pub struct AzureDevOpsProvider {
    /// HTTP client for making requests
    client: Client,
    /// Options this adapter was built from
    options: GitOptions,
    /// Organization (validated non-empty)
    organization: String,
    /// Project (validated non-empty)
    project: String,
    /// Precomputed `Basic …` header value
    auth_header: Option<String>,
    /// `{root}/{organization}/{project}/_apis`
    api_base: String,
    /// Fetched files keyed by full path
    cache: FileCache,
}

// Custom Debug to avoid exposing the auth header
impl std::fmt::Debug for AzureDevOpsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsProvider")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("repo", &self.options.repo)
            .field("branch", &self.options.branch)
            .field("root_dir", &self.options.root_dir)
            .field("has_token", &self.auth_header.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl AzureDevOpsProvider {
    /// Create an adapter against `https://dev.azure.com`.
    ///
    /// # Errors
    ///
    /// `Configuration` if organization or project is missing. No network
    /// access happens before this check.
    pub fn new(options: GitOptions) -> Result<Self, ProviderError> {
        Self::with_api_root(options, DEFAULT_API_ROOT)
    }

    /// Create an adapter against a custom API host (e.g., Azure DevOps Server
    /// or a test server). Browsing URLs always point at `dev.azure.com`.
    pub fn with_api_root(
        options: GitOptions,
        api_root: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let organization = options
            .organization
            .clone()
            .filter(|s| !s.is_empty());
        let project = options.project.clone().filter(|s| !s.is_empty());

        let (Some(organization), Some(project)) = (organization, project) else {
            let message =
                "Azure DevOps provider requires organization and project to be specified";
            error!("{}", message);
            return Err(ProviderError::Configuration(message.to_string()));
        };

        let auth_header = options.token().map(basic_auth_header);
        let api_base = format!(
            "{}/{}/{}/_apis",
            api_root.into().trim_end_matches('/'),
            organization,
            project
        );

        debug!(
            organization = %organization,
            project = %project,
            repo = %options.repo,
            branch = %options.branch,
            root_dir = %options.root_dir,
            "initialized Azure DevOps provider"
        );

        Ok(Self {
            client: Client::new(),
            options,
            organization,
            project,
            auth_header,
            api_base,
            cache: FileCache::new(),
        })
    }

    /// Get the organization.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Get the project.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Get the file cache.
    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Web root of the repository, shared by every URL builder.
    fn web_repo_url(&self) -> String {
        format!(
            "{}/{}/{}/_git/{}",
            WEB_ROOT, self.organization, self.project, self.options.repo
        )
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/git/repositories/{}/{}",
            self.api_base, self.options.repo, path
        )
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        if let Some(ref value) = self.auth_header {
            let value = HeaderValue::from_str(value).map_err(|_| {
                ProviderError::Configuration("access token contains invalid characters".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();

        if status == StatusCode::NON_AUTHORITATIVE_INFORMATION {
            // Azure answers an unrecognized PAT with a 203 sign-in page.
            return Err(ProviderError::AuthFailed(
                "Azure DevOps returned a sign-in page; check the personal access token".into(),
            ));
        }

        if status.is_success() {
            response.json().await.map_err(|e| {
                ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
            })
        } else {
            let body = response.json::<AzureErrorResponse>().await.unwrap_or_default();
            Err(map_error(status, body))
        }
    }

    /// Request a single item with inline content.
    async fn request_item(&self, full_path: &str) -> Result<Option<GitFile>, ProviderError> {
        let url = self.repo_url("items");
        let item_path = format!("/{}", full_path);

        debug!(path = full_path, "requesting item from Azure DevOps");

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .query(&[
                ("path", item_path.as_str()),
                ("api-version", API_VERSION),
                ("includeContent", "true"),
                ("versionDescriptor.version", self.options.branch.as_str()),
                ("versionDescriptor.versionType", "branch"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!(path = full_path, "file not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.json::<AzureErrorResponse>().await.unwrap_or_default();
            if body.type_key.as_deref() == Some(ITEM_NOT_FOUND_TYPE_KEY) {
                warn!(path = full_path, "file not found");
                return Ok(None);
            }
            return Err(map_error(status, body));
        }

        let item: AzureItem = self.handle_response(response).await?;
        let content = item.content.unwrap_or_default();
        let size = item.size.unwrap_or(content.len() as u64);

        debug!(path = full_path, size, "file fetched");

        Ok(Some(GitFile {
            provider: ProviderType::AzureDevOps,
            name: file_name(full_path),
            path: full_path.to_string(),
            sha: item.object_id,
            size,
            url: item.url,
            content,
            encoding: ContentEncoding::Utf8,
        }))
    }

    /// Resolve the current head commit of the configured branch.
    async fn resolve_head(&self) -> Result<String, ProviderError> {
        let url = self.repo_url("refs");
        let filter = format!("heads/{}", self.options.branch);

        debug!(branch = %self.options.branch, "fetching branch ref");

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .query(&[("filter", filter.as_str()), ("api-version", API_VERSION)])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let refs: AzureRefList = self.handle_response(response).await?;
        let full_name = format!("refs/heads/{}", self.options.branch);

        // The filter is a prefix match; only the exact ref counts.
        let head = refs
            .value
            .iter()
            .find(|r| r.name == full_name)
            .map(|r| r.object_id.clone());

        head.ok_or_else(|| {
            error!(
                repo = %self.options.repo,
                branch = %self.options.branch,
                "branch not found"
            );
            ProviderError::BranchNotFound(self.options.branch.clone())
        })
    }

    /// Submit one push carrying every change.
    async fn push(
        &self,
        old_object_id: &str,
        files: &[&RawFile],
        message: &str,
    ) -> Result<String, ProviderError> {
        let url = self.repo_url("pushes");
        let changes: Vec<PushChange> = files
            .iter()
            .map(|f| build_change(f, &self.options.root_dir))
            .collect();

        let body = PushBody {
            ref_updates: vec![RefUpdate {
                name: format!("refs/heads/{}", self.options.branch),
                old_object_id,
            }],
            commits: vec![PushCommit {
                comment: message,
                author: PushAuthor {
                    name: &self.options.author_name,
                    email: &self.options.author_email,
                    date: author_timestamp(),
                },
                changes,
            }],
        };

        debug!(changes = files.len(), "pushing commit");

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .query(&[("api-version", API_VERSION)])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let pushed: PushResponse = self.handle_response(response).await?;
        pushed
            .commits
            .into_iter()
            .next()
            .map(|c| c.commit_id)
            .ok_or_else(|| ProviderError::InvalidResponse("push response has no commits".into()))
    }
}

#[async_trait]
impl GitProvider for AzureDevOpsProvider {
    fn name(&self) -> &'static str {
        ProviderType::AzureDevOps.name()
    }

    async fn fetch_file(
        &self,
        path: &str,
        opts: FetchOptions,
    ) -> Result<Option<GitFile>, ProviderError> {
        let full_path = join_root(&self.options.root_dir, path);

        self.cache
            .get_or_fetch(&full_path, opts.cached, || self.request_item(&full_path))
            .await
            .inspect_err(|e| error!(path = %full_path, error = %e, "failed to fetch file"))
    }

    async fn commit_files(
        &self,
        files: &[RawFile],
        message: &str,
    ) -> Result<Option<CommitResult>, ProviderError> {
        if self.auth_header.is_none() {
            warn!("no token available, aborting commit");
            return Err(ProviderError::AuthRequired);
        }

        let pending = pending_changes(files);
        if pending.is_empty() {
            debug!("nothing to commit");
            return Ok(None);
        }

        let message = commit_message_with_trailer(message);

        let result = async {
            let head = self.resolve_head().await?;
            debug!(head = %head, "branch head resolved");
            self.push(&head, &pending, &message).await
        }
        .await;

        match result {
            Ok(commit_id) => {
                info!(commit = %commit_id, files = pending.len(), "commit pushed to Azure DevOps");
                Ok(Some(CommitResult {
                    success: true,
                    url: self.get_commit_url(&commit_id),
                    commit_sha: commit_id,
                }))
            }
            Err(e) => {
                error!(error = %e, "failed to commit files to Azure DevOps");
                Err(e)
            }
        }
    }

    fn get_repository_url(&self) -> String {
        self.web_repo_url()
    }

    fn get_branch_url(&self) -> String {
        format!("{}?version=GB{}", self.web_repo_url(), self.options.branch)
    }

    fn get_commit_url(&self, sha: &str) -> String {
        format!("{}/commit/{}", self.web_repo_url(), sha)
    }

    fn get_file_url(&self, _feature: StudioFeature, path: &str) -> String {
        format!(
            "{}?path=/{}&version=GB{}",
            self.web_repo_url(),
            join_root(&self.options.root_dir, path),
            self.options.branch
        )
    }

    fn get_repository_info(&self) -> RepositoryInfo {
        RepositoryInfo {
            owner: self.organization.clone(),
            repo: self.options.repo.clone(),
            branch: self.options.branch.clone(),
            provider: Some(ProviderType::AzureDevOps),
        }
    }
}

/// Strip the studio token marker. Tokens without it are used unchanged.
pub fn strip_tool_prefix(token: &str) -> &str {
    match token.strip_prefix(TOOL_TOKEN_PREFIX) {
        Some(pat) => pat,
        None => {
            warn!(
                "token does not start with the {} prefix; this may cause authentication issues",
                TOOL_TOKEN_PREFIX
            );
            token
        }
    }
}

/// Build the Basic auth header value for a PAT.
pub fn basic_auth_header(token: &str) -> String {
    let pat = strip_tool_prefix(token);
    format!("Basic {}", STANDARD.encode(format!(":{}", pat)))
}

/// Map one pending edit to a push change entry.
fn build_change<'a>(file: &'a RawFile, root_dir: &str) -> PushChange<'a> {
    let item = ChangeItem {
        path: format!("/{}", join_root(root_dir, &file.path)),
    };
    let new_content = || NewContent {
        content: &file.content,
        content_type: match file.encoding {
            ContentEncoding::Base64 => "base64encoded",
            ContentEncoding::Utf8 => "rawtext",
        },
    };

    match file.status {
        DraftStatus::Deleted => PushChange {
            change_type: "delete",
            item,
            new_content: None,
        },
        DraftStatus::Created => PushChange {
            change_type: "add",
            item,
            new_content: Some(new_content()),
        },
        DraftStatus::Modified | DraftStatus::Pristine => PushChange {
            change_type: "edit",
            item,
            new_content: Some(new_content()),
        },
    }
}

/// Map an error status and body to a `ProviderError`.
fn map_error(status: StatusCode, body: AzureErrorResponse) -> ProviderError {
    let mut message = body.message.unwrap_or_else(|| "Unknown error".to_string());
    if let Some(key) = body.type_key {
        message.push_str(&format!(" ({})", key));
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthFailed(message),
        StatusCode::NOT_FOUND => ProviderError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
        _ => ProviderError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Remote coordinates of an Azure DevOps repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureRemote {
    /// Organization name
    pub organization: String,
    /// Project name
    pub project: String,
    /// Repository name
    pub repo: String,
}

/// Parse an Azure DevOps remote URL.
///
/// Supports `https://dev.azure.com/{org}/{project}/_git/{repo}`, with or
/// without a `user@` prefix on the host.
pub fn parse_azure_devops_url(url: &str) -> Option<AzureRemote> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let rest = rest.split_once('@').map_or(rest, |(_, host)| host);
    let rest = rest.strip_prefix("dev.azure.com/")?;
    let parts: Vec<&str> = rest.trim_end_matches('/').split('/').collect();
    match parts.as_slice() {
        [org, project, "_git", repo]
            if !org.is_empty() && !project.is_empty() && !repo.is_empty() =>
        {
            Some(AzureRemote {
                organization: org.to_string(),
                project: project.to_string(),
                repo: repo.strip_suffix(".git").unwrap_or(*repo).to_string(),
            })
        }
        _ => None,
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Azure DevOps error response format.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzureErrorResponse {
    message: Option<String>,
    type_key: Option<String>,
}

/// Item returned by the Items API.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzureItem {
    object_id: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: Option<String>,
}

/// List wrapper returned by the Refs API.
#[derive(Deserialize)]
struct AzureRefList {
    #[serde(default)]
    value: Vec<AzureRef>,
}

/// A single ref.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzureRef {
    name: String,
    object_id: String,
}

/// Request body for the Pushes API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PushBody<'a> {
    ref_updates: Vec<RefUpdate<'a>>,
    commits: Vec<PushCommit<'a>>,
}

/// Compare-and-swap ref update.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefUpdate<'a> {
    name: String,
    old_object_id: &'a str,
}

/// Commit carried by a push.
#[derive(Serialize)]
struct PushCommit<'a> {
    comment: &'a str,
    author: PushAuthor<'a>,
    changes: Vec<PushChange<'a>>,
}

/// Commit author.
#[derive(Serialize)]
struct PushAuthor<'a> {
    name: &'a str,
    email: &'a str,
    date: String,
}

/// One file change.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PushChange<'a> {
    change_type: &'static str,
    item: ChangeItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_content: Option<NewContent<'a>>,
}

/// Path of a changed item.
#[derive(Serialize)]
struct ChangeItem {
    path: String,
}

/// New content of an added or edited item.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewContent<'a> {
    content: &'a str,
    content_type: &'static str,
}

/// Response of the Pushes API.
#[derive(Deserialize)]
struct PushResponse {
    #[serde(default)]
    commits: Vec<PushedCommit>,
}

/// Commit created by a push.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PushedCommit {
    commit_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GitOptions {
        GitOptions {
            provider: Some(ProviderType::AzureDevOps),
            organization: Some("acme".into()),
            project: Some("site".into()),
            repo: "docs".into(),
            branch: "main".into(),
            root_dir: "content".into(),
            token: Some("az_pat_XYZ".into()),
            author_name: "Jane".into(),
            author_email: "jane@example.com".into(),
            ..Default::default()
        }
    }

    mod parse_azure_devops_url {
        use super::*;

        #[test]
        fn https_remote() {
            assert_eq!(
                parse_azure_devops_url("https://dev.azure.com/acme/site/_git/docs"),
                Some(AzureRemote {
                    organization: "acme".into(),
                    project: "site".into(),
                    repo: "docs".into(),
                })
            );
        }

        #[test]
        fn remote_with_user_prefix() {
            let remote =
                parse_azure_devops_url("https://acme@dev.azure.com/acme/site/_git/docs").unwrap();
            assert_eq!(remote.organization, "acme");
        }

        #[test]
        fn rejects_other_hosts() {
            assert!(parse_azure_devops_url("https://github.com/acme/docs").is_none());
            assert!(parse_azure_devops_url("https://dev.azure.com/acme/site").is_none());
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn missing_project_is_configuration_error() {
            let result = AzureDevOpsProvider::new(GitOptions {
                project: None,
                ..options()
            });
            assert!(matches!(result, Err(ProviderError::Configuration(_))));
        }

        #[test]
        fn missing_organization_is_configuration_error() {
            let result = AzureDevOpsProvider::new(GitOptions {
                organization: Some(String::new()),
                ..options()
            });
            assert!(matches!(result, Err(ProviderError::Configuration(_))));
        }

        #[test]
        fn api_base_is_scoped_to_project() {
            let provider = AzureDevOpsProvider::new(options()).unwrap();
            assert_eq!(provider.api_base, "https://dev.azure.com/acme/site/_apis");
            assert_eq!(
                provider.repo_url("pushes"),
                "https://dev.azure.com/acme/site/_apis/git/repositories/docs/pushes"
            );
        }

        #[test]
        fn custom_api_root_trims_trailing_slash() {
            let provider =
                AzureDevOpsProvider::with_api_root(options(), "http://127.0.0.1:9000/").unwrap();
            assert_eq!(provider.api_base, "http://127.0.0.1:9000/acme/site/_apis");
        }

        #[test]
        fn debug_redacts_token() {
            let provider = AzureDevOpsProvider::new(options()).unwrap();
            let debug_output = format!("{:?}", provider);
            assert!(!debug_output.contains("XYZ"));
            assert!(!debug_output.contains("Basic"));
            assert!(debug_output.contains("has_token"));
        }
    }

    mod auth {
        use super::*;

        #[test]
        fn strips_tool_prefix() {
            assert_eq!(strip_tool_prefix("az_pat_XYZ"), "XYZ");
            assert_eq!(strip_tool_prefix("plainpat"), "plainpat");
        }

        #[test]
        fn basic_header_has_empty_username() {
            // base64(":XYZ")
            assert_eq!(basic_auth_header("az_pat_XYZ"), "Basic OlhZWg==");
            assert_eq!(basic_auth_header("XYZ"), "Basic OlhZWg==");
        }
    }

    mod changes {
        use super::*;

        #[test]
        fn modified_text_is_rawtext_edit() {
            let file = RawFile::text("a.md", "hi", DraftStatus::Modified);
            let json = serde_json::to_value(build_change(&file, "content")).unwrap();
            assert_eq!(
                json,
                serde_json::json!({
                    "changeType": "edit",
                    "item": { "path": "/content/a.md" },
                    "newContent": { "content": "hi", "contentType": "rawtext" }
                })
            );
        }

        #[test]
        fn created_base64_is_base64encoded_add() {
            let file = RawFile::base64("img/logo.png", "iVBO", DraftStatus::Created);
            let json = serde_json::to_value(build_change(&file, "")).unwrap();
            assert_eq!(json["changeType"], "add");
            assert_eq!(json["item"]["path"], "/img/logo.png");
            assert_eq!(json["newContent"]["contentType"], "base64encoded");
        }

        #[test]
        fn deleted_has_no_content() {
            let file = RawFile::deleted("old.md");
            let json = serde_json::to_value(build_change(&file, "content")).unwrap();
            assert_eq!(json["changeType"], "delete");
            assert_eq!(json["item"]["path"], "/content/old.md");
            assert!(json.get("newContent").is_none());
        }
    }

    mod urls {
        use super::*;

        #[test]
        fn web_urls() {
            let provider = AzureDevOpsProvider::new(options()).unwrap();
            assert_eq!(
                provider.get_repository_url(),
                "https://dev.azure.com/acme/site/_git/docs"
            );
            assert_eq!(
                provider.get_branch_url(),
                "https://dev.azure.com/acme/site/_git/docs?version=GBmain"
            );
            assert_eq!(
                provider.get_commit_url("abc123"),
                "https://dev.azure.com/acme/site/_git/docs/commit/abc123"
            );
            assert_eq!(
                provider.get_file_url(StudioFeature::Content, "blog/post.md"),
                "https://dev.azure.com/acme/site/_git/docs?path=/content/blog/post.md&version=GBmain"
            );
        }

        #[test]
        fn repository_info_uses_organization_as_owner() {
            let provider = AzureDevOpsProvider::new(options()).unwrap();
            let info = provider.get_repository_info();
            assert_eq!(info.owner, "acme");
            assert_eq!(info.repo, "docs");
            assert_eq!(info.branch, "main");
            assert_eq!(info.provider, Some(ProviderType::AzureDevOps));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn map_error_appends_type_key() {
            let err = map_error(
                StatusCode::CONFLICT,
                AzureErrorResponse {
                    message: Some("TF401028: The reference has already been updated".into()),
                    type_key: Some("GitReferenceStaleException".into()),
                },
            );
            assert_eq!(
                err,
                ProviderError::Api {
                    status: 409,
                    message: "TF401028: The reference has already been updated (GitReferenceStaleException)"
                        .into()
                }
            );
        }

        #[test]
        fn map_error_auth_and_rate_limit() {
            assert!(matches!(
                map_error(StatusCode::UNAUTHORIZED, AzureErrorResponse::default()),
                ProviderError::AuthFailed(_)
            ));
            assert_eq!(
                map_error(StatusCode::TOO_MANY_REQUESTS, AzureErrorResponse::default()),
                ProviderError::RateLimited
            );
        }
    }

    #[tokio::test]
    async fn commit_without_token_is_auth_required() {
        let provider = AzureDevOpsProvider::with_api_root(
            GitOptions {
                token: None,
                ..options()
            },
            "http://127.0.0.1:1",
        )
        .unwrap();
        let files = vec![RawFile::text("a.md", "hi", DraftStatus::Modified)];
        assert_eq!(
            provider.commit_files(&files, "update a").await,
            Err(ProviderError::AuthRequired)
        );
    }

    #[tokio::test]
    async fn commit_with_only_pristine_files_is_noop() {
        let provider =
            AzureDevOpsProvider::with_api_root(options(), "http://127.0.0.1:1").unwrap();
        let files = vec![RawFile::text("a.md", "hi", DraftStatus::Pristine)];
        assert_eq!(provider.commit_files(&files, "noop").await, Ok(None));
        assert_eq!(provider.commit_files(&[], "noop").await, Ok(None));
    }
}
