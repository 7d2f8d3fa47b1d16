//! provider::types
//!
//! Data model shared by every provider adapter.
//!
//! # Paths
//!
//! [`join_root`] is the only place a caller-relative path is rooted under
//! the configured `root_dir`. Adapters call it for reads, writes and file
//! URLs alike.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::factory::ProviderType;
use super::traits::ProviderError;

/// Trailer appended to every commit message pushed through an adapter.
pub const STUDIO_COAUTHOR: &str = "Co-authored-by: Nuxt Studio <noreply@nuxt.studio>";

/// Configuration for one adapter instance.
///
/// Immutable once handed to an adapter. Implements `Hash` so the selector
/// can memoize adapters per unique set of options.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct GitOptions {
    /// Which hosting provider to talk to (`None` means local/no-op)
    pub provider: Option<ProviderType>,
    /// Repository owner (user, organization or group)
    pub owner: String,
    /// Azure DevOps organization
    pub organization: Option<String>,
    /// Azure DevOps project
    pub project: Option<String>,
    /// Repository name
    pub repo: String,
    /// Access token (OAuth token or PAT)
    pub token: Option<String>,
    /// Branch that reads and commits target
    pub branch: String,
    /// Directory prefix for every file path
    pub root_dir: String,
    /// Commit author name
    pub author_name: String,
    /// Commit author email
    pub author_email: String,
    /// Self-hosted instance URL (GitLab)
    pub instance_url: Option<String>,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitOptions")
            .field("provider", &self.provider)
            .field("owner", &self.owner)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("repo", &self.repo)
            .field("has_token", &self.token().is_some())
            .field("branch", &self.branch)
            .field("root_dir", &self.root_dir)
            .field("author_name", &self.author_name)
            .field("author_email", &self.author_email)
            .field("instance_url", &self.instance_url)
            .finish()
    }
}

impl GitOptions {
    /// The access token, if one is configured and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// How file content is encoded on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentEncoding {
    /// Plain text
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    /// Base64-encoded bytes
    #[serde(rename = "base64")]
    Base64,
}

impl ContentEncoding {
    /// Map a vendor encoding label; anything other than base64 is text.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("base64") {
            ContentEncoding::Base64
        } else {
            ContentEncoding::Utf8
        }
    }
}

impl std::fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentEncoding::Utf8 => write!(f, "utf-8"),
            ContentEncoding::Base64 => write!(f, "base64"),
        }
    }
}

/// Status of a pending edit relative to the last committed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    /// Unchanged; never sent to the vendor
    Pristine,
    /// New file
    Created,
    /// Existing file with new content
    Modified,
    /// File to remove
    Deleted,
}

impl std::fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftStatus::Pristine => write!(f, "pristine"),
            DraftStatus::Created => write!(f, "created"),
            DraftStatus::Modified => write!(f, "modified"),
            DraftStatus::Deleted => write!(f, "deleted"),
        }
    }
}

/// A file read from the remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitFile {
    /// Provider the file came from
    pub provider: ProviderType,
    /// Last path segment
    pub name: String,
    /// Repository-relative path including `root_dir`
    pub path: String,
    /// Blob/object id reported by the vendor
    pub sha: String,
    /// Size in bytes
    pub size: u64,
    /// Canonical URL reported by the vendor
    pub url: String,
    /// Raw content as returned by the vendor
    pub content: String,
    /// Encoding of `content`
    pub encoding: ContentEncoding,
}

impl GitFile {
    /// Decode `content` into text.
    ///
    /// # Errors
    ///
    /// `InvalidResponse` if base64 content is malformed or not UTF-8.
    pub fn decoded_content(&self) -> Result<String, ProviderError> {
        match self.encoding {
            ContentEncoding::Utf8 => Ok(self.content.clone()),
            ContentEncoding::Base64 => {
                let compact: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = STANDARD.decode(compact).map_err(|e| {
                    ProviderError::InvalidResponse(format!("invalid base64 content: {}", e))
                })?;
                String::from_utf8(bytes).map_err(|e| {
                    ProviderError::InvalidResponse(format!("content is not UTF-8: {}", e))
                })
            }
        }
    }
}

/// A pending local edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFile {
    /// Path relative to `root_dir`
    pub path: String,
    /// New content (ignored for deletions)
    pub content: String,
    /// Encoding of `content`
    pub encoding: ContentEncoding,
    /// Draft status of the edit
    pub status: DraftStatus,
}

impl RawFile {
    /// A text edit.
    pub fn text(path: impl Into<String>, content: impl Into<String>, status: DraftStatus) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            encoding: ContentEncoding::Utf8,
            status,
        }
    }

    /// An edit whose content is already base64-encoded.
    pub fn base64(
        path: impl Into<String>,
        content: impl Into<String>,
        status: DraftStatus,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            encoding: ContentEncoding::Base64,
            status,
        }
    }

    /// An edit built from raw bytes: text if valid UTF-8, base64 otherwise.
    pub fn from_bytes(path: impl Into<String>, bytes: Vec<u8>, status: DraftStatus) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::text(path, text, status),
            Err(e) => Self::base64(path, STANDARD.encode(e.into_bytes()), status),
        }
    }

    /// A deletion.
    pub fn deleted(path: impl Into<String>) -> Self {
        Self::text(path, String::new(), DraftStatus::Deleted)
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    /// Always true for a pushed commit
    pub success: bool,
    /// Id of the new commit
    pub commit_sha: String,
    /// Web URL of the new commit
    pub url: String,
}

/// Identity of the repository an adapter is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// Owner or organization
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Configured branch
    pub branch: String,
    /// Provider (`None` for the local provider)
    pub provider: Option<ProviderType>,
}

/// Root a caller-relative path under `root_dir`.
///
/// Surrounding slashes are normalized so the result never starts or ends
/// with `/` and never contains an empty segment at the join.
pub fn join_root(root_dir: &str, path: &str) -> String {
    let root = root_dir.trim_matches('/');
    let path = path.trim_start_matches('/');
    match (root.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => root.to_string(),
        (false, false) => format!("{}/{}", root, path),
    }
}

/// Last segment of a slash-separated path.
pub fn file_name(path: &str) -> String {
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
        .to_string()
}

/// Append the studio co-author trailer after a blank line.
pub fn commit_message_with_trailer(message: &str) -> String {
    format!("{}\n\n{}", message, STUDIO_COAUTHOR)
}

/// Drop `Pristine` entries, keeping caller order.
pub fn pending_changes(files: &[RawFile]) -> Vec<&RawFile> {
    files
        .iter()
        .filter(|f| f.status != DraftStatus::Pristine)
        .collect()
}

/// Current time in the ISO-8601 form vendors expect for author dates.
pub(crate) fn author_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod join_root {
        use super::*;

        #[test]
        fn prefixes_root() {
            assert_eq!(join_root("content", "a.md"), "content/a.md");
        }

        #[test]
        fn empty_root_passes_path_through() {
            assert_eq!(join_root("", "docs/a.md"), "docs/a.md");
        }

        #[test]
        fn normalizes_slashes() {
            assert_eq!(join_root("/content/", "/a.md"), "content/a.md");
            assert_eq!(join_root("content", ""), "content");
        }
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(file_name("content/blog/post.md"), "post.md");
        assert_eq!(file_name("post.md"), "post.md");
        assert_eq!(file_name("content/blog/"), "blog");
    }

    #[test]
    fn trailer_follows_blank_line() {
        assert_eq!(
            commit_message_with_trailer("update a"),
            "update a\n\nCo-authored-by: Nuxt Studio <noreply@nuxt.studio>"
        );
    }

    #[test]
    fn pending_changes_drops_pristine_in_order() {
        let files = vec![
            RawFile::text("a.md", "a", DraftStatus::Pristine),
            RawFile::text("b.md", "b", DraftStatus::Modified),
            RawFile::deleted("c.md"),
            RawFile::text("d.md", "d", DraftStatus::Pristine),
        ];
        let pending = pending_changes(&files);
        let paths: Vec<&str> = pending.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["b.md", "c.md"]);
    }

    #[test]
    fn token_ignores_empty_string() {
        let mut options = GitOptions {
            token: Some(String::new()),
            ..Default::default()
        };
        assert!(options.token().is_none());
        options.token = Some("abc".into());
        assert_eq!(options.token(), Some("abc"));
    }

    #[test]
    fn debug_redacts_token() {
        let options = GitOptions {
            token: Some("secret_token_abc123".into()),
            repo: "docs".into(),
            ..Default::default()
        };
        let debug_output = format!("{:?}", options);
        assert!(!debug_output.contains("secret_token_abc123"));
        assert!(debug_output.contains("has_token"));
        assert!(debug_output.contains("docs"));
    }

    mod raw_file {
        use super::*;

        #[test]
        fn from_bytes_keeps_utf8_as_text() {
            let file = RawFile::from_bytes("a.md", b"hello".to_vec(), DraftStatus::Created);
            assert_eq!(file.encoding, ContentEncoding::Utf8);
            assert_eq!(file.content, "hello");
        }

        #[test]
        fn from_bytes_encodes_binary_as_base64() {
            let file = RawFile::from_bytes("logo.png", vec![0xff, 0x00, 0x10], DraftStatus::Created);
            assert_eq!(file.encoding, ContentEncoding::Base64);
            assert_eq!(file.content, "/wAQ");
        }
    }

    mod git_file {
        use super::*;

        fn file(content: &str, encoding: ContentEncoding) -> GitFile {
            GitFile {
                provider: ProviderType::GitHub,
                name: "a.md".into(),
                path: "content/a.md".into(),
                sha: "abc".into(),
                size: 5,
                url: String::new(),
                content: content.into(),
                encoding,
            }
        }

        #[test]
        fn decodes_base64_with_line_breaks() {
            let f = file("aGVs\nbG8=\n", ContentEncoding::Base64);
            assert_eq!(f.decoded_content().unwrap(), "hello");
        }

        #[test]
        fn utf8_content_is_returned_as_is() {
            let f = file("hello", ContentEncoding::Utf8);
            assert_eq!(f.decoded_content().unwrap(), "hello");
        }

        #[test]
        fn malformed_base64_is_invalid_response() {
            let f = file("***", ContentEncoding::Base64);
            assert!(matches!(
                f.decoded_content(),
                Err(ProviderError::InvalidResponse(_))
            ));
        }

        #[test]
        fn serializes_camel_case_with_encoding_label() {
            let json = serde_json::to_value(file("x", ContentEncoding::Utf8)).unwrap();
            assert_eq!(json["encoding"], "utf-8");
            assert_eq!(json["provider"], "github");
        }
    }

    #[test]
    fn encoding_from_label() {
        assert_eq!(ContentEncoding::from_label("base64"), ContentEncoding::Base64);
        assert_eq!(ContentEncoding::from_label("BASE64"), ContentEncoding::Base64);
        assert_eq!(ContentEncoding::from_label("text"), ContentEncoding::Utf8);
    }
}
