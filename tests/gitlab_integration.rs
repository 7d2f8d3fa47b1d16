//! Integration tests for the GitLab adapter.
//!
//! Project and file paths travel percent-encoded (`acme%2Fdocs`), so the
//! mock paths below are matched in their encoded form.

use serde_json::json;
use studio_git::provider::{
    ContentEncoding, DraftStatus, FetchOptions, GitLabProvider, GitOptions, GitProvider,
    ProviderError, ProviderType, RawFile,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT: &str = "/api/v4/projects/acme%2Fdocs";

fn options() -> GitOptions {
    GitOptions {
        provider: Some(ProviderType::GitLab),
        owner: "acme".into(),
        repo: "docs".into(),
        branch: "main".into(),
        root_dir: "content".into(),
        token: Some("glpat-test".into()),
        author_name: "Jane".into(),
        author_email: "jane@example.com".into(),
        ..Default::default()
    }
}

fn provider(server: &MockServer) -> GitLabProvider {
    GitLabProvider::with_api_base(options(), format!("{}/api/v4", server.uri())).unwrap()
}

mod fetch {
    use super::*;

    #[tokio::test]
    async fn maps_repository_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/repository/files/content%2Fblog%2Fa.md", PROJECT)))
            .and(query_param("ref", "main"))
            .and(header("authorization", "Bearer glpat-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "file_name": "a.md",
                "file_path": "content/blog/a.md",
                "size": 5,
                "encoding": "base64",
                "content": "aGVsbG8=",
                "ref": "main",
                "blob_id": "blob1",
                "commit_id": "c1",
                "last_commit_id": "c1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let file = provider(&server)
            .fetch_file("blog/a.md", FetchOptions::cached())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(file.provider, ProviderType::GitLab);
        assert_eq!(file.name, "a.md");
        assert_eq!(file.path, "content/blog/a.md");
        assert_eq!(file.sha, "blob1");
        assert_eq!(file.encoding, ContentEncoding::Base64);
        assert_eq!(file.decoded_content().unwrap(), "hello");
        assert_eq!(
            file.url,
            "https://gitlab.com/acme/docs/-/blob/main/content/blog/a.md"
        );
    }

    #[tokio::test]
    async fn not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "404 File Not Found"
            })))
            .mount(&server)
            .await;

        let file = provider(&server)
            .fetch_file("missing.md", FetchOptions::default())
            .await
            .unwrap();
        assert!(file.is_none());
    }
}

mod commit {
    use super::*;

    #[tokio::test]
    async fn single_commit_with_actions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{}/repository/commits", PROJECT)))
            .and(body_partial_json(json!({
                "branch": "main",
                "commit_message": "update a\n\nCo-authored-by: Nuxt Studio <noreply@nuxt.studio>",
                "author_name": "Jane",
                "author_email": "jane@example.com",
                "actions": [
                    { "action": "update", "file_path": "content/a.md", "content": "hi", "encoding": "text" },
                    { "action": "delete", "file_path": "content/old.md" }
                ]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "abc123",
                "short_id": "abc123",
                "title": "update a"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let files = vec![
            RawFile::text("a.md", "hi", DraftStatus::Modified),
            RawFile::text("same.md", "same", DraftStatus::Pristine),
            RawFile::deleted("old.md"),
        ];
        let result = provider(&server)
            .commit_files(&files, "update a")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.commit_sha, "abc123");
        assert_eq!(result.url, "https://gitlab.com/acme/docs/-/commit/abc123");
    }

    #[tokio::test]
    async fn missing_branch_is_branch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{}/repository/commits", PROJECT)))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "You can only create or edit files when you are on a branch"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let files = vec![RawFile::text("a.md", "hi", DraftStatus::Modified)];
        assert_eq!(
            provider(&server).commit_files(&files, "update a").await,
            Err(ProviderError::BranchNotFound("main".into()))
        );
    }

    #[tokio::test]
    async fn other_rejections_keep_vendor_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "A file with this name already exists"
            })))
            .mount(&server)
            .await;

        let files = vec![RawFile::text("a.md", "hi", DraftStatus::Created)];
        assert_eq!(
            provider(&server).commit_files(&files, "add a").await,
            Err(ProviderError::Api {
                status: 400,
                message: "A file with this name already exists".into()
            })
        );
    }

    #[tokio::test]
    async fn no_token_makes_no_requests() {
        let server = MockServer::start().await;
        let provider = GitLabProvider::with_api_base(
            GitOptions {
                token: None,
                ..options()
            },
            format!("{}/api/v4", server.uri()),
        )
        .unwrap();

        let files = vec![RawFile::text("a.md", "hi", DraftStatus::Modified)];
        assert_eq!(
            provider.commit_files(&files, "update a").await,
            Err(ProviderError::AuthRequired)
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
