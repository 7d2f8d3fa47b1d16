//! commit command - Commit local files as one atomic commit
//!
//! Local files are read relative to `--cwd` (or the current directory) and
//! committed under the same relative path. Content that is not valid UTF-8
//! is sent base64-encoded.

use std::path::Path;

use crate::cli::Context;
use crate::provider::{DraftStatus, ProviderRegistry, RawFile};
use anyhow::{Context as _, Result};
use tracing::debug;

/// Run the commit command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn commit(
    ctx: &Context,
    message: &str,
    created: &[String],
    modified: &[String],
    deleted: &[String],
) -> Result<()> {
    let files = collect_changes(&ctx.cwd()?, created, modified, deleted)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(commit_async(ctx, message, &files))
}

/// Async implementation of commit.
async fn commit_async(ctx: &Context, message: &str, files: &[RawFile]) -> Result<()> {
    let registry = ProviderRegistry::new();
    let handle = ctx.provider(&registry)?;

    match handle
        .api
        .commit_files(files, message)
        .await
        .context("commit failed")?
    {
        Some(result) => {
            println!("Committed {}", result.commit_sha);
            println!("{}", result.url);
        }
        None => println!("Nothing to commit."),
    }
    Ok(())
}

/// Build pending edits from local paths.
///
/// # Errors
///
/// Fails if a created or modified file cannot be read.
pub fn collect_changes(
    base: &Path,
    created: &[String],
    modified: &[String],
    deleted: &[String],
) -> Result<Vec<RawFile>> {
    let mut files = Vec::with_capacity(created.len() + modified.len() + deleted.len());

    for (paths, status) in [
        (created, DraftStatus::Created),
        (modified, DraftStatus::Modified),
    ] {
        for path in paths {
            let bytes = std::fs::read(base.join(path))
                .with_context(|| format!("failed to read '{}'", path))?;
            debug!(path = %path, status = %status, bytes = bytes.len(), "staged file");
            files.push(RawFile::from_bytes(path.as_str(), bytes, status));
        }
    }
    files.extend(deleted.iter().map(|path| RawFile::deleted(path.as_str())));

    Ok(files)
}
