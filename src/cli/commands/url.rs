//! url command - Print (and optionally open) a web URL

use crate::cli::{Context, UrlTarget};
use crate::provider::{GitProvider, ProviderRegistry, StudioFeature};
use anyhow::{bail, Context as _, Result};

/// Run the url command.
pub fn url(ctx: &Context, target: &UrlTarget, open: bool) -> Result<()> {
    let registry = ProviderRegistry::new();
    let handle = ctx.provider(&registry)?;

    let url = resolve_url(handle.api.as_ref(), target);
    if url.is_empty() {
        bail!("the {} provider has no web URLs", handle.name);
    }

    println!("{}", url);
    if open {
        open::that(&url).with_context(|| format!("failed to open '{}'", url))?;
    }
    Ok(())
}

/// Build the URL for `target`.
pub fn resolve_url(api: &dyn GitProvider, target: &UrlTarget) -> String {
    match target {
        UrlTarget::Repo => api.get_repository_url(),
        UrlTarget::Branch => api.get_branch_url(),
        UrlTarget::Commit { sha } => api.get_commit_url(sha),
        UrlTarget::File { path, media } => {
            let feature = if *media {
                StudioFeature::Media
            } else {
                StudioFeature::Content
            };
            api.get_file_url(feature, path)
        }
    }
}
