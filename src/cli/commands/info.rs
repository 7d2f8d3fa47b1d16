//! info command - Show the selected provider and repository

use crate::cli::Context;
use crate::provider::ProviderRegistry;
use anyhow::Result;

/// Print provider, repository coordinates and web URLs.
pub fn info(ctx: &Context) -> Result<()> {
    let registry = ProviderRegistry::new();
    let handle = ctx.provider(&registry)?;
    let repo = handle.api.get_repository_info();

    println!("Provider: {} ({})", handle.name, handle.icon);
    match repo.provider {
        Some(provider) => println!("Type: {}", provider),
        None => println!("Type: {}", handle.api.name()),
    }
    if !repo.owner.is_empty() || !repo.repo.is_empty() {
        println!("Repository: {}/{}", repo.owner, repo.repo);
    }
    println!("Branch: {}", repo.branch);

    let repo_url = handle.api.get_repository_url();
    if !repo_url.is_empty() {
        println!("URL: {}", repo_url);
        println!("Branch URL: {}", handle.api.get_branch_url());
    }

    Ok(())
}
