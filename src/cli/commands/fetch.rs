//! fetch command - Print a file from the configured branch
//!
//! # Example
//!
//! ```bash
//! studio fetch blog/hello.md
//! studio fetch notes.txt --decode
//! ```

use crate::cli::Context;
use crate::provider::{FetchOptions, ProviderRegistry};
use anyhow::{bail, Result};

/// Run the fetch command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
/// Each invocation builds its own [`ProviderRegistry`], so `cached` never
/// produces a hit here; it is passed through for parity with library callers
/// that keep a registry alive across reads.
pub fn fetch(ctx: &Context, path: &str, cached: bool, decode: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(fetch_async(ctx, path, cached, decode))
}

/// Async implementation of fetch.
async fn fetch_async(ctx: &Context, path: &str, cached: bool, decode: bool) -> Result<()> {
    let registry = ProviderRegistry::new();
    let handle = ctx.provider(&registry)?;

    let Some(file) = handle.api.fetch_file(path, FetchOptions { cached }).await? else {
        bail!("file not found: {}", path);
    };

    if decode {
        print!("{}", file.decoded_content()?);
    } else {
        print!("{}", file.content);
    }
    Ok(())
}
