//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves the provider through [`Context::provider`]
//! 2. Calls the `GitProvider` operation
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! `fetch` and `commit` talk to the network. Their handlers are synchronous
//! wrappers that run the async implementation on a fresh tokio runtime.

mod commit;
mod fetch;
mod info;
mod url;

// Re-export command functions for testing and direct invocation
pub use commit::{commit, collect_changes};
pub use fetch::fetch;
pub use info::info;
pub use url::{resolve_url, url};

use super::args::Command;
use super::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Info => info(ctx),
        Command::Fetch {
            path,
            cached,
            decode,
        } => fetch(ctx, &path, cached, decode),
        Command::Commit {
            message,
            created,
            modified,
            deleted,
        } => commit(ctx, &message, &created, &modified, &deleted),
        Command::Url { target, open } => url(ctx, &target, open),
    }
}
