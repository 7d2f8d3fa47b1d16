//! Studio Git - git provider adapters for content editing
//!
//! Studio Git lets a content editor read files from, and commit edits to, a
//! repository hosted on GitHub, GitLab or Azure DevOps through one
//! provider-agnostic interface.
//!
//! # Architecture
//!
//! - [`provider`] - The `GitProvider` contract, vendor adapters and selection
//! - [`auth`] - Session users and credential sources
//! - [`config`] - Configuration schema and loading
//! - [`activation`] - Session-driven preview activation
//! - [`cli`] - Command-line interface (`studio` binary)
//!
//! # Invariants
//!
//! 1. A missing file is `Ok(None)`, never an error
//! 2. A commit is one atomic push on the configured branch, or nothing
//! 3. Commits without a token fail before any network access
//! 4. Tokens never appear in logs, errors or `Debug` output

pub mod activation;
pub mod auth;
pub mod cli;
pub mod config;
pub mod provider;
