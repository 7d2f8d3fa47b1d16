//! provider
//!
//! Abstraction over git hosting providers (GitHub, GitLab, Azure DevOps).
//!
//! # Architecture
//!
//! The [`GitProvider`] trait is the whole surface the rest of the studio
//! sees. Callers obtain an adapter through [`ProviderRegistry`] (memoized,
//! dev-mode aware) or [`create_provider`] (one-off), never by naming a
//! concrete adapter.
//!
//! - Adapters receive a finished [`GitOptions`] and never run an auth flow
//! - A missing file is `Ok(None)`, not an error
//! - Every commit is a single atomic push on the configured branch
//!
//! # Modules
//!
//! - `traits`: the `GitProvider` trait and `ProviderError`
//! - `types`: files, edits, commit results and path helpers
//! - `cache`: per-adapter in-memory file cache
//! - [`github`]: Contents + Git Data APIs
//! - [`gitlab`]: Repository Files + Commits APIs
//! - [`azure_devops`]: Items + Refs + Pushes APIs
//! - [`null`]: local no-op provider
//! - `factory`: provider types, detection and creation
//! - `selector`: memoized provider handles
//!
//! # Example
//!
//! ```ignore
//! use studio_git::provider::{FetchOptions, GitOptions, ProviderRegistry, ProviderType};
//!
//! let registry = ProviderRegistry::new();
//! let handle = registry.use_git_provider(&options, false)?;
//!
//! if let Some(file) = handle.api.fetch_file("index.md", FetchOptions::cached()).await? {
//!     println!("{} ({} bytes)", file.path, file.size);
//! }
//! ```

pub mod azure_devops;
mod cache;
mod factory;
pub mod github;
pub mod gitlab;
pub mod null;
mod selector;
mod traits;
mod types;

pub use azure_devops::AzureDevOpsProvider;
pub use cache::FileCache;
pub use factory::{create_provider, detect_remote, valid_provider_names, ProviderType, RemoteRepo};
pub use github::GitHubProvider;
pub use gitlab::GitLabProvider;
pub use null::NullProvider;
pub use selector::{ProviderHandle, ProviderRegistry};
pub use traits::*;
pub use types::*;
