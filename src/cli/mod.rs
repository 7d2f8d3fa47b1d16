//! cli
//!
//! Command-line interface for the studio git layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Resolve configuration and session into a provider handle
//! - Delegate to command handlers
//!
//! # Logging
//!
//! Filter directives come from `STUDIO_LOG`, then `RUST_LOG`. Without
//! either, only warnings are shown (`debug` with `--debug`). Logs go to
//! stderr so command output stays pipeable.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, UrlTarget};

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use crate::auth::session_from_env;
use crate::config::StudioConfig;
use crate::provider::{ProviderHandle, ProviderRegistry};

/// Environment variable with log filter directives.
pub const LOG_ENV: &str = "STUDIO_LOG";

/// Execution context shared by command handlers.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Directory local files are resolved against
    pub cwd: Option<PathBuf>,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Force the local provider
    pub dev: bool,
}

impl Context {
    /// Directory local files are resolved against.
    pub fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().context("failed to determine current directory"),
        }
    }

    /// Load configuration and select the provider for this invocation.
    ///
    /// The access token comes from the provider's `STUDIO_*_TOKEN` variable;
    /// without one, reads still work and commits fail with an
    /// authentication error.
    pub fn provider(&self, registry: &ProviderRegistry) -> Result<Arc<ProviderHandle>> {
        let loaded = StudioConfig::load(self.config.as_deref()).context("failed to load config")?;
        let config = loaded.config;

        let session = match config.provider()? {
            Some(provider) => session_from_env(provider)
                .inspect_err(|e| debug!(error = %e, "no session token"))
                .ok(),
            None => None,
        };
        let options = config.git_options(session.as_ref())?;
        let dev_mode = self.dev || config.dev;

        debug!(?options, dev_mode, "resolved provider options");
        registry
            .use_git_provider(&options, dev_mode)
            .context("failed to create git provider")
    }
}

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let ctx = Context {
        cwd: cli.cwd.clone(),
        config: cli.config.clone(),
        dev: cli.dev,
    };

    commands::dispatch(cli.command, &ctx)
}
