//! config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order, first existing file wins:
//! 1. An explicit path (`--config`)
//! 2. `$STUDIO_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/studio/config.toml`
//! 4. `~/.studio/config.toml`
//!
//! An explicit path must exist. When nothing is found, defaults are used
//! (local provider, branch `main`).
//!
//! # Example
//!
//! ```no_run
//! use studio_git::config::StudioConfig;
//!
//! let result = StudioConfig::load(None).unwrap();
//! let options = result.config.git_options(None).unwrap();
//! println!("branch: {}", options.branch);
//! ```

pub mod schema;

pub use schema::{AuthorConfig, GitConfig, StudioConfig, DEFAULT_BRANCH};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the config location.
pub const CONFIG_ENV: &str = "STUDIO_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    Missing(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: StudioConfig,
    /// The file it came from, if any.
    pub path: Option<PathBuf>,
}

impl StudioConfig {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit path is missing, or if a config file
    /// exists but cannot be read, parsed or validated.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            let config = Self::load_from(path)?;
            return Ok(ConfigLoadResult {
                config,
                path: Some(path.to_path_buf()),
            });
        }

        let candidates = candidate_paths(|name| std::env::var(name).ok(), dirs::home_dir());
        for path in candidates {
            if path.exists() {
                let config = Self::load_from(&path)?;
                return Ok(ConfigLoadResult {
                    config,
                    path: Some(path),
                });
            }
        }

        debug!("no config file found, using defaults");
        Ok(ConfigLoadResult {
            config: StudioConfig::default(),
            path: None,
        })
    }

    /// Read, parse and validate a single config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: StudioConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;

        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

/// Config file candidates in precedence order, excluding an explicit path.
fn candidate_paths(
    env: impl Fn(&str) -> Option<String>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
        paths.push(PathBuf::from(path));
    }
    if let Some(xdg_home) = env("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
        paths.push(PathBuf::from(xdg_home).join("studio/config.toml"));
    }
    if let Some(home) = home {
        paths.push(home.join(".studio/config.toml"));
    }
    paths
}
