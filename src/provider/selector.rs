//! provider::selector
//!
//! Resolve session options to a shared provider handle.
//!
//! # Design
//!
//! A [`ProviderRegistry`] memoizes one [`ProviderHandle`] per unique
//! `(GitOptions, dev_mode)` pair, so every caller in a session shares the
//! same adapter and therefore the same file cache. Construction failures
//! are returned to the caller and never stored; a later call with fixed
//! options builds a fresh adapter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error};

use super::factory::create_provider;
use super::null::NullProvider;
use super::traits::{GitProvider, ProviderError};
use super::types::GitOptions;

/// Display name of the local provider.
const LOCAL_DISPLAY_NAME: &str = "Local";

/// Icon of the local provider.
const LOCAL_ICON: &str = "i-simple-icons:git";

/// A resolved provider plus its presentation metadata.
pub struct ProviderHandle {
    /// Display name (e.g., "GitHub", "Azure DevOps", "Local")
    pub name: &'static str,
    /// Icon identifier
    pub icon: &'static str,
    /// The adapter
    pub api: Arc<dyn GitProvider>,
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("api", &self.api.name())
            .finish()
    }
}

/// Memoizing provider selector.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    handles: Mutex<HashMap<(GitOptions, bool), Arc<ProviderHandle>>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the provider handle for `options`.
    ///
    /// Dev mode, or options without a provider, select the local provider.
    /// Otherwise the adapter for `options.provider` is built on first use
    /// and reused afterwards.
    ///
    /// # Errors
    ///
    /// `ProviderError::Configuration` when the adapter cannot be built.
    pub fn use_git_provider(
        &self,
        options: &GitOptions,
        dev_mode: bool,
    ) -> Result<Arc<ProviderHandle>, ProviderError> {
        let key = (options.clone(), dev_mode);
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = handles.get(&key) {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(build_handle(options, dev_mode)?);
        debug!(provider = handle.name, dev_mode, "provider selected");
        handles.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// Number of memoized handles.
    pub fn len(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no handle has been built yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a handle without consulting the registry.
fn build_handle(options: &GitOptions, dev_mode: bool) -> Result<ProviderHandle, ProviderError> {
    match options.provider {
        Some(provider) if !dev_mode => {
            let api = create_provider(options.clone()).inspect_err(|e| {
                error!(provider = %provider, error = %e, "failed to create provider");
            })?;
            Ok(ProviderHandle {
                name: provider.display_name(),
                icon: provider.icon(),
                api: Arc::from(api),
            })
        }
        _ => Ok(ProviderHandle {
            name: LOCAL_DISPLAY_NAME,
            icon: LOCAL_ICON,
            api: Arc::new(NullProvider::new(options)),
        }),
    }
}
