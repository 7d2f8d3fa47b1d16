//! activation
//!
//! Preview activation driven by session changes.
//!
//! # Design
//!
//! [`ActivationWatcher`] is an explicit two-state machine fed by
//! [`ActivationWatcher::observe`] with the current session user. Side
//! effects go through an injected [`StudioHost`]:
//!
//! | State      | Session             | Effect                                   | Next       |
//! |------------|---------------------|------------------------------------------|------------|
//! | `Inactive` | marked user         | disable prerendering, run activation     | `Active`   |
//! | `Inactive` | unmarked / none     | nothing                                  | `Inactive` |
//! | `Active`   | marked user         | nothing                                  | `Active`   |
//! | `Active`   | unmarked / none     | request a reload                         | `Inactive` |
//!
//! A failed activation leaves the watcher `Inactive`, so the next marked
//! session retries it. Deactivation never tears anything down in place; the
//! host reload is the teardown.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::auth::StudioUser;

/// Errors raised by the host while activating.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActivationError {
    /// The host's activation callback failed.
    #[error("studio activation failed: {0}")]
    Callback(String),
}

/// Side effects the watcher asks of its environment.
#[async_trait]
pub trait StudioHost: Send + Sync {
    /// Clear the prerender manifest so every page renders live.
    async fn disable_prerendering(&self);

    /// Mount the studio for `user`.
    async fn activate(&self, user: &StudioUser) -> Result<(), ActivationError>;

    /// Reload the page (the only way out of an active studio).
    async fn reload(&self);
}

/// Watcher state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActivationState {
    /// Studio not mounted
    #[default]
    Inactive,
    /// Studio mounted
    Active,
}

/// What an observation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The studio was mounted.
    Activated,
    /// A reload was requested.
    Reloaded,
    /// Nothing happened.
    Unchanged,
}

/// Session-driven activation state machine.
#[derive(Debug)]
pub struct ActivationWatcher<H> {
    host: H,
    state: ActivationState,
}

impl<H: StudioHost> ActivationWatcher<H> {
    /// Create an inactive watcher.
    pub fn new(host: H) -> Self {
        Self {
            host,
            state: ActivationState::Inactive,
        }
    }

    /// Current state.
    pub fn state(&self) -> ActivationState {
        self.state
    }

    /// Access the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Feed the current session user.
    ///
    /// # Errors
    ///
    /// The host's activation error; the state stays `Inactive`.
    pub async fn observe(
        &mut self,
        user: Option<&StudioUser>,
    ) -> Result<Transition, ActivationError> {
        let marked = user.filter(|u| u.content_user);

        match (self.state, marked) {
            (ActivationState::Inactive, Some(user)) => {
                debug!(user = %user.name, "studio user detected");
                self.host.disable_prerendering().await;
                if let Err(e) = self.host.activate(user).await {
                    error!(error = %e, "studio activation failed");
                    return Err(e);
                }
                self.state = ActivationState::Active;
                info!(provider = %user.provider, "studio activated");
                Ok(Transition::Activated)
            }
            (ActivationState::Active, None) => {
                info!("studio session ended, reloading");
                self.host.reload().await;
                self.state = ActivationState::Inactive;
                Ok(Transition::Reloaded)
            }
            (ActivationState::Active, Some(_)) | (ActivationState::Inactive, None) => {
                Ok(Transition::Unchanged)
            }
        }
    }
}
