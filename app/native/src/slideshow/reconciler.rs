//! Config hot-reload.
//!
//! Every tick the stored folder/wait list is loaded again. A list that
//! differs from the active one replaces it only when it is valid; invalid
//! lists are ignored so a half-edited config file never stops the slideshow.

use super::pairs::ActivePairs;
use crate::config::{ConfigStore, FolderWait, merge_override};
use crate::error::WallslideError;

/// Detects and validates config changes.
#[derive(Debug)]
pub struct ConfigReconciler<S: ConfigStore> {
    store: S,
    /// Last rejected candidate, so a broken file is logged once, not every tick.
    last_rejected: Option<Vec<FolderWait>>,
}

impl<S: ConfigStore> ConfigReconciler<S> {
    pub const fn new(store: S) -> Self { Self { store, last_rejected: None } }

    pub const fn store(&self) -> &S { &self.store }

    /// Produces the list the slideshow starts with.
    ///
    /// A non-empty `overrides` list is merged into the stored list by
    /// position and written back before validation. A stored list that
    /// cannot be read counts as empty in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read without overrides or
    /// cannot be written, or [`WallslideError::InvalidFolders`] if the
    /// resulting list is invalid.
    pub fn initialize(&self, overrides: &[FolderWait]) -> Result<ActivePairs, WallslideError> {
        let initial = if overrides.is_empty() {
            self.store.load()?
        } else {
            let stored = self.store.load().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "stored configuration unreadable, using overrides only");
                Vec::new()
            });
            self.store.save(&merge_override(stored, overrides))?;
            // Read back what the store kept so the first poll sees no change
            self.store.load()?
        };

        ActivePairs::new(initial).map_err(|rejection| {
            tracing::debug!(reason = %rejection, "initial configuration rejected");
            WallslideError::InvalidFolders
        })
    }

    /// Reloads the stored list and activates it if it changed and is valid.
    ///
    /// Returns `true` when `active` was replaced.
    pub fn poll(&mut self, active: &mut ActivePairs) -> bool {
        let candidate = match self.store.load() {
            Ok(candidate) => candidate,
            Err(err) => {
                tracing::debug!(error = %err, "failed to reload configuration");
                return false;
            }
        };

        if active.matches(&candidate) {
            self.last_rejected = None;
            return false;
        }

        match ActivePairs::new(candidate.clone()) {
            Ok(next) => {
                tracing::info!(pairs = next.pairs().len(), "configuration reloaded");
                *active = next;
                self.last_rejected = None;
                true
            }
            Err(rejection) => {
                if self.last_rejected.as_ref() != Some(&candidate) {
                    tracing::debug!(reason = %rejection, "ignoring invalid configuration");
                    self.last_rejected = Some(candidate);
                }
                false
            }
        }
    }
}
