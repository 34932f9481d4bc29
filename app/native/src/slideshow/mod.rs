//! The slideshow core.
//!
//! One [`Slideshow::tick`] reloads the config if it changed, enumerates
//! monitors, reconciles folder watches, drains the dirty folders and lets
//! the scheduler apply every due wallpaper. The [`supervisor`] runs ticks in
//! a loop and recovers from their faults.

pub mod fault;
pub mod images;
pub mod pairs;
pub mod reconciler;
pub mod scheduler;
pub mod supervisor;
#[cfg(test)]
pub mod testing;
pub mod watcher;

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

pub use fault::TickFault;
pub use pairs::{ActivePairs, ConfigRejection};
pub use reconciler::ConfigReconciler;
pub use scheduler::{MonitorState, Scheduler, TickReport};
pub use supervisor::{RecoveryTiming, StopSignal, Supervisor};
pub use watcher::{DirtyFolders, FolderWatcherManager};

use crate::config::ConfigStore;
use crate::wallpaper::{BackendError, WallpaperBackend};

/// All slideshow state, advanced one tick at a time.
pub struct Slideshow<S: ConfigStore> {
    reconciler: ConfigReconciler<S>,
    pairs: ActivePairs,
    /// Set when the active list changed and the scheduler has not seen it yet.
    pairing_changed: bool,
    watchers: FolderWatcherManager,
    scheduler: Scheduler,
    backend: Option<Box<dyn WallpaperBackend>>,
}

impl<S: ConfigStore> std::fmt::Debug for Slideshow<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slideshow")
            .field("pairs", &self.pairs)
            .field("watchers", &self.watchers)
            .field("scheduler", &self.scheduler)
            .field("backend", &self.backend.as_ref().map(|backend| backend.name()))
            .finish_non_exhaustive()
    }
}

impl<S: ConfigStore> Slideshow<S> {
    /// Creates a slideshow starting from a validated list.
    pub fn new(
        reconciler: ConfigReconciler<S>,
        pairs: ActivePairs,
        backend: Box<dyn WallpaperBackend>,
    ) -> Self {
        Self {
            reconciler,
            pairs,
            pairing_changed: false,
            watchers: FolderWatcherManager::new(),
            scheduler: Scheduler::new(),
            backend: Some(backend),
        }
    }

    /// Runs one tick at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TickFault::ApplierUnavailable`] when the wallpaper surface is
    /// missing or failed, and [`TickFault::Unclassified`] for anything else.
    pub fn tick(&mut self, now: Instant) -> Result<TickReport, TickFault> {
        if self.reconciler.poll(&mut self.pairs) {
            self.pairing_changed = true;
        }

        let backend = self.backend.as_deref().ok_or_else(|| {
            TickFault::ApplierUnavailable(BackendError::Unavailable("no wallpaper surface".to_string()))
        })?;

        let monitors = backend.monitors()?;

        let assigned: HashSet<PathBuf> =
            (0..monitors.len()).map(|position| self.pairs.assigned(position).folder.clone()).collect();
        self.watchers.reconcile(&assigned);
        let dirty = self.watchers.drain_dirty();

        let reloaded = self.scheduler.sync(&monitors, &self.pairs, self.pairing_changed, &dirty, now);
        self.pairing_changed = false;

        let mut report = self.scheduler.advance(now, backend)?;
        report.reloaded = reloaded;
        Ok(report)
    }

    /// Drops the current wallpaper surface; ticks fail until one is installed.
    pub fn release_backend(&mut self) { self.backend = None; }

    /// Installs a freshly acquired wallpaper surface. Scheduling state is kept.
    pub fn install_backend(&mut self, backend: Box<dyn WallpaperBackend>) {
        self.backend = Some(backend);
    }

    #[must_use]
    pub fn has_backend(&self) -> bool { self.backend.is_some() }

    /// Advisory memory reclamation.
    pub fn housekeeping(&mut self) { self.scheduler.compact(); }

    #[must_use]
    pub const fn pairs(&self) -> &ActivePairs { &self.pairs }

    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler { &self.scheduler }

    #[must_use]
    pub const fn watchers(&self) -> &FolderWatcherManager { &self.watchers }
}
