//! Per-monitor scheduling state.
//!
//! Each enumerated monitor is Uninitialized (no entry), Ready (an entry in
//! the state store) or Destroyed (entry dropped because the monitor vanished).
//! The scheduler is the only owner of this state; everything else talks to
//! it through [`Scheduler::sync`] and [`Scheduler::advance`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::images::list_images;
use super::pairs::ActivePairs;
use crate::wallpaper::{BackendError, MonitorId, WallpaperBackend};

/// Scheduling state of one Ready monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    images: Vec<PathBuf>,
    index: usize,
    wait: Duration,
    folder: PathBuf,
    next_change: Option<Instant>,
}

impl MonitorState {
    /// Fresh state after (re)loading `folder`: index 0, due immediately.
    ///
    /// A folder without images has no deadline until a later reload finds some.
    fn loaded(folder: &Path, wait: Duration, images: Vec<PathBuf>, now: Instant) -> Self {
        let next_change = (!images.is_empty()).then_some(now);
        Self { images, index: 0, wait, folder: folder.to_path_buf(), next_change }
    }

    /// Returns `true` when a change is due at `now`.
    fn is_due(&self, now: Instant) -> bool {
        !self.images.is_empty() && self.next_change.is_some_and(|deadline| now >= deadline)
    }

    fn advance(&mut self, now: Instant) {
        self.index = (self.index + 1) % self.images.len();
        self.next_change = Some(now + self.wait);
    }

    #[must_use]
    pub fn images(&self) -> &[PathBuf] { &self.images }

    #[must_use]
    pub const fn index(&self) -> usize { self.index }

    #[must_use]
    pub const fn wait(&self) -> Duration { self.wait }

    #[must_use]
    pub fn folder(&self) -> &Path { &self.folder }

    #[must_use]
    pub const fn next_change(&self) -> Option<Instant> { self.next_change }
}

/// What happened to the monitors during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Monitors whose state was (re)loaded.
    pub reloaded: Vec<MonitorId>,
    /// Wallpapers that were set.
    pub applied: Vec<(MonitorId, PathBuf)>,
    /// Monitors whose current image vanished from disk; they still advanced.
    pub skipped: Vec<MonitorId>,
    /// Monitors whose wallpaper could not be set; they still advanced.
    pub failed: Vec<MonitorId>,
}

/// Owns the state of every Ready monitor.
#[derive(Debug, Default)]
pub struct Scheduler {
    monitors: HashMap<MonitorId, MonitorState>,
    /// Enumeration order of the last sync.
    order: Vec<MonitorId>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Brings the state store in line with the current enumeration.
    ///
    /// Monitors that vanished are destroyed. A monitor is (re)loaded when it
    /// is new, when `pairing_changed` is set, when its assigned folder is in
    /// `dirty`, or when its position now maps to a different pair. A reload
    /// whose folder cannot be listed leaves the previous state in place.
    ///
    /// Returns the monitors that were reloaded.
    pub fn sync(
        &mut self,
        monitors: &[MonitorId],
        pairs: &ActivePairs,
        pairing_changed: bool,
        dirty: &HashSet<PathBuf>,
        now: Instant,
    ) -> Vec<MonitorId> {
        self.monitors.retain(|id, _| {
            let present = monitors.contains(id);
            if !present {
                tracing::debug!(monitor = %id, "monitor disappeared");
            }
            present
        });
        monitors.clone_into(&mut self.order);

        let mut reloaded = Vec::new();
        for (position, id) in monitors.iter().enumerate() {
            let pair = pairs.assigned(position);
            let wait = pair.wait_duration();

            let needs_reload = pairing_changed
                || dirty.contains(&pair.folder)
                || self
                    .monitors
                    .get(id)
                    .is_none_or(|state| state.folder != pair.folder || state.wait != wait);

            if !needs_reload {
                continue;
            }

            match list_images(&pair.folder) {
                Ok(images) => {
                    tracing::debug!(
                        monitor = %id,
                        folder = %pair.folder.display(),
                        images = images.len(),
                        "loaded monitor folder"
                    );
                    self.monitors.insert(id.clone(), MonitorState::loaded(&pair.folder, wait, images, now));
                    reloaded.push(id.clone());
                }
                Err(err) => {
                    tracing::warn!(
                        monitor = %id,
                        folder = %pair.folder.display(),
                        error = %err,
                        "failed to list folder"
                    );
                }
            }
        }

        reloaded
    }

    /// Applies the due image of every monitor, in enumeration order.
    ///
    /// A monitor whose image no longer exists, or whose apply fails for a
    /// reason other than the surface itself, still advances.
    ///
    /// # Errors
    ///
    /// Returns a surface fault as soon as one occurs. The faulting monitor
    /// does not advance; monitors handled before it keep their new state.
    pub fn advance(
        &mut self,
        now: Instant,
        backend: &dyn WallpaperBackend,
    ) -> Result<TickReport, BackendError> {
        let mut report = TickReport::default();

        for id in &self.order {
            let Some(state) = self.monitors.get_mut(id) else {
                continue;
            };
            if !state.is_due(now) {
                continue;
            }

            let image = &state.images[state.index];
            if image.exists() {
                match backend.set_wallpaper(id, image) {
                    Ok(()) => report.applied.push((id.clone(), image.clone())),
                    Err(err) if err.is_surface_fault() => return Err(err),
                    Err(err) => {
                        tracing::warn!(monitor = %id, image = %image.display(), error = %err, "failed to set wallpaper");
                        report.failed.push(id.clone());
                    }
                }
            } else {
                tracing::debug!(monitor = %id, image = %image.display(), "image vanished, skipping");
                report.skipped.push(id.clone());
            }

            state.advance(now);
        }

        Ok(report)
    }

    /// Releases spare capacity held by the state store.
    pub fn compact(&mut self) {
        self.monitors.shrink_to_fit();
        self.order.shrink_to_fit();
        for state in self.monitors.values_mut() {
            state.images.shrink_to_fit();
        }
    }

    #[must_use]
    pub fn state(&self, monitor: &MonitorId) -> Option<&MonitorState> { self.monitors.get(monitor) }

    /// Number of Ready monitors.
    #[must_use]
    pub fn len(&self) -> usize { self.monitors.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.monitors.is_empty() }
}
