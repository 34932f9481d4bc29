//! Folder content watching.
//!
//! One `notify` watch exists per folder currently assigned to a monitor.
//! Watch callbacks run on notify's own threads; the only thing they touch is
//! the shared [`DirtyFolders`] set, which the tick loop drains.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;

use super::images::is_qualifying_image;

/// Folders whose image set changed since the last drain.
#[derive(Debug, Clone, Default)]
pub struct DirtyFolders(Arc<Mutex<HashSet<PathBuf>>>);

impl DirtyFolders {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn mark(&self, folder: &Path) { self.0.lock().insert(folder.to_path_buf()); }

    /// Takes every flagged folder, leaving the set empty.
    #[must_use]
    pub fn drain(&self) -> HashSet<PathBuf> { std::mem::take(&mut *self.0.lock()) }
}

/// Returns `true` if `event` created, removed, modified or renamed an image.
///
/// Renames carry both the old and the new name; either one qualifying counts.
#[must_use]
pub fn event_touches_image(event: &Event) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(_) | EventKind::Any
    );
    relevant && event.paths.iter().any(|path| is_qualifying_image(path))
}

/// Owns one watch per assigned folder.
pub struct FolderWatcherManager {
    watchers: HashMap<PathBuf, RecommendedWatcher>,
    /// Folders whose watch could not be created. They are not retried until
    /// they leave the assigned set and come back.
    failed: HashSet<PathBuf>,
    dirty: DirtyFolders,
}

impl std::fmt::Debug for FolderWatcherManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderWatcherManager")
            .field("watched", &self.watchers.keys().collect::<Vec<_>>())
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl Default for FolderWatcherManager {
    fn default() -> Self { Self::new() }
}

impl FolderWatcherManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            watchers: HashMap::new(),
            failed: HashSet::new(),
            dirty: DirtyFolders::new(),
        }
    }

    /// Makes the watch set equal to `assigned`.
    ///
    /// Watches for folders no longer assigned are released; folders newly
    /// assigned get a watch. A folder whose watch creation fails is skipped
    /// until it is unassigned and assigned again.
    pub fn reconcile(&mut self, assigned: &HashSet<PathBuf>) {
        self.watchers.retain(|folder, _| {
            let keep = assigned.contains(folder);
            if !keep {
                tracing::debug!(folder = %folder.display(), "stopped watching folder");
            }
            keep
        });
        self.failed.retain(|folder| assigned.contains(folder));

        for folder in assigned {
            if self.watchers.contains_key(folder) || self.failed.contains(folder) {
                continue;
            }

            match self.create_watch(folder) {
                Ok(watcher) => {
                    tracing::debug!(folder = %folder.display(), "watching folder");
                    self.watchers.insert(folder.clone(), watcher);
                }
                Err(err) => {
                    tracing::warn!(folder = %folder.display(), error = %err, "failed to watch folder");
                    self.failed.insert(folder.clone());
                }
            }
        }
    }

    fn create_watch(&self, folder: &Path) -> notify::Result<RecommendedWatcher> {
        let dirty = self.dirty.clone();
        let configured = folder.to_path_buf();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) if event_touches_image(&event) => dirty.mark(&configured),
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(folder = %configured.display(), error = %err, "folder watch error");
                }
            }
        })?;

        watcher.watch(folder, RecursiveMode::NonRecursive)?;
        Ok(watcher)
    }

    /// Takes the folders flagged since the last drain.
    #[must_use]
    pub fn drain_dirty(&self) -> HashSet<PathBuf> { self.dirty.drain() }

    #[must_use]
    pub fn is_watching(&self, folder: &Path) -> bool { self.watchers.contains_key(folder) }

    #[must_use]
    pub fn has_failed(&self, folder: &Path) -> bool { self.failed.contains(folder) }

    /// Number of live watches.
    #[must_use]
    pub fn len(&self) -> usize { self.watchers.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.watchers.is_empty() }
}
