//! In-memory doubles for the wallpaper surface and the config store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{ConfigError, ConfigStore, FolderWait};
use crate::wallpaper::{BackendError, MonitorId, WallpaperBackend};

#[derive(Debug, Default)]
struct FakeState {
    monitors: Vec<MonitorId>,
    applied: Vec<(MonitorId, PathBuf)>,
    fill_mode_calls: usize,
    /// One-shot faults for `set_wallpaper`; `None` matches any monitor.
    set_faults: Vec<(Option<MonitorId>, BackendError)>,
    monitors_fault: Option<BackendError>,
}

/// Deterministic wallpaper surface. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new(monitors: &[&str]) -> Self {
        let backend = Self::default();
        backend.set_monitors(monitors);
        backend
    }

    pub fn set_monitors(&self, monitors: &[&str]) {
        self.state.lock().monitors = monitors.iter().map(|id| MonitorId::new(*id)).collect();
    }

    pub fn applied(&self) -> Vec<(MonitorId, PathBuf)> { self.state.lock().applied.clone() }

    pub fn fill_mode_calls(&self) -> usize { self.state.lock().fill_mode_calls }

    /// The next `set_wallpaper` call fails with `err`.
    pub fn fail_next_set(&self, err: BackendError) { self.state.lock().set_faults.push((None, err)); }

    /// The next `set_wallpaper` call for `monitor` fails with `err`.
    pub fn fail_set_on(&self, monitor: &MonitorId, err: BackendError) {
        self.state.lock().set_faults.push((Some(monitor.clone()), err));
    }

    /// The next `monitors` call fails with `err`.
    pub fn fail_next_enumeration(&self, err: BackendError) {
        self.state.lock().monitors_fault = Some(err);
    }
}

impl WallpaperBackend for FakeBackend {
    fn name(&self) -> &'static str { "fake" }

    fn monitors(&self) -> Result<Vec<MonitorId>, BackendError> {
        let mut state = self.state.lock();
        match state.monitors_fault.take() {
            Some(err) => Err(err),
            None => Ok(state.monitors.clone()),
        }
    }

    fn set_fill_mode(&self) -> Result<(), BackendError> {
        self.state.lock().fill_mode_calls += 1;
        Ok(())
    }

    fn set_wallpaper(&self, monitor: &MonitorId, image: &Path) -> Result<(), BackendError> {
        let mut state = self.state.lock();

        let fault = state
            .set_faults
            .iter()
            .position(|(target, _)| target.as_ref().is_none_or(|target| target == monitor));
        if let Some(position) = fault {
            return Err(state.set_faults.remove(position).1);
        }

        state.applied.push((monitor.clone(), image.to_path_buf()));
        Ok(())
    }
}

/// Config store holding the list in memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    pairs: Arc<Mutex<Vec<FolderWait>>>,
    fail_loads: Arc<Mutex<bool>>,
}

impl MemoryConfigStore {
    pub fn new(pairs: Vec<FolderWait>) -> Self {
        Self { pairs: Arc::new(Mutex::new(pairs)), fail_loads: Arc::default() }
    }

    pub fn set(&self, pairs: Vec<FolderWait>) { *self.pairs.lock() = pairs; }

    pub fn get(&self) -> Vec<FolderWait> { self.pairs.lock().clone() }

    pub fn set_failing(&self, failing: bool) { *self.fail_loads.lock() = failing; }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Vec<FolderWait>, ConfigError> {
        if *self.fail_loads.lock() {
            return Err(ConfigError::IoError(std::io::Error::other("store unavailable")));
        }
        Ok(self.pairs.lock().clone())
    }

    fn save(&self, pairs: &[FolderWait]) -> Result<(), ConfigError> {
        *self.pairs.lock() = pairs.to_vec();
        Ok(())
    }
}
