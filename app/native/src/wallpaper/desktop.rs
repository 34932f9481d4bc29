//! Whole-desktop wallpaper backend.
//!
//! Delegates to the `wallpaper` crate, which knows how to talk to GNOME,
//! KDE, XFCE, Cinnamon, MATE, LXDE and a handful of X11 tools. These
//! desktops expose a single wallpaper, so the backend reports one monitor.

use std::path::Path;

use super::{BackendError, MonitorId, WallpaperBackend};

/// Identifier of the single monitor reported by this backend.
const DESKTOP_MONITOR: &str = "desktop";

/// One wallpaper for the whole desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopBackend;

impl DesktopBackend {
    #[must_use]
    pub const fn new() -> Self { Self }
}

impl WallpaperBackend for DesktopBackend {
    fn name(&self) -> &'static str { "desktop" }

    fn monitors(&self) -> Result<Vec<MonitorId>, BackendError> {
        Ok(vec![MonitorId::new(DESKTOP_MONITOR)])
    }

    fn set_fill_mode(&self) -> Result<(), BackendError> {
        wallpaper::set_mode(wallpaper::Mode::Crop)
            .map_err(|err| BackendError::Unsupported(format!("fill mode: {err}")))
    }

    fn set_wallpaper(&self, monitor: &MonitorId, image: &Path) -> Result<(), BackendError> {
        if monitor.as_str() != DESKTOP_MONITOR {
            return Err(BackendError::MonitorNotFound(monitor.clone()));
        }

        let path = image.to_str().ok_or_else(|| BackendError::SetFailed {
            monitor: monitor.clone(),
            reason: format!("path is not valid UTF-8: {}", image.display()),
        })?;

        wallpaper::set_from_path(path).map_err(|err| BackendError::SetFailed {
            monitor: monitor.clone(),
            reason: err.to_string(),
        })
    }
}
