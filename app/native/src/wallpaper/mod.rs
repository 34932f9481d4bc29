//! Wallpaper surfaces.
//!
//! A [`WallpaperBackend`] is the thin adapter between the slideshow and the
//! operating system's wallpaper facility: it enumerates monitors in a stable
//! order, puts the surface into fill mode and sets one image on one monitor.
//!
//! Three backends exist:
//! - `macos`: per-display wallpapers through `NSWorkspace` (macOS only)
//! - `swww`: per-output wallpapers through the `swww` Wayland daemon
//! - `desktop`: a single wallpaper for the whole desktop via the `wallpaper` crate

mod desktop;
#[cfg(target_os = "macos")]
mod macos;
mod swww;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use desktop::DesktopBackend;
#[cfg(target_os = "macos")]
pub use macos::MacOsBackend;
pub use swww::SwwwBackend;

use crate::platform::process::resolve_binary;

/// Opaque, stable identifier of one monitor as reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonitorId(String);

impl MonitorId {
    /// Creates an identifier from its backend-specific string form.
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    /// Returns the backend-specific string form.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Errors reported by wallpaper backends.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The wallpaper surface itself is gone or cannot be reached.
    #[error("wallpaper surface unavailable: {0}")]
    Unavailable(String),
    /// The monitor is no longer known to the backend.
    #[error("monitor not found: {0}")]
    MonitorNotFound(MonitorId),
    /// Setting one image on one monitor failed.
    #[error("failed to set wallpaper on {monitor}: {reason}")]
    SetFailed { monitor: MonitorId, reason: String },
    /// The backend cannot perform the operation on this system.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl BackendError {
    /// Returns `true` when the error means the surface has to be re-acquired.
    #[must_use]
    pub const fn is_surface_fault(&self) -> bool { matches!(self, Self::Unavailable(_)) }
}

/// The wallpaper adapter used by the slideshow.
pub trait WallpaperBackend {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Enumerates monitors in the backend's stable order.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] when the surface cannot be reached.
    fn monitors(&self) -> Result<Vec<MonitorId>, BackendError>;

    /// Sets the surface's positioning to fill (scale to cover, crop excess).
    ///
    /// # Errors
    ///
    /// Returns an error when the positioning cannot be changed.
    fn set_fill_mode(&self) -> Result<(), BackendError>;

    /// Sets `image` as the wallpaper of `monitor`.
    ///
    /// # Errors
    ///
    /// Returns an error when the wallpaper cannot be set.
    fn set_wallpaper(&self, monitor: &MonitorId, image: &Path) -> Result<(), BackendError>;
}

/// Which backend to acquire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Pick the best backend for this system.
    #[default]
    Auto,
    /// `NSWorkspace` per-display wallpapers.
    #[value(name = "macos")]
    MacOS,
    /// The `swww` Wayland daemon.
    Swww,
    /// One wallpaper for the whole desktop.
    Desktop,
}

impl BackendKind {
    /// Resolves `Auto` to a concrete backend for the running system.
    #[must_use]
    pub fn resolve(self) -> Self {
        if self != Self::Auto {
            return self;
        }

        if cfg!(target_os = "macos") {
            Self::MacOS
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() && resolve_binary("swww").is_ok() {
            Self::Swww
        } else {
            Self::Desktop
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::MacOS => "macos",
            Self::Swww => "swww",
            Self::Desktop => "desktop",
        };
        f.write_str(name)
    }
}

/// Acquires a handle to the wallpaper surface.
///
/// # Errors
///
/// Returns [`BackendError::Unavailable`] when the surface cannot be reached
/// and [`BackendError::Unsupported`] when the backend does not exist on this
/// system.
pub fn acquire(kind: BackendKind) -> Result<Box<dyn WallpaperBackend>, BackendError> {
    let kind = kind.resolve();
    tracing::debug!(backend = %kind, "acquiring wallpaper surface");

    match kind {
        #[cfg(target_os = "macos")]
        BackendKind::MacOS => Ok(Box::new(MacOsBackend::connect()?)),
        #[cfg(not(target_os = "macos"))]
        BackendKind::MacOS => Err(BackendError::Unsupported(
            "the macos backend is only available on macOS".to_string(),
        )),
        BackendKind::Swww => Ok(Box::new(SwwwBackend::connect()?)),
        BackendKind::Desktop | BackendKind::Auto => Ok(Box::new(DesktopBackend::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_id_display() {
        assert_eq!(MonitorId::new("eDP-1").to_string(), "eDP-1");
        assert_eq!(MonitorId::new("eDP-1").as_str(), "eDP-1");
    }

    #[test]
    fn test_only_unavailable_is_surface_fault() {
        assert!(BackendError::Unavailable("gone".to_string()).is_surface_fault());
        assert!(!BackendError::MonitorNotFound(MonitorId::new("1")).is_surface_fault());
        assert!(
            !BackendError::SetFailed { monitor: MonitorId::new("1"), reason: "x".to_string() }
                .is_surface_fault()
        );
        assert!(!BackendError::Unsupported("x".to_string()).is_surface_fault());
    }

    #[test]
    fn test_backend_kind_serialization() {
        assert_eq!(serde_json::to_string(&BackendKind::MacOS).unwrap(), r#""macos""#);
        assert_eq!(serde_json::to_string(&BackendKind::Auto).unwrap(), r#""auto""#);

        let kind: BackendKind = serde_json::from_str(r#""swww""#).unwrap();
        assert_eq!(kind, BackendKind::Swww);
    }

    #[test]
    fn test_backend_kind_resolve_keeps_explicit_choice() {
        assert_eq!(BackendKind::Desktop.resolve(), BackendKind::Desktop);
        assert_eq!(BackendKind::Swww.resolve(), BackendKind::Swww);
    }

    #[test]
    fn test_backend_kind_resolve_auto_is_concrete() {
        assert_ne!(BackendKind::Auto.resolve(), BackendKind::Auto);
    }

    #[test]
    fn test_backend_kind_display_matches_serde_name() {
        for kind in [BackendKind::Auto, BackendKind::MacOS, BackendKind::Swww, BackendKind::Desktop] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{kind}\""));
        }
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_acquire_macos_is_unsupported_elsewhere() {
        assert!(matches!(acquire(BackendKind::MacOS), Err(BackendError::Unsupported(_))));
    }
}
