//! Configuration template generation.
//!
//! Generates a commented configuration template describing every option.

use std::fs;
use std::path::Path;

/// Generates a configuration template with the folder list commented out.
///
/// The template parses as an empty configuration, so the daemon refuses to
/// start until at least one folder is configured.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// Wallslide Configuration File
// ============================
// This file uses JSONC format (JSON with comments).
// Changes are picked up by the running slideshow within a second; there is
// no need to restart it.

{
  // ============================================================================
  // Wallpaper Backend
  // ============================================================================
  // Which wallpaper surface to drive:
  //   "auto"    - pick the best backend for this system
  //   "macos"   - per-display wallpapers through AppKit (macOS only)
  //   "swww"    - per-output wallpapers through the swww daemon (Wayland)
  //   "desktop" - one wallpaper for the whole desktop (GNOME, KDE, XFCE, ...)
  // The backend is chosen when the slideshow starts.
  "backend": "auto",

  // ============================================================================
  // Monitors
  // ============================================================================
  // One entry per monitor, in the order the backend enumerates them.
  // Monitors beyond the end of this list use the first entry.
  //
  //   "folder" - directory with .jpg, .jpeg, .png or .bmp images
  //   "wait"   - seconds between changes (default 60, max 359999)
  "monitors": [
    // { "folder": "~/Pictures/Wallpapers", "wait": 300 },
    // { "folder": "~/Pictures/Portrait", "wait": 600 }
  ]
}
"##
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
