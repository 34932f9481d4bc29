//! Path utilities for shell-like path expansion.
//!
//! Folder paths in the configuration file and on the command line may start
//! with `~`; they are expanded once, when read, so that every later
//! comparison between folders works on the same absolute form.

use std::path::PathBuf;

/// Expands shell-like paths (tilde) to absolute paths.
///
/// The path can be:
/// - Absolute (starts with `/`): returned as-is
/// - Home-relative (starts with `~`): expanded to the user's home directory
/// - Relative: returned as-is
///
/// Surrounding whitespace is trimmed; an empty input yields an empty path.
///
/// # Examples
///
/// ```
/// use wallslide_lib::platform::path::expand;
///
/// let pictures = expand("~/Pictures");
/// assert!(!pictures.to_string_lossy().starts_with('~'));
///
/// let absolute = expand("/usr/share/backgrounds");
/// assert_eq!(absolute.to_string_lossy(), "/usr/share/backgrounds");
/// ```
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}
