//! Qualifying images and folder listing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use natord::compare;

use crate::constants::images::IMAGE_EXTENSIONS;

/// Checks if a path has an image extension the slideshow rotates through.
///
/// The comparison is case-insensitive; the file itself is not inspected.
#[must_use]
pub fn is_qualifying_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Lists the qualifying images directly inside `dir`, in natural order.
///
/// Subdirectories are not descended into. Entries that cannot be read are
/// skipped.
///
/// # Errors
///
/// Returns an error if `dir` itself cannot be read.
pub fn list_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_qualifying_image(path))
        .collect();

    images.sort_by(|a, b| compare(a.to_string_lossy().as_ref(), b.to_string_lossy().as_ref()));
    Ok(images)
}
