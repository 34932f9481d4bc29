//! Cache directory utilities.
//!
//! Provides a centralized way to get the application's cache directory.
//! Uses the platform cache directory (`~/Library/Caches/wallslide` on macOS,
//! `$XDG_CACHE_HOME/wallslide` elsewhere) with a fallback to
//! `/tmp/wallslide` if the cache directory is unavailable.

use std::path::PathBuf;

use crate::constants::APP_ID;

/// Returns the root cache directory for the application.
#[must_use]
pub fn get_cache_dir() -> PathBuf {
    dirs::cache_dir().map_or_else(|| PathBuf::from(format!("/tmp/{APP_ID}")), |cache| cache.join(APP_ID))
}
