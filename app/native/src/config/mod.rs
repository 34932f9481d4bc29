//! Configuration module for Wallslide.
//!
//! This module provides the configuration types, the file-backed folder/wait
//! store consumed by the slideshow loop, and the template used by
//! `wallslide config init`.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod store;
pub mod template;
pub mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use store::{
    ConfigStore, FileConfigStore, ValidationError, merge_override, parse_override_args,
};
pub use types::{
    ConfigError, DEFAULT_WAIT_SECONDS, FolderWait, MAX_WAIT_SECONDS, WallslideConfig,
    config_paths, load_config_from_path, write_config_to_path,
};

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// This must be called before `config_path()` or `default_store()` to take effect.
///
/// # Returns
///
/// `true` if the path was set successfully, `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Returns the configuration file the store reads and writes.
///
/// Resolution order: the `--config` override, the first search path that
/// exists, then the preferred search path (where a new file will be created).
#[must_use]
pub fn config_path() -> PathBuf {
    if let Some(path) = CUSTOM_CONFIG_PATH.get() {
        return path.clone();
    }

    let paths = config_paths();
    paths
        .iter()
        .find(|path| path.exists())
        .or_else(|| paths.first())
        .cloned()
        .unwrap_or_else(|| PathBuf::from("config.jsonc"))
}

/// Returns a store bound to the resolved configuration file.
#[must_use]
pub fn default_store() -> FileConfigStore { FileConfigStore::new(config_path()) }

/// Loads the ordered folder/wait list from the resolved configuration file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_pairs() -> Result<Vec<FolderWait>, ConfigError> { default_store().load() }

/// Overwrites the ordered folder/wait list in the resolved configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_pairs(pairs: &[FolderWait]) -> Result<(), ConfigError> { default_store().save(pairs) }
