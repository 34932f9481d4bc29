//! Folder/wait persistence and the startup override.
//!
//! The slideshow loop only sees the [`ConfigStore`] contract: load the ordered
//! folder/wait list, save it back. The file-backed store keeps the rest of the
//! configuration document intact when the list is rewritten.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{
    ConfigError, FolderWait, WallslideConfig, load_config_from_path, write_config_to_path,
};
use crate::platform::path::expand;

/// Reads and writes the ordered folder/wait list.
pub trait ConfigStore: Send {
    /// Loads the ordered folder/wait list.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing document exists but cannot be read or parsed.
    fn load(&self) -> Result<Vec<FolderWait>, ConfigError>;

    /// Replaces the stored list with `pairs`, index for index.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing document cannot be written.
    fn save(&self, pairs: &[FolderWait]) -> Result<(), ConfigError>;
}

/// Config store backed by the JSONC configuration file.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Creates a store reading and writing `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self { Self { path } }

    /// Returns the file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    /// Loads the whole configuration document.
    ///
    /// A missing file yields the default (empty) document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_document(&self) -> Result<WallslideConfig, ConfigError> {
        match load_config_from_path(&self.path) {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound) => Ok(WallslideConfig::default()),
            Err(err) => Err(err),
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Vec<FolderWait>, ConfigError> {
        let config = self.load_document()?;
        Ok(config
            .monitors
            .into_iter()
            .map(|pair| FolderWait {
                folder: expand(&pair.folder.to_string_lossy()),
                ..pair
            })
            .collect())
    }

    fn save(&self, pairs: &[FolderWait]) -> Result<(), ConfigError> {
        // An unreadable document is replaced rather than left broken
        let mut config = self.load_document().unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), error = %err, "rewriting unreadable configuration");
            WallslideConfig::default()
        });
        config.monitors = pairs.iter().cloned().map(FolderWait::clamped).collect();
        write_config_to_path(&self.path, &config)?;

        tracing::debug!(
            path = %self.path.display(),
            count = pairs.len(),
            "saved folder/wait configuration"
        );
        Ok(())
    }
}

/// Errors in folder/wait arguments supplied on the command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Arguments must come in folder/seconds pairs.
    #[error("Expected folder/seconds pairs, got {0} argument(s)")]
    UnpairedArguments(usize),
    /// The folder does not exist.
    #[error("Folder does not exist: {}", .0.display())]
    FolderNotFound(PathBuf),
    /// The wait is not a positive integer.
    #[error("Invalid wait time: {0}")]
    InvalidWait(String),
}

/// Parses command-line `FOLDER SECONDS` pairs.
///
/// Every folder must exist and every wait must be a positive integer. The
/// first invalid argument aborts parsing.
///
/// # Errors
///
/// Returns a `ValidationError` naming the first offending argument.
pub fn parse_override_args<S: AsRef<str>>(args: &[S]) -> Result<Vec<FolderWait>, ValidationError> {
    if args.len() % 2 != 0 {
        return Err(ValidationError::UnpairedArguments(args.len()));
    }

    args.chunks_exact(2)
        .map(|chunk| {
            let folder = expand(chunk[0].as_ref());
            if !folder.is_dir() {
                return Err(ValidationError::FolderNotFound(PathBuf::from(chunk[0].as_ref())));
            }

            let raw_wait = chunk[1].as_ref();
            let wait = raw_wait
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|w| *w > 0)
                .ok_or_else(|| ValidationError::InvalidWait(raw_wait.to_string()))?;

            Ok(FolderWait::new(folder, wait))
        })
        .collect()
}

/// Applies `overrides` on top of `stored` by position.
///
/// Override `i` replaces stored record `i`; overrides beyond the stored
/// length are appended.
#[must_use]
pub fn merge_override(stored: Vec<FolderWait>, overrides: &[FolderWait]) -> Vec<FolderWait> {
    let mut merged = stored;
    for (index, pair) in overrides.iter().enumerate() {
        if let Some(slot) = merged.get_mut(index) {
            *slot = pair.clone();
        } else {
            merged.push(pair.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn store_in(dir: &Path) -> FileConfigStore { FileConfigStore::new(dir.join("config.jsonc")) }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let pairs = vec![FolderWait::new("/a", 10), FolderWait::new("/b", 20)];

        store.save(&pairs).unwrap();
        assert_eq!(store.load().unwrap(), pairs);
    }

    #[test]
    fn test_save_preserves_backend_setting() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), r#"{ "backend": "desktop", "monitors": [] }"#).unwrap();

        store.save(&[FolderWait::new("/a", 10)]).unwrap();

        let document = store.load_document().unwrap();
        assert_eq!(document.backend, crate::wallpaper::BackendKind::Desktop);
        assert_eq!(document.monitors.len(), 1);
    }

    #[test]
    fn test_save_clamps_waits() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store.save(&[FolderWait::new("/a", 0), FolderWait::new("/b", 999_999)]).unwrap();

        let waits: Vec<_> = store.load().unwrap().iter().map(|p| p.wait).collect();
        assert_eq!(waits, vec![60, 359_999]);
    }

    #[test]
    fn test_load_expands_tilde() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), r#"{ "monitors": [ { "folder": "~/Pictures" } ] }"#).unwrap();

        let pairs = store.load().unwrap();
        assert!(!pairs[0].folder.to_string_lossy().starts_with('~'));
        assert!(pairs[0].folder.ends_with("Pictures"));
    }

    #[test]
    fn test_load_surfaces_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), "{ broken").unwrap();

        assert!(matches!(store.load(), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_save_replaces_unreadable_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), "{ broken").unwrap();

        store.save(&[FolderWait::new("/pics", 30)]).unwrap();

        let document = store.load_document().unwrap();
        assert_eq!(document, WallslideConfig {
            monitors: vec![FolderWait::new("/pics", 30)],
            ..Default::default()
        });
    }

    #[test]
    fn test_parse_override_args_accepts_pairs() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let args = vec![
            a.path().to_string_lossy().to_string(),
            "10".to_string(),
            b.path().to_string_lossy().to_string(),
            "20".to_string(),
        ];

        let pairs = parse_override_args(&args).unwrap();
        assert_eq!(pairs, vec![FolderWait::new(a.path(), 10), FolderWait::new(b.path(), 20)]);
    }

    #[test]
    fn test_parse_override_args_rejects_odd_count() {
        let result = parse_override_args(&["/tmp"]);
        assert_eq!(result, Err(ValidationError::UnpairedArguments(1)));
    }

    #[test]
    fn test_parse_override_args_rejects_missing_folder() {
        let result = parse_override_args(&["/definitely/not/here/wallslide", "10"]);
        assert!(matches!(result, Err(ValidationError::FolderNotFound(_))));
    }

    #[test]
    fn test_parse_override_args_rejects_bad_waits() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().to_string();

        for bad in ["0", "-5", "ten", "1.5", ""] {
            let result = parse_override_args(&[folder.as_str(), bad]);
            assert_eq!(result, Err(ValidationError::InvalidWait(bad.to_string())), "wait {bad:?}");
        }
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::FolderNotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Folder does not exist: /missing");
    }

    #[test]
    fn test_merge_override_replaces_by_position() {
        let stored = vec![FolderWait::new("/a", 10), FolderWait::new("/b", 20)];
        let merged = merge_override(stored, &[FolderWait::new("/x", 5)]);
        assert_eq!(merged, vec![FolderWait::new("/x", 5), FolderWait::new("/b", 20)]);
    }

    #[test]
    fn test_merge_override_appends_beyond_range() {
        let stored = vec![FolderWait::new("/a", 10)];
        let overrides = [FolderWait::new("/x", 5), FolderWait::new("/y", 6), FolderWait::new("/z", 7)];
        let merged = merge_override(stored, &overrides);
        assert_eq!(merged, overrides.to_vec());
    }

    #[test]
    fn test_merge_override_with_no_overrides_is_identity() {
        let stored = vec![FolderWait::new("/a", 10)];
        assert_eq!(merge_override(stored.clone(), &[]), stored);
    }
}
