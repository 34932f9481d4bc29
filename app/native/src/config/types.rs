//! Configuration types for Wallslide.
//!
//! The configuration file holds an ordered list of folder/wait records. Record
//! `i` is the slideshow for the monitor at enumeration position `i`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::wallpaper::BackendKind;

/// Wait used when a record omits `wait`.
pub const DEFAULT_WAIT_SECONDS: u32 = 60;

/// Largest wait the config writer accepts (99:59:59).
pub const MAX_WAIT_SECONDS: u32 = 359_999;

const fn default_wait() -> u32 { DEFAULT_WAIT_SECONDS }

/// One monitor's image folder and rotation interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderWait {
    /// Directory the images are taken from.
    pub folder: PathBuf,
    /// Seconds between wallpaper changes.
    #[serde(default = "default_wait")]
    pub wait: u32,
}

impl FolderWait {
    /// Creates a new folder/wait pair.
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>, wait: u32) -> Self {
        Self { folder: folder.into(), wait }
    }

    /// Returns the wait as a `Duration`.
    #[must_use]
    pub const fn wait_duration(&self) -> Duration { Duration::from_secs(self.wait as u64) }

    /// Returns the pair with the wait brought into the range the writer stores.
    ///
    /// A zero wait falls back to the default and anything above
    /// [`MAX_WAIT_SECONDS`] is capped.
    #[must_use]
    pub fn clamped(self) -> Self {
        let wait = match self.wait {
            0 => DEFAULT_WAIT_SECONDS,
            w => w.min(MAX_WAIT_SECONDS),
        };
        Self { wait, ..self }
    }
}

/// Root of the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WallslideConfig {
    /// Which wallpaper surface to drive.
    pub backend: BackendKind,
    /// Folder/wait records, indexed by monitor position.
    pub monitors: Vec<FolderWait>,
}

/// Errors that can occur when loading or writing the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file could not be read or written.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at ~/.config/wallslide/config.jsonc \
                or ~/.wallslide.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to access configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

impl From<tempfile::PersistError> for ConfigError {
    fn from(err: tempfile::PersistError) -> Self { Self::IoError(err.error) }
}

/// Application directory name under the config roots.
const APP_DIR_NAME: &str = "wallslide";

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".wallslide.jsonc", ".wallslide.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/wallslide/config.jsonc` or `config.json` (if set)
/// 2. `~/.config/wallslide/config.jsonc` or `config.json`
/// 3. The platform config directory (`~/Library/Application Support` on macOS)
/// 4. `~/.wallslide.jsonc` or `~/.wallslide.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let app_dir = PathBuf::from(xdg_config).join(APP_DIR_NAME);
        for filename in CONFIG_FILE_NAMES {
            paths.push(app_dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let app_dir = home.join(".config").join(APP_DIR_NAME);
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            // XDG_CONFIG_HOME might already be ~/.config
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join(APP_DIR_NAME);
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, `IoError` if it
/// cannot be read and `ParseError` if it is not valid JSONC.
pub fn load_config_from_path(path: &Path) -> Result<WallslideConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Writes the configuration to `path`, replacing the file atomically.
///
/// The document is serialized to a temporary file in the same directory and
/// then renamed over the target, so a concurrent reader sees either the old
/// or the new document. An existing symlink is followed and its target is
/// replaced, leaving the link in place.
///
/// # Errors
///
/// Returns `ConfigError::IoError` if the directory cannot be created or the
/// file cannot be written.
pub fn write_config_to_path(path: &Path, config: &WallslideConfig) -> Result<(), ConfigError> {
    let resolved = if path.exists() { fs::canonicalize(path)? } else { path.to_path_buf() };
    let path = resolved.as_path();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let mut file = tempfile::NamedTempFile::new_in(&dir)?;
    serde_json::to_writer_pretty(&mut file, config)?;
    writeln!(file)?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = WallslideConfig::default();
        assert!(config.monitors.is_empty());
        assert_eq!(config.backend, BackendKind::Auto);
    }

    #[test]
    fn test_missing_wait_defaults_to_sixty_seconds() {
        let json = r#"{ "monitors": [ { "folder": "/pictures" } ] }"#;
        let config: WallslideConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.monitors, vec![FolderWait::new("/pictures", 60)]);
    }

    #[test]
    fn test_records_keep_their_order() {
        let json = r#"{
            "monitors": [
                { "folder": "/a", "wait": 10 },
                { "folder": "/b", "wait": 20 },
                { "folder": "/c", "wait": 30 }
            ]
        }"#;
        let config: WallslideConfig = serde_json::from_str(json).unwrap();
        let folders: Vec<_> = config.monitors.iter().map(|p| p.folder.clone()).collect();
        assert_eq!(folders, vec![PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]);
    }

    #[test]
    fn test_backend_is_parsed() {
        let json = r#"{ "backend": "swww" }"#;
        let config: WallslideConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.backend, BackendKind::Swww);
    }

    #[test]
    fn test_clamped_replaces_zero_wait_with_default() {
        let pair = FolderWait::new("/a", 0).clamped();
        assert_eq!(pair.wait, DEFAULT_WAIT_SECONDS);
    }

    #[test]
    fn test_clamped_caps_wait() {
        let pair = FolderWait::new("/a", 400_000).clamped();
        assert_eq!(pair.wait, MAX_WAIT_SECONDS);

        let pair = FolderWait::new("/a", 5).clamped();
        assert_eq!(pair.wait, 5);
    }

    #[test]
    fn test_wait_duration() {
        assert_eq!(FolderWait::new("/a", 90).wait_duration(), Duration::from_secs(90));
    }

    #[test]
    fn test_config_paths_end_with_home_files() {
        let paths = config_paths();
        if dirs::home_dir().is_some() {
            let last = paths.last().unwrap();
            assert!(last.to_string_lossy().ends_with(".wallslide.json"));
        }
    }

    #[test]
    fn test_load_config_from_path_strips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        fs::write(
            &path,
            r#"{
                // primary display
                "monitors": [ { "folder": "/a", "wait": 15 } ] /* trailing */
            }"#,
        )
        .unwrap();

        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.monitors, vec![FolderWait::new("/a", 15)]);
    }

    #[test]
    fn test_load_config_from_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from_path(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_config_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load_config_from_path(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_write_config_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = WallslideConfig {
            monitors: vec![FolderWait::new("/a", 10)],
            ..Default::default()
        };

        write_config_to_path(&path, &config).unwrap();
        assert_eq!(load_config_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_write_config_keeps_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("dotfiles").join("config.jsonc");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "{}").unwrap();
        let link = dir.path().join("config.jsonc");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let config = WallslideConfig {
            monitors: vec![FolderWait::new("/a", 10)],
            ..Default::default()
        };
        write_config_to_path(&link, &config).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(load_config_from_path(&target).unwrap(), config);
    }

    #[test]
    fn test_config_error_display() {
        let msg = ConfigError::NotFound.to_string();
        assert!(msg.contains("No configuration file found"));
    }
}
