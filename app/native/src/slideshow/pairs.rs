//! The active folder/wait list and the monitor assignment rule.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::FolderWait;

/// Why a folder/wait list cannot become active.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigRejection {
    #[error("no folders are configured")]
    Empty,
    #[error("a configured folder is blank")]
    BlankFolder,
    #[error("folder does not exist: {}", .0.display())]
    MissingFolder(PathBuf),
    #[error("wait for {} must be positive", .0.display())]
    ZeroWait(PathBuf),
}

/// A validated, non-empty folder/wait list.
///
/// Position `i` belongs to the monitor at enumeration position `i`; monitors
/// beyond the end of the list share the first entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePairs(Vec<FolderWait>);

impl ActivePairs {
    /// Validates `pairs`: the list is non-empty, every folder exists and
    /// every wait is positive.
    ///
    /// # Errors
    ///
    /// Returns the first reason the list is rejected.
    pub fn new(pairs: Vec<FolderWait>) -> Result<Self, ConfigRejection> {
        if pairs.is_empty() {
            return Err(ConfigRejection::Empty);
        }

        for pair in &pairs {
            if pair.folder.as_os_str().is_empty() {
                return Err(ConfigRejection::BlankFolder);
            }
            if !pair.folder.is_dir() {
                return Err(ConfigRejection::MissingFolder(pair.folder.clone()));
            }
            if pair.wait == 0 {
                return Err(ConfigRejection::ZeroWait(pair.folder.clone()));
            }
        }

        Ok(Self(pairs))
    }

    #[must_use]
    pub fn pairs(&self) -> &[FolderWait] { &self.0 }

    /// Returns the pair assigned to the monitor at `position`.
    #[must_use]
    pub fn assigned(&self, position: usize) -> &FolderWait {
        // The list is never empty, so index 0 always exists.
        self.0.get(position).unwrap_or(&self.0[0])
    }

    /// Returns `true` when `candidate` holds the same folders and waits.
    #[must_use]
    pub fn matches(&self, candidate: &[FolderWait]) -> bool { self.0 == candidate }
}
