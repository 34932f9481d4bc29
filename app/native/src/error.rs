//! Error types for Wallslide.
//!
//! This module provides the crate-level error returned from CLI commands and
//! daemon startup. Errors raised while the slideshow loop is running never
//! reach this type: they are classified and recovered inside the loop.

use thiserror::Error;

use crate::config::{ConfigError, ValidationError};
use crate::platform::ipc::IpcError;
use crate::wallpaper::BackendError;

/// Errors that can occur during application execution.
#[derive(Debug, Error)]
pub enum WallslideError {
    /// A folder/wait override argument failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// The configured folder list cannot be activated.
    #[error("One or more specified folders are invalid. Please check your settings.")]
    InvalidFolders,
    /// Another daemon already answers on the IPC socket.
    #[error("Another instance is already running.")]
    AlreadyRunning,
    /// Wallpaper backend failed before the loop could start.
    #[error("Wallpaper error: {0}")]
    WallpaperError(String),
    /// IPC communication error.
    #[error("IPC error: {0}")]
    IpcError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for WallslideError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<ConfigError> for WallslideError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<IpcError> for WallslideError {
    fn from(err: IpcError) -> Self { Self::IpcError(err.to_string()) }
}

impl From<BackendError> for WallslideError {
    fn from(err: BackendError) -> Self { Self::WallpaperError(err.to_string()) }
}
