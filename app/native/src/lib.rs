//! Wallslide - per-monitor wallpaper slideshow.
//!
//! Each monitor cycles through the images of its own folder on its own
//! timer. Folder contents and the configuration file are watched, so edits
//! take effect on the next tick, and failures of the wallpaper surface are
//! recovered from without stopping the slideshow.
//!
//! The library holds everything; the binary only forwards to [`cli::run`].

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod platform;
pub mod slideshow;
pub mod wallpaper;
