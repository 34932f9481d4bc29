#![allow(clippy::multiple_crate_versions)]

//! Wallslide - per-monitor wallpaper slideshow.
//!
//! This binary serves as both the slideshow process and its CLI:
//! - With no subcommand (optionally with folder/seconds pairs): runs the slideshow
//! - With subcommands (e.g., `wallslide stop`): controls a running slideshow

// Emit a clear compile-time error if attempted to compile on unsupported platforms
#[cfg(not(unix))]
compile_error!("This application only supports Unix-like systems.");

fn main() {
    if let Err(err) = wallslide_lib::cli::run() {
        eprintln!("wallslide: {err}");
        std::process::exit(1);
    }
}
