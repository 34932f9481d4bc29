//! Application-wide constants.
//!
//! Constants are grouped by functionality:
//! - `timing` - Tick period, recovery pauses and housekeeping
//! - `images` - Which files count as slideshow images

/// Application identifier, used for the cache directory and process lookups.
pub const APP_ID: &str = "wallslide";

/// Timing constants for the slideshow loop and its recovery.
pub mod timing {
    use std::time::Duration;

    /// Interval between two scheduler ticks.
    pub const TICK_PERIOD: Duration = Duration::from_secs(1);

    /// Pause before re-acquiring the wallpaper surface after it failed.
    pub const REACQUIRE_PAUSE: Duration = Duration::from_secs(2);

    /// Extra pause when re-acquiring the wallpaper surface also failed.
    pub const REACQUIRE_FAILURE_PAUSE: Duration = Duration::from_secs(5);

    /// Pause after a tick failed for any other reason.
    pub const UNCLASSIFIED_PAUSE: Duration = Duration::from_secs(1);

    /// Interval between two housekeeping passes.
    pub const HOUSEKEEPING_INTERVAL: Duration = Duration::from_secs(5 * 60);

    /// How long `stop` waits for a cooperative exit before killing instances.
    pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(2);
}

/// Image file filtering.
pub mod images {
    /// File extensions (lowercase, without the dot) that qualify as images.
    pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];
}
