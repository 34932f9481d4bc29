//! Recovery supervisor and the tick loop.
//!
//! The loop ticks about once a second until the [`StopSignal`] is raised.
//! Faults are classified and recovered from; none of them ends the loop.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::Slideshow;
use super::fault::TickFault;
use crate::config::ConfigStore;
use crate::constants::timing;
use crate::platform::thread::spawn_named_thread;
use crate::wallpaper::{BackendError, WallpaperBackend};

/// Pauses used by the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryTiming {
    pub tick_period: Duration,
    pub reacquire_pause: Duration,
    pub reacquire_failure_pause: Duration,
    pub unclassified_pause: Duration,
    pub housekeeping_interval: Duration,
}

impl Default for RecoveryTiming {
    fn default() -> Self {
        Self {
            tick_period: timing::TICK_PERIOD,
            reacquire_pause: timing::REACQUIRE_PAUSE,
            reacquire_failure_pause: timing::REACQUIRE_FAILURE_PAUSE,
            unclassified_pause: timing::UNCLASSIFIED_PAUSE,
            housekeeping_interval: timing::HOUSEKEEPING_INTERVAL,
        }
    }
}

/// Cooperative stop request shared between the loop and whoever stops it.
///
/// Raising the signal wakes a loop that is sleeping between ticks or in a
/// backoff pause.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<(Mutex<bool>, Condvar)>);

impl StopSignal {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn raise(&self) {
        let (raised, wakeup) = &*self.0;
        *raised.lock() = true;
        wakeup.notify_all();
    }

    #[must_use]
    pub fn is_raised(&self) -> bool { *self.0.0.lock() }

    /// Sleeps for `duration` or until the signal is raised.
    ///
    /// Returns `true` if the signal is raised.
    pub fn sleep(&self, duration: Duration) -> bool {
        let (raised, wakeup) = &*self.0;
        let deadline = Instant::now() + duration;
        let mut raised = raised.lock();

        while !*raised {
            if wakeup.wait_until(&mut raised, deadline).timed_out() {
                break;
            }
        }
        *raised
    }
}

/// Raises `stop` on SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be registered.
pub fn stop_on_signals(stop: &StopSignal) -> std::io::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let stop = stop.clone();

    spawn_named_thread("signals", move || {
        if let Some(signal) = signals.forever().next() {
            tracing::info!(signal, "received signal, stopping");
            stop.raise();
        }
    });
    Ok(())
}

/// Re-acquires the wallpaper surface.
pub type AcquireFn = Box<dyn FnMut() -> Result<Box<dyn WallpaperBackend>, BackendError>>;

/// Runs ticks and recovers from their faults.
pub struct Supervisor<S: ConfigStore> {
    slideshow: Slideshow<S>,
    acquire: AcquireFn,
    timing: RecoveryTiming,
    stop: StopSignal,
}

impl<S: ConfigStore> std::fmt::Debug for Supervisor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("slideshow", &self.slideshow)
            .field("timing", &self.timing)
            .field("stop", &self.stop)
            .finish_non_exhaustive()
    }
}

impl<S: ConfigStore> Supervisor<S> {
    pub fn new(slideshow: Slideshow<S>, acquire: AcquireFn, stop: StopSignal) -> Self {
        Self { slideshow, acquire, timing: RecoveryTiming::default(), stop }
    }

    #[must_use]
    pub const fn with_timing(mut self, timing: RecoveryTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub const fn slideshow(&self) -> &Slideshow<S> { &self.slideshow }

    /// Ticks until the stop signal is raised.
    pub fn run(&mut self) {
        tracing::info!(pairs = self.slideshow.pairs().pairs().len(), "slideshow started");
        let mut last_housekeeping = Instant::now();

        while !self.stop.is_raised() {
            let now = Instant::now();

            let stopped = match self.run_tick(now) {
                Ok(()) => {
                    if now.duration_since(last_housekeeping) >= self.timing.housekeeping_interval {
                        tracing::trace!("housekeeping");
                        self.slideshow.housekeeping();
                        last_housekeeping = now;
                    }
                    self.stop.sleep(self.timing.tick_period)
                }
                Err(TickFault::ApplierUnavailable(err)) => {
                    tracing::warn!(error = %err, "wallpaper surface unavailable, re-acquiring");
                    self.recover()
                }
                Err(TickFault::Unclassified(reason)) => {
                    tracing::warn!(%reason, "tick failed");
                    self.stop.sleep(self.timing.unclassified_pause)
                }
            };

            if stopped {
                break;
            }
        }

        tracing::info!("slideshow stopped");
    }

    /// Runs one tick, turning a panic into an unclassified fault.
    fn run_tick(&mut self, now: Instant) -> Result<(), TickFault> {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.slideshow.tick(now)))
            .unwrap_or_else(|payload| Err(TickFault::from_panic(payload.as_ref())));

        let report = outcome?;
        for (monitor, image) in &report.applied {
            tracing::debug!(%monitor, image = %image.display(), "wallpaper changed");
        }
        Ok(())
    }

    /// Pauses, then tries once to re-acquire the surface.
    ///
    /// Returns `true` if the stop signal was raised meanwhile.
    fn recover(&mut self) -> bool {
        self.slideshow.release_backend();

        if self.stop.sleep(self.timing.reacquire_pause) {
            return true;
        }

        match self.reacquire() {
            Ok(backend) => {
                tracing::info!(backend = backend.name(), "wallpaper surface re-acquired");
                self.slideshow.install_backend(backend);
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to re-acquire wallpaper surface");
                self.stop.sleep(self.timing.reacquire_failure_pause)
            }
        }
    }

    fn reacquire(&mut self) -> Result<Box<dyn WallpaperBackend>, BackendError> {
        let backend = catch_unwind(AssertUnwindSafe(|| (self.acquire)())).unwrap_or_else(|_| {
            Err(BackendError::Unavailable("panic while acquiring wallpaper surface".to_string()))
        })?;

        match backend.set_fill_mode() {
            Err(err) if err.is_surface_fault() => return Err(err),
            Err(err) => tracing::warn!(error = %err, "failed to set fill mode"),
            Ok(()) => {}
        }
        Ok(backend)
    }
}
