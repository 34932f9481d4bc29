//! Slideshow process control.
//!
//! Running `wallslide` without a subcommand starts the slideshow in the
//! foreground. `start` launches it in the background when no instance is
//! running and `stop` ends every running instance.

use std::ffi::OsString;
use std::time::{Duration, Instant};

use crate::config::{self, parse_override_args};
use crate::constants::timing::STOP_GRACE_PERIOD;
use crate::error::WallslideError;
use crate::platform::ipc::{self, IpcError, IpcQuery, IpcResponse};
use crate::platform::process::{launch_detached, terminate_other_instances};
use crate::slideshow::supervisor::stop_on_signals;
use crate::slideshow::{ConfigReconciler, Slideshow, StopSignal, Supervisor};
use crate::wallpaper::{self, BackendKind, WallpaperBackend};

/// Poll interval while waiting for a stopped daemon to exit.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the slideshow until it is stopped.
///
/// `pairs` are folder/seconds override arguments, merged into the stored
/// configuration by position and written back before the loop starts.
///
/// # Errors
///
/// Returns an error if another instance is running, the override arguments
/// or the resulting folder list are invalid, or the wallpaper surface cannot
/// be acquired. Nothing that goes wrong after the loop starts is returned.
pub fn run(pairs: &[String], backend: Option<BackendKind>) -> Result<(), WallslideError> {
    if ipc::is_daemon_running() {
        return Err(WallslideError::AlreadyRunning);
    }

    let overrides = parse_override_args(pairs)?;
    let store = config::default_store();
    let kind = backend.unwrap_or_else(|| {
        store.load_document().map_or_else(
            |err| {
                tracing::warn!(error = %err, "cannot read configured backend, using auto");
                BackendKind::Auto
            },
            |document| document.backend,
        )
    });

    let reconciler = ConfigReconciler::new(store);
    let initial = reconciler.initialize(&overrides)?;
    tracing::info!(
        config = %reconciler.store().path().display(),
        pairs = initial.pairs().len(),
        backend = %kind,
        "starting slideshow"
    );

    let surface = acquire_with_fill(kind)?;

    let stop = StopSignal::new();
    stop_on_signals(&stop)?;
    let ipc_stop = stop.clone();
    ipc::start_server(move |query| handle_query(&query, &ipc_stop))?;

    let slideshow = Slideshow::new(reconciler, initial, surface);
    let mut supervisor = Supervisor::new(slideshow, Box::new(move || wallpaper::acquire(kind)), stop);
    supervisor.run();

    ipc::stop_server();
    Ok(())
}

/// Acquires the first wallpaper surface and puts it into fill mode.
///
/// A fill mode the surface cannot honor is logged and tolerated; only a
/// failed surface is fatal.
fn acquire_with_fill(kind: BackendKind) -> Result<Box<dyn WallpaperBackend>, WallslideError> {
    let surface = wallpaper::acquire(kind)?;

    if let Err(err) = surface.set_fill_mode() {
        if err.is_surface_fault() {
            return Err(err.into());
        }
        tracing::warn!(backend = surface.name(), error = %err, "could not set fill mode");
    }

    tracing::debug!(backend = surface.name(), "wallpaper surface acquired");
    Ok(surface)
}

/// Answers one IPC query from the CLI.
fn handle_query(query: &IpcQuery, stop: &StopSignal) -> IpcResponse {
    match query {
        IpcQuery::Ping => IpcResponse::success(serde_json::json!({ "pid": std::process::id() })),
        IpcQuery::Stop => {
            tracing::info!("stop requested over IPC");
            stop.raise();
            IpcResponse::success(serde_json::json!({ "stopping": true }))
        }
    }
}

/// Stops every running instance.
///
/// The daemon is asked to exit first; whatever is still running after a
/// short grace period is killed.
///
/// # Errors
///
/// This command does not fail; the signature matches the other commands.
#[allow(clippy::unnecessary_wraps)]
pub fn stop() -> Result<(), WallslideError> {
    match ipc::send_query(&IpcQuery::Stop) {
        Ok(_) => wait_for_exit(STOP_GRACE_PERIOD),
        Err(IpcError::NotRunning) => {}
        Err(err) => tracing::debug!(error = %err, "stop request failed"),
    }

    let killed = terminate_other_instances();
    tracing::debug!(killed, "stop finished");
    println!("Wallslide stopped.");
    Ok(())
}

/// Waits until no daemon answers on the socket or `grace` elapses.
fn wait_for_exit(grace: Duration) {
    let deadline = Instant::now() + grace;
    while ipc::is_daemon_running() && Instant::now() < deadline {
        std::thread::sleep(STOP_POLL_INTERVAL);
    }
}

/// Starts the slideshow in the background unless it is already running.
///
/// # Errors
///
/// Returns an error if the background process cannot be spawned.
pub fn start(config: Option<&str>, backend: Option<BackendKind>) -> Result<(), WallslideError> {
    if ipc::is_daemon_running() {
        println!("Wallslide is already running.");
        return Ok(());
    }

    let pid = launch_detached(background_args(config, backend))?;
    println!("Wallslide started (pid {pid}).");
    Ok(())
}

/// Arguments forwarded to the background process.
fn background_args(config: Option<&str>, backend: Option<BackendKind>) -> Vec<OsString> {
    let mut args = Vec::new();
    if let Some(path) = config {
        args.push(OsString::from("--config"));
        args.push(OsString::from(path));
    }
    if let Some(kind) = backend {
        args.push(OsString::from("--backend"));
        args.push(OsString::from(kind.to_string()));
    }
    args
}
