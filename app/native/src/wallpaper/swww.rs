//! `swww` wallpaper backend for Wayland compositors.
//!
//! Outputs are enumerated with `swww query` and wallpapers are set with
//! `swww img --outputs <name> --resize crop <path>`, which is swww's
//! scale-to-cover mode.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::{BackendError, MonitorId, WallpaperBackend};
use crate::platform::process::resolve_binary;

/// Per-output wallpapers through the `swww` daemon.
#[derive(Debug, Clone)]
pub struct SwwwBackend {
    binary: PathBuf,
}

impl SwwwBackend {
    /// Locates the `swww` binary and checks that its daemon answers.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] if the binary is missing or the
    /// daemon is not running.
    pub fn connect() -> Result<Self, BackendError> {
        let binary = resolve_binary("swww").map_err(BackendError::Unavailable)?;
        let backend = Self { binary };
        backend.query()?;
        Ok(backend)
    }

    fn run(&self, args: &[&OsStr]) -> Result<Output, BackendError> {
        Command::new(&self.binary).args(args).output().map_err(|err| {
            BackendError::Unavailable(format!("failed to run {}: {err}", self.binary.display()))
        })
    }

    fn query(&self) -> Result<String, BackendError> {
        let output = self.run(&[OsStr::new("query")])?;
        if !output.status.success() {
            return Err(BackendError::Unavailable(stderr_reason(&output)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl WallpaperBackend for SwwwBackend {
    fn name(&self) -> &'static str { "swww" }

    fn monitors(&self) -> Result<Vec<MonitorId>, BackendError> {
        Ok(parse_query_output(&self.query()?))
    }

    // Fill is requested per image with `--resize crop`; only the daemon is checked here.
    fn set_fill_mode(&self) -> Result<(), BackendError> { self.query().map(|_| ()) }

    fn set_wallpaper(&self, monitor: &MonitorId, image: &Path) -> Result<(), BackendError> {
        let output = self.run(&[
            OsStr::new("img"),
            OsStr::new("--outputs"),
            OsStr::new(monitor.as_str()),
            OsStr::new("--resize"),
            OsStr::new("crop"),
            image.as_os_str(),
        ])?;

        if output.status.success() {
            return Ok(());
        }

        let reason = stderr_reason(&output);
        if is_daemon_failure(&reason) {
            Err(BackendError::Unavailable(reason))
        } else {
            Err(BackendError::SetFailed { monitor: monitor.clone(), reason })
        }
    }
}

fn stderr_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() { format!("swww exited with {}", output.status) } else { stderr }
}

/// Whether a swww error message means the daemon itself is unreachable.
fn is_daemon_failure(reason: &str) -> bool {
    let reason = reason.to_lowercase();
    reason.contains("socket") || reason.contains("daemon")
}

/// Extracts output names from `swww query` output.
///
/// Each line looks like
/// `: eDP-1: 1920x1080, scale: 1, currently displaying: image: /path`
/// (older releases omit the leading colon).
fn parse_query_output(stdout: &str) -> Vec<MonitorId> {
    stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
            let (name, _) = line.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| MonitorId::new(name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_output_current_format() {
        let stdout = "\
: eDP-1: 1920x1080, scale: 1, currently displaying: image: /home/me/a.jpg
: HDMI-A-1: 2560x1440, scale: 1, currently displaying: color: 000000
";
        assert_eq!(
            parse_query_output(stdout),
            vec![MonitorId::new("eDP-1"), MonitorId::new("HDMI-A-1")]
        );
    }

    #[test]
    fn test_parse_query_output_legacy_format() {
        let stdout = "DP-2: 3840x2160, scale: 2, currently displaying: image: /tmp/b.png\n";
        assert_eq!(parse_query_output(stdout), vec![MonitorId::new("DP-2")]);
    }

    #[test]
    fn test_parse_query_output_skips_blank_lines() {
        assert!(parse_query_output("\n\n").is_empty());
        assert!(parse_query_output("").is_empty());
    }

    #[test]
    fn test_daemon_failures_are_detected() {
        assert!(is_daemon_failure("Error: failed to connect to socket"));
        assert!(is_daemon_failure("is the Daemon running?"));
        assert!(!is_daemon_failure("Error: failed to decode image"));
    }

    #[test]
    fn test_set_failures_are_not_surface_faults() {
        let backend = SwwwBackend { binary: PathBuf::from("false") };
        let err = backend.set_wallpaper(&MonitorId::new("eDP-1"), Path::new("/tmp/a.jpg")).unwrap_err();
        assert!(matches!(err, BackendError::SetFailed { .. }));
        assert!(!err.is_surface_fault());
    }

    #[test]
    fn test_missing_binary_is_surface_fault() {
        let backend = SwwwBackend { binary: PathBuf::from("/nonexistent/swww") };
        let err = backend.monitors().unwrap_err();
        assert!(err.is_surface_fault());
    }
}
