//! Process helpers: locating external binaries, launching the slideshow in
//! the background and terminating other slideshow instances.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use sysinfo::{ProcessesToUpdate, System};

/// Resolve the absolute path to an executable binary.
///
/// Absolute paths are returned as-is when executable. Otherwise the binary
/// is searched for in, by priority:
/// 1. Any directory in the `WALLSLIDE_EXTRA_PATHS` env var (colon-separated).
/// 2. The current process `PATH`.
/// 3. A list of fallback directories commonly used for user-installed tools.
///
/// # Errors
///
/// Returns a descriptive reason when the binary cannot be found.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, String> {
    if binary.is_empty() {
        return Err("Binary name cannot be empty".to_string());
    }

    let candidate = Path::new(binary);
    if candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(format!("Binary at {} is not executable", candidate.display()))
        };
    }

    let mut search_paths = Vec::new();

    if let Ok(extra) = env::var("WALLSLIDE_EXTRA_PATHS") {
        search_paths.extend(extra.split(':').map(PathBuf::from));
    }

    if let Some(path_var) = env::var_os("PATH") {
        search_paths.extend(env::split_paths(&path_var));
    }

    search_paths.extend([
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/usr/bin"),
        PathBuf::from("/opt/homebrew/bin"),
    ]);

    if let Some(home) = dirs::home_dir() {
        search_paths.push(home.join(".cargo/bin"));
        search_paths.push(home.join(".local/bin"));
    }

    search_paths
        .into_iter()
        .filter(|directory| !directory.as_os_str().is_empty())
        .map(|directory| directory.join(binary))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| format!("Unable to locate executable '{binary}' in known search paths"))
}

fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .is_ok_and(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
}

/// Starts a new slideshow process in the background.
///
/// The child runs the current executable with `args` and no folder pairs, so
/// it reads its folders from the configuration file. Its standard streams are
/// detached.
///
/// # Errors
///
/// Returns an error if the current executable cannot be located or spawned.
pub fn launch_detached<I, S>(args: I) -> std::io::Result<u32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let exe = env::current_exe()?;

    let child = Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    tracing::debug!(pid = child.id(), "launched background slideshow");
    Ok(child.id())
}

/// Kills every other process running the same executable as this one.
///
/// Returns how many processes were signalled.
#[must_use]
pub fn terminate_other_instances() -> usize {
    let Some(name) = current_process_name() else {
        return 0;
    };

    terminate_processes_named(&name)
}

/// Kills every process with the exact name `name`, except the current one.
fn terminate_processes_named(name: &OsStr) -> usize {
    let current = sysinfo::get_current_pid().ok();

    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let mut killed = 0;
    for process in system.processes_by_exact_name(name) {
        if Some(process.pid()) == current {
            continue;
        }

        if process.kill() {
            tracing::info!(pid = %process.pid(), "terminated slideshow instance");
            killed += 1;
        } else {
            tracing::warn!(pid = %process.pid(), "failed to terminate slideshow instance");
        }
    }

    killed
}

fn current_process_name() -> Option<std::ffi::OsString> {
    env::current_exe().ok()?.file_name().map(OsStr::to_os_string)
}
