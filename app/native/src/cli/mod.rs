//! CLI module for Wallslide.
//!
//! The same binary runs the slideshow and controls it: without a subcommand
//! it becomes the slideshow process, while `start` and `stop` talk to an
//! already running one over IPC.

mod commands;
mod output;

use std::ffi::OsString;

use clap::Parser;
pub use commands::Cli;

use crate::error::WallslideError;

/// Single-argument switches accepted for compatibility with older launchers.
const LEGACY_STOP_SWITCHES: &[&str] = &["/kill", "/stop", "/exit", "/quit", "/x"];
const LEGACY_HELP_SWITCHES: &[&str] = &["/help", "/?"];

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), WallslideError> {
    let cli = Cli::parse_from(normalize_legacy_args(std::env::args_os()));
    cli.execute()
}

/// Rewrites a lone slash switch into its subcommand form.
///
/// `/kill`, `/stop`, `/exit`, `/quit` and `/x` become `stop`; `/help` and
/// `/?` become `--help`. Matching ignores case and only applies when the
/// switch is the sole argument.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where I: IntoIterator<Item = OsString> {
    let mut args: Vec<OsString> = args.into_iter().collect();

    if args.len() == 2 {
        let switch = args[1].to_string_lossy().to_ascii_lowercase();
        if LEGACY_STOP_SWITCHES.contains(&switch.as_str()) {
            args[1] = OsString::from("stop");
        } else if LEGACY_HELP_SWITCHES.contains(&switch.as_str()) {
            args[1] = OsString::from("--help");
        }
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(args: &[&str]) -> Vec<OsString> {
        normalize_legacy_args(args.iter().map(OsString::from))
    }

    #[test]
    fn test_stop_switches_map_to_stop() {
        for switch in ["/kill", "/STOP", "/Exit", "/quit", "/X"] {
            assert_eq!(normalize(&["wallslide", switch]), ["wallslide", "stop"], "{switch}");
        }
    }

    #[test]
    fn test_help_switches_map_to_help() {
        assert_eq!(normalize(&["wallslide", "/help"]), ["wallslide", "--help"]);
        assert_eq!(normalize(&["wallslide", "/?"]), ["wallslide", "--help"]);
    }

    #[test]
    fn test_switch_is_only_rewritten_when_alone() {
        assert_eq!(normalize(&["wallslide", "/x", "30"]), ["wallslide", "/x", "30"]);
        assert_eq!(normalize(&["wallslide"]), ["wallslide"]);
    }

    #[test]
    fn test_other_arguments_pass_through() {
        assert_eq!(normalize(&["wallslide", "/pics"]), ["wallslide", "/pics"]);
    }

    #[test]
    fn test_normalized_stop_parses() {
        let cli = Cli::try_parse_from(normalize(&["wallslide", "/quit"]));
        assert!(cli.is_ok());
    }
}
