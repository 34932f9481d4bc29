//! CLI command definitions using Clap.
//!
//! Without a subcommand `wallslide` runs the slideshow in the foreground,
//! optionally overriding the stored folder list with `FOLDER SECONDS` pairs.
//! Subcommands are organized into submodules:
//!
//! - `config_cmd` - Configuration file commands
//! - `daemon` - Running, starting and stopping the slideshow

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::WallslideError;
use crate::wallpaper::BackendKind;
use crate::{config, logging};

pub mod config_cmd;
pub mod daemon;

pub use config_cmd::ConfigCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wallslide - per-monitor wallpaper slideshow.
#[derive(Parser, Debug)]
#[command(name = "wallslide")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(
    after_long_help = r#"Examples:
  wallslide                           # Run with the folders in the config file
  wallslide ~/Pictures/Wide 300       # Monitor 1 shows ~/Pictures/Wide, every 5 minutes
  wallslide ~/A 60 ~/B 600            # Override monitors 1 and 2
  wallslide start                     # Run in the background
  wallslide stop                      # Stop every running instance

A folder named like a subcommand (start, stop, config, ...) must be written
as a path, e.g. ./stop."#
)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Wallpaper backend to use instead of the configured one.
    #[arg(long, short, global = true, value_enum, value_name = "BACKEND")]
    pub backend: Option<BackendKind>,

    /// Folder and seconds pairs, one pair per monitor position.
    ///
    /// Pairs replace the stored entries at the same position and are written
    /// back to the configuration file before the slideshow starts.
    #[arg(value_name = "FOLDER SECONDS", allow_negative_numbers = true)]
    pub pairs: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Start the slideshow in the background if it is not running.
    Start,

    /// Stop every running slideshow.
    ///
    /// The running slideshow is asked to exit; instances that do not exit
    /// within a short grace period are killed.
    #[command(visible_alias = "kill", aliases = ["exit", "quit", "x"])]
    Stop,

    /// Configuration file management commands.
    ///
    /// Initialize, locate and inspect the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(wallslide completions --shell zsh)"
    ///   wallslide completions --shell bash > ~/.local/share/bash-completion/completions/wallslide
    ///   wallslide completions --shell fish > ~/.config/fish/completions/wallslide.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<std::path::PathBuf> {
        self.config.as_ref().map(std::path::PathBuf::from)
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), WallslideError> {
        logging::init(self.verbose);

        if let Some(path) = self.config_path() {
            config::set_custom_config_path(path);
        }

        match &self.command {
            None => daemon::run(&self.pairs, self.backend),
            Some(Commands::Start) => daemon::start(self.config.as_deref(), self.backend),
            Some(Commands::Stop) => daemon::stop(),
            Some(Commands::Config(cmd)) => config_cmd::execute(cmd),
            Some(Commands::Completions { shell }) => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "wallslide", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_without_arguments_runs_slideshow() {
        let cli = Cli::try_parse_from(["wallslide"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.pairs.is_empty());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parses_override_pairs() {
        let cli = Cli::try_parse_from(["wallslide", "/pics/a", "30", "/pics/b", "60"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.pairs, ["/pics/a", "30", "/pics/b", "60"]);
    }

    #[test]
    fn test_cli_parses_global_flags_with_pairs() {
        let cli = Cli::try_parse_from([
            "wallslide",
            "--verbose",
            "--backend",
            "swww",
            "--config",
            "/tmp/w.jsonc",
            "/pics/a",
            "30",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.backend, Some(BackendKind::Swww));
        assert_eq!(cli.config_path(), Some(std::path::PathBuf::from("/tmp/w.jsonc")));
        assert_eq!(cli.pairs, ["/pics/a", "30"]);
    }

    #[test]
    fn test_cli_keeps_negative_wait_for_validation() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from(["wallslide", folder.as_str(), "-5"]).unwrap();
        assert_eq!(cli.pairs, [folder.as_str(), "-5"]);
        assert!(matches!(
            crate::config::parse_override_args(&cli.pairs),
            Err(crate::config::ValidationError::InvalidWait(_))
        ));
    }

    #[test]
    fn test_cli_path_named_like_subcommand_is_a_pair() {
        let cli = Cli::try_parse_from(["wallslide", "./stop", "30"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.pairs, ["./stop", "30"]);
    }

    #[test]
    fn test_cli_parses_stop_and_aliases() {
        for name in ["stop", "kill", "exit", "quit", "x"] {
            let cli = Cli::try_parse_from(["wallslide", name]).unwrap();
            assert!(matches!(cli.command, Some(Commands::Stop)), "{name}");
        }
    }

    #[test]
    fn test_cli_parses_start() {
        let cli = Cli::try_parse_from(["wallslide", "start"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Start)));
    }

    #[test]
    fn test_cli_parses_config_show() {
        let cli = Cli::try_parse_from(["wallslide", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config(ConfigCommands::Show))));
    }

    #[test]
    fn test_cli_parses_config_init_flags() {
        let cli = Cli::try_parse_from(["wallslide", "config", "init", "--force", "--stdout"]).unwrap();
        match cli.command {
            Some(Commands::Config(ConfigCommands::Init { force, path, stdout })) => {
                assert!(force);
                assert!(stdout);
                assert!(path.is_none());
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_cli_parses_completions_zsh() {
        let cli = Cli::try_parse_from(["wallslide", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Some(Commands::Completions { shell }) => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["wallslide", "--backend", "x11"]).is_err());
    }

    #[test]
    fn test_cli_global_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["wallslide", "start", "--backend", "desktop"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Start)));
        assert_eq!(cli.backend, Some(BackendKind::Desktop));
    }
}
