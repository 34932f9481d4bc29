//! Config CLI commands.
//!
//! Commands for creating, locating and inspecting the Wallslide
//! configuration file.

use std::path::PathBuf;

use clap::Subcommand;

use crate::cli::output::print_highlighted_json;
use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{self, ConfigStore, config_paths};
use crate::error::WallslideError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with every option documented.
    ///
    /// The folder list starts commented out; uncomment or add one entry per
    /// monitor before starting the slideshow.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  wallslide config init              # Create config at default location
  wallslide config init --force      # Overwrite existing config
  wallslide config init --path ~/my-config.jsonc  # Create at custom path
  wallslide config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses ~/.config/wallslide/config.jsonc
        #[arg(long, short, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print the configuration template to stdout instead of writing to a file.
        #[arg(long)]
        stdout: bool,
    },

    /// Show the configuration file search paths.
    ///
    /// Marks the file currently in use, if any.
    Path,

    /// Print the effective backend and folder/wait list as JSON.
    ///
    /// Folders are shown with `~` expanded, exactly as the slideshow sees them.
    Show,
}

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> Result<(), WallslideError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                init_config(*force, path.clone())
            }
        }
        ConfigCommands::Path => {
            show_config_path();
            Ok(())
        }
        ConfigCommands::Show => show_config(),
    }
}

/// Initialize a new configuration file.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), WallslideError> {
    let config_path = custom_path.unwrap_or_else(|| {
        config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("config.jsonc"))
    });

    if config_path.exists() && !force {
        return Err(WallslideError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(|e| {
        WallslideError::ConfigError(format!(
            "Failed to create config file {}: {e}",
            config_path.display()
        ))
    })?;

    println!("Configuration file created at: {}", config_path.display());
    println!("\nAdd one folder per monitor, then run 'wallslide start'.");

    Ok(())
}

/// Show the configuration file search paths.
fn show_config_path() {
    println!("Configuration file search paths (in priority order):\n");

    let active = config::config_path();
    for (i, path) in config_paths().iter().enumerate() {
        let marker = if *path == active && path.exists() {
            " (active)"
        } else if path.exists() {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if !active.exists() {
        println!("\nNo configuration file found.");
        println!("Run 'wallslide config init' to create one.");
    } else if !config_paths().contains(&active) {
        println!("\nUsing: {}", active.display());
    }
}

/// Print the effective configuration.
fn show_config() -> Result<(), WallslideError> {
    let value = effective_config(&config::default_store())?;
    print_highlighted_json(&value);
    Ok(())
}

/// Builds the JSON shown by `config show`.
fn effective_config(store: &config::FileConfigStore) -> Result<serde_json::Value, WallslideError> {
    let document = store.load_document()?;
    let monitors = store.load()?;

    Ok(serde_json::json!({
        "path": store.path(),
        "backend": document.backend,
        "resolvedBackend": document.backend.resolve(),
        "monitors": monitors,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileConfigStore, FolderWait};

    #[test]
    fn test_config_paths_returns_non_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.jsonc");
        std::fs::write(&path, "{}").unwrap();

        let result = init_config(false, Some(path.clone()));
        assert!(matches!(result, Err(WallslideError::ConfigError(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

        init_config(true, Some(path.clone())).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), generate_config_template());
    }

    #[test]
    fn test_effective_config_lists_stored_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("config.jsonc"));
        store.save(&[FolderWait::new("/pics/a", 300)]).unwrap();

        let value = effective_config(&store).unwrap();
        assert_eq!(value["backend"], "auto");
        assert_eq!(value["monitors"][0]["folder"], "/pics/a");
        assert_eq!(value["monitors"][0]["wait"], 300);
    }

    #[test]
    fn test_effective_config_of_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("absent.jsonc"));

        let value = effective_config(&store).unwrap();
        assert_eq!(value["monitors"], serde_json::json!([]));
    }
}
