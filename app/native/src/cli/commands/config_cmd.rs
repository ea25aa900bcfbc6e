//! Config CLI commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use colored::Colorize;

use crate::config::template::{create_config_file, generate_config_template};
use crate::config::{config_paths, expand_path};
use crate::error::SinkError;

/// Config management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Initialize a new configuration file with all options documented.
    ///
    /// The generated file spells out every option with its default value, so
    /// it behaves exactly like having no configuration at all until edited.
    #[command(
        name = "init",
        after_long_help = r#"Examples:
  pasta-sink config init              # Create config at default location
  pasta-sink config init --force      # Overwrite existing config
  pasta-sink config init --path ~/sink.jsonc  # Create at custom path
  pasta-sink config init --stdout     # Print template to stdout"#
    )]
    Init {
        /// Overwrite existing configuration file if it exists.
        #[arg(long, short)]
        force: bool,

        /// Custom path for the configuration file.
        /// If not specified, uses the first search path.
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
}

/// Execute config subcommands.
///
/// `explicit` is the global `--config` path, which takes precedence over the
/// search paths for both subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands, explicit: Option<&Path>) -> Result<(), SinkError> {
    match cmd {
        ConfigCommands::Init { force, path, stdout } => {
            if *stdout {
                println!("{}", generate_config_template());
                Ok(())
            } else {
                let target = path.as_deref().or(explicit).map(expand_path);
                init_config(*force, target)
            }
        }
        ConfigCommands::Path => {
            show_config_path(explicit);
            Ok(())
        }
    }
}

/// Initialize a new configuration file.
fn init_config(force: bool, custom_path: Option<PathBuf>) -> Result<(), SinkError> {
    let config_path = custom_path.unwrap_or_else(|| {
        config_paths().into_iter().next().unwrap_or_else(|| PathBuf::from("pasta-sink.jsonc"))
    });

    if config_path.exists() && !force {
        return Err(SinkError::ConfigError(format!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        )));
    }

    create_config_file(&config_path).map_err(|e| {
        SinkError::ConfigError(format!(
            "Failed to create config file {}: {e}",
            config_path.display()
        ))
    })?;

    tracing::debug!(path = %config_path.display(), "configuration file written");
    println!("Configuration file created at: {}", config_path.display().to_string().bold());
    Ok(())
}

/// Show the configuration file search paths.
fn show_config_path(explicit: Option<&Path>) {
    if let Some(path) = explicit {
        let path = expand_path(path);
        let marker = if path.exists() { " (active)" } else { " (missing)" };
        println!("Configuration file from --config:\n");
        println!("  {}{}", path.display(), marker.dimmed());
        return;
    }

    println!("Configuration file search paths (in priority order):\n");

    let mut found_config = false;
    for (i, path) in config_paths().iter().enumerate() {
        let exists = path.exists();
        let marker = if exists && !found_config {
            found_config = true;
            " (active)"
        } else if exists {
            " (exists)"
        } else {
            ""
        };

        println!("  {}. {}{}", i + 1, path.display(), marker.dimmed());
    }

    if !found_config {
        println!("\nNo configuration file found; built-in defaults are in use.");
        println!("Run 'pasta-sink config init' to create one.");
    }
}
