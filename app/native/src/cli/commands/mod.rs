//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `config_cmd` - Configuration file management commands
//! - `presets` - Pasta preset listing
//! - `replay` - Session script replay

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config::{self, LoadedConfig};
use crate::error::SinkError;
use crate::schema;

pub mod config_cmd;
pub mod presets;
pub mod replay;

pub use config_cmd::ConfigCommands;
pub use replay::ReplayArgs;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pasta Sink CLI - plan trays and timers in an eight-cell pasta sink.
#[derive(Parser, Debug)]
#[command(name = "pasta-sink")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Log debug output to stderr.
    ///
    /// Ignored when `PASTA_SINK_LOG` is set.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Replay a session script against an empty sink.
    ///
    /// Runs each step of a JSONC script in order, reports what every step did
    /// and prints the final sink. Refused steps are reported and skipped.
    #[command(after_long_help = r#"Examples:
  pasta-sink replay session.jsonc
  pasta-sink replay session.jsonc --layout narrow
  pasta-sink replay session.jsonc --viewport-width 640 --json"#)]
    Replay(ReplayArgs),

    /// List the pasta presets and their cook times.
    ///
    /// Includes presets added or replaced by the configuration file.
    Presets {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Configuration file management commands.
    ///
    /// Initialize, view, and manage the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output the configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    /// Can be used with eval or redirected to a file.
    ///
    /// Usage:
    ///   eval "$(pasta-sink completions --shell zsh)"
    ///   pasta-sink completions --shell fish > ~/.config/fish/completions/pasta-sink.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), SinkError> {
        match &self.command {
            Commands::Replay(args) => replay::execute(args, &self.load_config()?.config),
            Commands::Presets { json } => presets::execute(&self.load_config()?.config, *json),
            Commands::Config(cmd) => config_cmd::execute(cmd, self.config_path().as_deref()),

            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    fn load_config(&self) -> Result<LoadedConfig, SinkError> {
        let config_path = self.config_path();
        config::load(config_path.as_deref()).map_err(|err| match config_path {
            Some(path) => {
                SinkError::ConfigError(format!("{}: {err}", config::expand_path(&path).display()))
            }
            None => err.into(),
        })
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "pasta-sink", &mut io::stdout());
    }
}
