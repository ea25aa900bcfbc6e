//! CLI module for the pasta sink.
//!
//! Session replay, preset listing and configuration file management.

mod commands;
mod output;
pub mod script;

use clap::Parser;
pub use commands::Cli;
use tracing_subscriber::EnvFilter;

use crate::error::SinkError;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "PASTA_SINK_LOG";

/// Runs the CLI.
///
/// Parses command-line arguments, sets up logging and executes the
/// appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), SinkError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute()
}

/// Logs go to stderr so stdout stays clean for JSON output.
///
/// `PASTA_SINK_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
