//! Configuration module for the pasta sink.
//!
//! This module provides configuration types and loading.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod template;
pub mod types;

use std::path::{Path, PathBuf};

pub use types::{
    ConfigError, DEFAULT_COOK_TIME_SECS, DEFAULT_NARROW_BREAKPOINT, LayoutConfig,
    LayoutPreference, SinkConfig, TimerConfig, config_paths, load_config, load_config_from_path,
};

/// A configuration together with the file it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The parsed configuration.
    pub config: SinkConfig,

    /// The file it was read from, or `None` when defaults are in use.
    pub path: Option<PathBuf>,
}

/// Expands a leading `~` in a user-supplied path.
#[must_use]
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let raw = raw.trim();
    if raw.is_empty() {
        return PathBuf::new();
    }
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Loads the configuration.
///
/// With an explicit path, that file must exist and parse. Without one, the
/// search paths are tried in order; a missing file yields defaults silently
/// and a broken one yields defaults with a warning.
///
/// # Errors
///
/// Only for an explicit path that is missing, unreadable or invalid.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        let (config, path) = load_config_from_path(&expand_path(path))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        return Ok(LoadedConfig { config, path: Some(path) });
    }

    match load_config() {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            Ok(LoadedConfig { config, path: Some(path) })
        }
        Err(ConfigError::NotFound) => Ok(LoadedConfig::default()),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            Ok(LoadedConfig::default())
        }
    }
}
