//! Configuration types for the pasta sink.
//!
//! The configuration file is JSONC (JSON with comments). Every field has a
//! default, so an empty object, or no file at all, is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::presets::{PastaPreset, PresetCatalog};
use crate::sink::LayoutMode;

/// Default viewport width at or below which the narrow layout is used.
pub const DEFAULT_NARROW_BREAKPOINT: u32 = 768;

/// Default cook time offered for a new item, in seconds.
pub const DEFAULT_COOK_TIME_SECS: u32 = 8 * 60;

// ============================================================================
// Layout
// ============================================================================

/// How the sink's layout mode is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreference {
    /// Pick from the viewport width.
    #[default]
    Auto,

    /// Always four columns by two rows.
    Wide,

    /// Always two columns by four rows.
    Narrow,
}

impl FromStr for LayoutPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "wide" => Ok(Self::Wide),
            "narrow" => Ok(Self::Narrow),
            _ => Err(format!("Invalid layout '{s}'. Expected 'auto', 'wide', or 'narrow'.")),
        }
    }
}

impl std::fmt::Display for LayoutPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Wide => write!(f, "wide"),
            Self::Narrow => write!(f, "narrow"),
        }
    }
}

/// Layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Layout selection: "auto", "wide" or "narrow".
    pub mode: LayoutPreference,

    /// Viewport widths at or below this use the narrow layout in auto mode.
    pub narrow_breakpoint: u32,

    /// Viewport width used in auto mode. Without one, auto resolves to wide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_width: Option<u32>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutPreference::Auto,
            narrow_breakpoint: DEFAULT_NARROW_BREAKPOINT,
            viewport_width: None,
        }
    }
}

impl LayoutConfig {
    /// Resolve the configured preference into a concrete layout mode.
    #[must_use]
    pub fn resolve(&self) -> LayoutMode { self.resolve_with(None, None) }

    /// Resolve with optional overrides for the preference and viewport width.
    #[must_use]
    pub fn resolve_with(
        &self,
        mode: Option<LayoutPreference>,
        viewport_width: Option<u32>,
    ) -> LayoutMode {
        match mode.unwrap_or(self.mode) {
            LayoutPreference::Wide => LayoutMode::Wide,
            LayoutPreference::Narrow => LayoutMode::Narrow,
            LayoutPreference::Auto => viewport_width.or(self.viewport_width).map_or(
                LayoutMode::Wide,
                |width| LayoutMode::for_viewport_width(width, self.narrow_breakpoint),
            ),
        }
    }
}

// ============================================================================
// Timer
// ============================================================================

/// Cooking timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TimerConfig {
    /// Cook time in seconds used when neither a preset nor a time is given.
    pub default_cook_time: u32,
}

impl Default for TimerConfig {
    fn default() -> Self { Self { default_cook_time: DEFAULT_COOK_TIME_SECS } }
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SinkConfig {
    /// Layout selection.
    pub layout: LayoutConfig,

    /// Cooking timer defaults.
    pub timer: TimerConfig,

    /// Extra presets. One named like a built-in preset replaces it.
    pub presets: Vec<PastaPreset>,
}

impl SinkConfig {
    /// Built-in presets merged with the configured ones.
    #[must_use]
    pub fn preset_catalog(&self) -> PresetCatalog { PresetCatalog::with_overrides(&self.presets) }
}

// ============================================================================
// Loading
// ============================================================================

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/pasta-sink/config.jsonc \
         or ~/.pasta-sink.jsonc"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Home-directory configuration file names.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".pasta-sink.jsonc", ".pasta-sink.json"];

/// Application directory name.
const APP_DIR: &str = "pasta-sink";

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/pasta-sink/config.jsonc` or `config.json`, if set
/// 2. `~/.config/pasta-sink/config.jsonc` or `config.json`
/// 3. The platform configuration directory (`dirs::config_dir`)
/// 4. `~/.pasta-sink.jsonc` or `~/.pasta-sink.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        push_config_dir(&mut paths, &PathBuf::from(xdg_config).join(APP_DIR));
    }

    if let Some(home) = dirs::home_dir() {
        push_config_dir(&mut paths, &home.join(".config").join(APP_DIR));
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_config_dir(&mut paths, &config_dir.join(APP_DIR));
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Appends every config file name inside `dir`, skipping duplicates
/// (`XDG_CONFIG_HOME` is often `~/.config`).
fn push_config_dir(paths: &mut Vec<PathBuf>, dir: &Path) {
    for filename in CONFIG_FILE_NAMES {
        let path = dir.join(filename);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
}

/// Loads the configuration from the first existing config file.
///
/// # Errors
///
/// - `ConfigError::NotFound` if no configuration file exists
/// - `ConfigError::IoError` if the file could not be read
/// - `ConfigError::ParseError` if the file contains invalid JSON
pub fn load_config() -> Result<(SinkConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// - `ConfigError::NotFound` if the file does not exist
/// - `ConfigError::IoError` if the file could not be read
/// - `ConfigError::ParseError` if the file contains invalid JSON
pub fn load_config_from_path(path: &Path) -> Result<(SinkConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: SinkConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::presets::PresetCategory;

    #[test]
    fn test_default_config() {
        let config = SinkConfig::default();
        assert_eq!(config.layout.mode, LayoutPreference::Auto);
        assert_eq!(config.layout.narrow_breakpoint, 768);
        assert_eq!(config.timer.default_cook_time, 480);
        assert!(config.presets.is_empty());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: SinkConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SinkConfig::default());
    }

    #[test]
    fn test_config_deserializes_camel_case() {
        let json = r#"{
            "layout": { "mode": "narrow", "narrowBreakpoint": 600 },
            "timer": { "defaultCookTime": 300 },
            "presets": [{ "name": "ravioli - pumpkin", "cookTime": 300, "category": "ravioli" }]
        }"#;

        let config: SinkConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.layout.mode, LayoutPreference::Narrow);
        assert_eq!(config.layout.narrow_breakpoint, 600);
        assert_eq!(config.timer.default_cook_time, 300);
        assert_eq!(config.presets[0].category, PresetCategory::Ravioli);
        assert!(config.preset_catalog().find("Ravioli - Pumpkin").is_some());
    }

    #[test]
    fn test_layout_resolution() {
        let auto = LayoutConfig::default();
        assert_eq!(auto.resolve(), LayoutMode::Wide);
        assert_eq!(auto.resolve_with(None, Some(768)), LayoutMode::Narrow);
        assert_eq!(auto.resolve_with(None, Some(1024)), LayoutMode::Wide);

        let with_width = LayoutConfig {
            viewport_width: Some(400),
            ..Default::default()
        };
        assert_eq!(with_width.resolve(), LayoutMode::Narrow);
        assert_eq!(with_width.resolve_with(Some(LayoutPreference::Wide), None), LayoutMode::Wide);

        let narrow = LayoutConfig {
            mode: LayoutPreference::Narrow,
            ..Default::default()
        };
        assert_eq!(narrow.resolve_with(None, Some(2000)), LayoutMode::Narrow);
    }

    #[test]
    fn test_layout_preference_from_str() {
        assert_eq!("Wide".parse::<LayoutPreference>(), Ok(LayoutPreference::Wide));
        assert_eq!(" auto ".parse::<LayoutPreference>(), Ok(LayoutPreference::Auto));
        assert!("diagonal".parse::<LayoutPreference>().is_err());
    }

    #[test]
    fn test_load_config_from_path_strips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                // Always narrow on this tablet
                "layout": {{ "mode": "narrow" }},
                /* eight minutes */
                "timer": {{ "defaultCookTime": 480 }}
            }}"#
        )
        .unwrap();

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.layout.mode, LayoutPreference::Narrow);
        assert_eq!(path, file.path());
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from_path(&dir.path().join("nope.jsonc"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_load_config_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"layout\": ").unwrap();

        let result = load_config_from_path(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_config_paths_are_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty() || std::env::var("HOME").is_err());
    }
}
