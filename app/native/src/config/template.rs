//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// Pasta Sink Configuration File
// =============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // ============================================================================
  // Layout
  // ============================================================================
  // "layout": {
  //   // "auto" picks from the viewport width, "wide" is 4 columns x 2 rows,
  //   // "narrow" is 2 columns x 4 rows
  //   "mode": "auto",
  //
  //   // In auto mode, widths at or below this use the narrow layout
  //   "narrowBreakpoint": 768,
  //
  //   // Viewport width used in auto mode (auto without a width is wide)
  //   "viewportWidth": 1280
  // },

  // ============================================================================
  // Timer
  // ============================================================================
  // "timer": {
  //   // Cook time in seconds when neither a preset nor a time is given
  //   "defaultCookTime": 480
  // },

  // ============================================================================
  // Presets
  // ============================================================================
  // Extra pasta presets. A preset named like a built-in one replaces it.
  // Ravioli may cook between 240 and 600 seconds.
  // "presets": [
  //   { "name": "orecchiette", "cookTime": 660 },
  //   { "name": "ravioli - pumpkin", "cookTime": 300, "category": "ravioli" }
  // ]
}
"##
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SinkConfig;

    #[test]
    fn test_template_parses_to_defaults() {
        let template = generate_config_template();
        let reader = json_comments::StripComments::new(template.as_bytes());
        let config: SinkConfig = serde_json::from_reader(reader).unwrap();
        assert_eq!(config, SinkConfig::default());
    }

    #[test]
    fn test_template_contains_all_sections() {
        let template = generate_config_template();
        assert!(template.contains("\"layout\""));
        assert!(template.contains("\"timer\""));
        assert!(template.contains("\"presets\""));
    }

    #[test]
    fn test_create_config_file_makes_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.jsonc");

        create_config_file(&path).unwrap();
        assert!(path.exists());
    }
}
