//! Pasta presets and cook-time bounds.
//!
//! A preset names a pasta and its usual cook time. Ravioli may be cooked for
//! anywhere between four and ten minutes; plain pasta takes any positive time.
//! The sink itself never consults presets - callers validate a duration here
//! before handing it to `SinkState::add_item`.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sink::Rejection;

/// Shortest allowed ravioli cook time, in seconds.
pub const RAVIOLI_MIN_SECS: u32 = 4 * 60;

/// Longest allowed ravioli cook time, in seconds.
pub const RAVIOLI_MAX_SECS: u32 = 10 * 60;

/// Kind of pasta a preset describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    /// Any positive cook time.
    #[default]
    Pasta,

    /// Cook time restricted to `RAVIOLI_MIN_SECS..=RAVIOLI_MAX_SECS`.
    Ravioli,
}

impl PresetCategory {
    /// Inclusive cook-time bounds in seconds, if the category restricts them.
    #[must_use]
    pub const fn cook_time_bounds(self) -> Option<(u32, u32)> {
        match self {
            Self::Pasta => None,
            Self::Ravioli => Some((RAVIOLI_MIN_SECS, RAVIOLI_MAX_SECS)),
        }
    }

    /// Returns the category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pasta => "pasta",
            Self::Ravioli => "ravioli",
        }
    }
}

impl fmt::Display for PresetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A named pasta with its default cook time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PastaPreset {
    /// Display name, matched case-insensitively.
    pub name: String,

    /// Default cook time in seconds.
    pub cook_time: u32,

    /// Pasta category. Defaults to plain pasta.
    #[serde(default)]
    pub category: PresetCategory,
}

impl PastaPreset {
    /// Create a preset.
    #[must_use]
    pub fn new(name: impl Into<String>, cook_time: u32, category: PresetCategory) -> Self {
        Self {
            name: name.into(),
            cook_time,
            category,
        }
    }

    /// Returns true if `name` refers to this preset, ignoring case.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool { self.name.eq_ignore_ascii_case(name.trim()) }

    /// Check a cook time against this preset's category.
    ///
    /// # Errors
    ///
    /// `InvalidDuration` if `secs` is zero or outside the category's bounds.
    pub fn validate_cook_time(&self, secs: u32) -> Result<u32, Rejection> {
        validate_for_category(self.category, secs)
    }
}

/// The presets shipped with the sink.
#[must_use]
pub fn builtin_presets() -> Vec<PastaPreset> {
    use PresetCategory::{Pasta, Ravioli};

    vec![
        PastaPreset::new("spaghetti", 4 * 60, Pasta),
        PastaPreset::new("tagliatelle", 2 * 60, Pasta),
        PastaPreset::new("sedanini", 90, Pasta),
        PastaPreset::new("casarecho", 3 * 60, Pasta),
        PastaPreset::new("fusilli", 2 * 60, Pasta),
        PastaPreset::new("bucatini", 3 * 60, Pasta),
        PastaPreset::new("ravioli - brasato", 4 * 60, Ravioli),
        PastaPreset::new("ravioli - black truffle", 4 * 60, Ravioli),
        PastaPreset::new("ravioli - spinach", 4 * 60, Ravioli),
    ]
}

/// Look up a built-in preset by name, ignoring case.
#[must_use]
pub fn find_preset(name: &str) -> Option<PastaPreset> {
    builtin_presets().into_iter().find(|p| p.matches(name))
}

fn validate_for_category(category: PresetCategory, secs: u32) -> Result<u32, Rejection> {
    let bounds = category.cook_time_bounds();
    let in_range = bounds.is_none_or(|(min, max)| (min..=max).contains(&secs));

    if secs == 0 || !in_range {
        return Err(Rejection::InvalidDuration {
            secs,
            min: bounds.map(|(min, _)| min),
            max: bounds.map(|(_, max)| max),
        });
    }
    Ok(secs)
}

/// Built-in presets merged with user-defined ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetCatalog {
    presets: Vec<PastaPreset>,
}

impl Default for PresetCatalog {
    fn default() -> Self { Self::builtin() }
}

impl PresetCatalog {
    /// The built-in presets only.
    #[must_use]
    pub fn builtin() -> Self { Self { presets: builtin_presets() } }

    /// Built-in presets with `extra` applied on top.
    ///
    /// An extra preset whose name matches an existing one replaces it in
    /// place; the rest are appended in order.
    #[must_use]
    pub fn with_overrides(extra: &[PastaPreset]) -> Self {
        let mut catalog = Self::builtin();
        for preset in extra {
            if let Some(existing) = catalog.presets.iter_mut().find(|p| p.matches(&preset.name)) {
                tracing::debug!(name = %preset.name, "preset overridden by configuration");
                *existing = preset.clone();
            } else {
                catalog.presets.push(preset.clone());
            }
        }
        catalog
    }

    /// Look up a preset by name, ignoring case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&PastaPreset> {
        self.presets.iter().find(|p| p.matches(name))
    }

    /// All presets in display order.
    #[must_use]
    pub fn presets(&self) -> &[PastaPreset] { &self.presets }

    /// Presets in one category.
    pub fn by_category(&self, category: PresetCategory) -> impl Iterator<Item = &PastaPreset> {
        self.presets.iter().filter(move |p| p.category == category)
    }

    /// Check a cook time for the pasta called `name`.
    ///
    /// Names without a preset are treated as plain pasta.
    ///
    /// # Errors
    ///
    /// `InvalidDuration` if `secs` is zero or outside the preset's bounds.
    pub fn validate_cook_time(&self, name: &str, secs: u32) -> Result<u32, Rejection> {
        let category = self.find(name).map_or(PresetCategory::Pasta, |p| p.category);
        validate_for_category(category, secs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets() {
        let presets = builtin_presets();
        assert_eq!(presets.len(), 9);
        assert_eq!(presets.iter().filter(|p| p.category == PresetCategory::Ravioli).count(), 3);
    }

    #[test]
    fn test_find_preset_ignores_case() {
        let preset = find_preset("SPAGHETTI").unwrap();
        assert_eq!(preset.cook_time, 240);
        assert_eq!(find_preset("Sedanini").unwrap().cook_time, 90);
        assert!(find_preset("lasagne").is_none());
    }

    #[test]
    fn test_ravioli_bounds() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(catalog.validate_cook_time("ravioli - spinach", 240), Ok(240));
        assert_eq!(catalog.validate_cook_time("ravioli - spinach", 600), Ok(600));
        assert_eq!(
            catalog.validate_cook_time("ravioli - spinach", 601),
            Err(Rejection::InvalidDuration {
                secs: 601,
                min: Some(240),
                max: Some(600),
            })
        );
        assert!(catalog.validate_cook_time("Ravioli - Brasato", 200).is_err());
    }

    #[test]
    fn test_plain_pasta_accepts_any_positive_time() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(catalog.validate_cook_time("fusilli", 1), Ok(1));
        assert_eq!(catalog.validate_cook_time("fusilli", 3_600), Ok(3_600));
        assert_eq!(catalog.validate_cook_time("my own pasta", 45), Ok(45));
        assert!(catalog.validate_cook_time("fusilli", 0).is_err());
    }

    #[test]
    fn test_overrides_replace_and_append() {
        let extra = vec![
            PastaPreset::new("Spaghetti", 300, PresetCategory::Pasta),
            PastaPreset::new("orecchiette", 660, PresetCategory::Pasta),
        ];
        let catalog = PresetCatalog::with_overrides(&extra);

        assert_eq!(catalog.presets().len(), 10);
        assert_eq!(catalog.find("spaghetti").unwrap().cook_time, 300);
        // Replaced in place, so display order is kept
        assert_eq!(catalog.presets()[0].name, "Spaghetti");
        assert_eq!(catalog.find("orecchiette").unwrap().cook_time, 660);
        assert_eq!(catalog.by_category(PresetCategory::Ravioli).count(), 3);
    }

    #[test]
    fn test_preset_deserializes_with_default_category() {
        let preset: PastaPreset =
            serde_json::from_str(r#"{ "name": "penne", "cookTime": 660 }"#).unwrap();
        assert_eq!(preset.category, PresetCategory::Pasta);
        assert_eq!(preset.validate_cook_time(660), Ok(660));
    }
}
