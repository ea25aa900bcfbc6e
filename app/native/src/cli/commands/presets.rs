//! Presets CLI command.

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config::SinkConfig;
use crate::error::SinkError;
use crate::presets::PastaPreset;

/// Execute the presets command.
///
/// # Errors
///
/// Returns an error if the presets cannot be serialized.
pub fn execute(config: &SinkConfig, json: bool) -> Result<(), SinkError> {
    let catalog = config.preset_catalog();

    if json {
        output::print_highlighted_json(&serde_json::to_value(catalog.presets())?);
        return Ok(());
    }

    let count = catalog.presets().len();
    println!("{}", format!("Presets ({count})").bold());
    println!("{}", presets_table(catalog.presets()));
    Ok(())
}

fn presets_table(presets: &[PastaPreset]) -> String {
    #[derive(Tabled)]
    struct PresetRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Cook time")]
        cook_time: String,
        #[tabled(rename = "Allowed")]
        allowed: String,
    }

    let rows: Vec<PresetRow> = presets
        .iter()
        .map(|p| PresetRow {
            name: p.name.clone(),
            category: p.category.to_string(),
            cook_time: output::format_clock(i64::from(p.cook_time)),
            allowed: p.category.cook_time_bounds().map_or_else(
                || "any".to_string(),
                |(min, max)| {
                    format!(
                        "{}-{}",
                        output::format_clock(i64::from(min)),
                        output::format_clock(i64::from(max))
                    )
                },
            ),
        })
        .collect();

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string()
}
