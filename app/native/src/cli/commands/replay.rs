//! Replay CLI command.
//!
//! Runs a session script and prints what each step did, followed by the
//! final sink as a grid and a tray table.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::cli::script::{Replayer, StepReport, load_script};
use crate::config::{LayoutPreference, SinkConfig, expand_path};
use crate::error::SinkError;
use crate::sink::{LayoutMode, SinkSnapshot, Timestamp};

/// Arguments for `pasta-sink replay`.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the session script (JSONC).
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Layout mode: auto, wide or narrow. Overrides the configuration.
    #[arg(long, short)]
    pub layout: Option<LayoutPreference>,

    /// Viewport width in pixels, used to pick a layout in auto mode.
    #[arg(long, value_name = "PIXELS")]
    pub viewport_width: Option<u32>,

    /// Output as JSON.
    #[arg(long, short)]
    pub json: bool,
}

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the script cannot be read or parsed. Refused steps are
/// part of the output, not errors.
pub fn execute(args: &ReplayArgs, config: &SinkConfig) -> Result<(), SinkError> {
    let script = load_script(&expand_path(&args.script))?;

    let viewport_width = args.viewport_width.or(config.layout.viewport_width);
    let layout = config.layout.resolve_with(args.layout, viewport_width);
    tracing::debug!(
        script = %args.script.display(),
        steps = script.steps.len(),
        %layout,
        "replaying session"
    );

    let mut replayer = Replayer::new(config, layout, viewport_width);
    let reports = replayer.run(&script);
    let state = replayer.state();

    if args.json {
        let value = serde_json::json!({
            "layout": replayer.layout(),
            "now": state.now(),
            "steps": reports,
            "sink": state.snapshot(),
        });
        output::print_highlighted_json(&value);
    } else {
        print_reports(&reports);
        println!();
        print_sink(state.snapshot(), replayer.layout(), state.now());
    }

    Ok(())
}

fn print_reports(reports: &[StepReport]) {
    let refused = reports.iter().filter(|r| !r.applied).count();
    println!("{}", format!("Steps ({}, {refused} refused)", reports.len()).bold());

    for report in reports {
        let message = if report.applied {
            report.message.normal()
        } else {
            report.message.red()
        };
        println!(
            "  {} {:>3}. {:<28} {message}",
            output::format_applied(report.applied),
            report.index,
            report.step
        );
    }
}

fn print_sink(snapshot: &SinkSnapshot, layout: LayoutMode, now: Timestamp) {
    #[derive(Tabled)]
    struct TrayRow {
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Cells")]
        cells: String,
        #[tabled(rename = "Load")]
        load: String,
        #[tabled(rename = "Items")]
        items: String,
    }

    println!("{}", format!("Sink ({layout}, revision {})", snapshot.revision).bold());
    println!("{}", output::render_grid(snapshot, layout));

    if snapshot.is_empty() {
        println!("\n{}", "No trays placed.".dimmed());
        return;
    }

    let rows: Vec<TrayRow> = snapshot
        .trays
        .iter()
        .enumerate()
        .map(|(i, tray)| TrayRow {
            index: i + 1,
            size: tray.size.label().to_string(),
            cells: tray.cells.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            load: format!("{}/{}", tray.items.len(), tray.size.capacity()),
            items: if tray.items.is_empty() {
                "-".to_string()
            } else {
                tray.items
                    .iter()
                    .map(|item| output::format_item(item, now))
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .with(Modify::new(Columns::new(3..4)).with(Alignment::center()))
        .to_string();

    println!("\n{table}");
}
