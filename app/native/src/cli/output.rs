//! CLI output formatting utilities.
//!
//! Highlighted JSON, the text rendering of the sink grid and timer formatting.

use colored::Colorize;

use crate::sink::{Cell, CookingItem, LayoutMode, SinkSnapshot, Timestamp};

/// Prints a JSON value pretty-printed with colored keys and scalars.
pub fn print_highlighted_json(value: &serde_json::Value) {
    let mut out = String::new();
    highlight_json(value, 0, &mut out);
    println!("{out}");
}

/// Appends `value` to `out` in the same shape as `to_string_pretty`, with keys
/// in cyan, strings green, numbers yellow, booleans and null magenta.
fn highlight_json(value: &serde_json::Value, depth: usize, out: &mut String) {
    use serde_json::Value;

    let pad = |depth: usize| "  ".repeat(depth);
    match value {
        Value::Null | Value::Bool(_) => out.push_str(&value.to_string().magenta().to_string()),
        Value::Number(n) => out.push_str(&n.to_string().yellow().to_string()),
        Value::String(_) => out.push_str(&value.to_string().green().to_string()),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(fields) if fields.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push_str(&"[".bold().to_string());
            for (i, item) in items.iter().enumerate() {
                out.push_str(if i == 0 { "\n" } else { ",\n" });
                out.push_str(&pad(depth + 1));
                highlight_json(item, depth + 1, out);
            }
            out.push_str(&format!("\n{}{}", pad(depth), "]".bold()));
        }
        Value::Object(fields) => {
            out.push_str(&"{".bold().to_string());
            for (i, (key, field)) in fields.iter().enumerate() {
                out.push_str(if i == 0 { "\n" } else { ",\n" });
                let key = Value::from(key.as_str()).to_string();
                out.push_str(&format!("{}{}: ", pad(depth + 1), key.cyan()));
                highlight_json(field, depth + 1, out);
            }
            out.push_str(&format!("\n{}{}", pad(depth), "}".bold()));
        }
    }
}

/// Shortens `s` to at most `max_chars` characters, ending in `…` when cut.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().nth(max_chars).is_none() {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Check or cross mark for whether a replay step was applied.
#[must_use]
pub fn format_applied(applied: bool) -> String {
    if applied { "✓".green().to_string() } else { "✗".red().to_string() }
}

// ============================================================================
// Sink rendering
// ============================================================================

/// Renders the sink as rows of cells in the given layout.
///
/// Each cell shows the 1-based position of the tray covering it in the
/// snapshot, or `·` when free:
///
/// ```text
/// [ 1 ][ 1 ][ 2 ][ · ]
/// [ 1 ][ 1 ][ · ][ 3 ]
/// ```
#[must_use]
pub fn render_grid(snapshot: &SinkSnapshot, layout: LayoutMode) -> String {
    let columns = usize::from(layout.columns());
    let cells: Vec<String> = Cell::all()
        .map(|cell| {
            snapshot
                .trays
                .iter()
                .position(|t| t.covers(cell))
                .map_or_else(|| "[ · ]".to_string(), |i| format!("[{:^3}]", i + 1))
        })
        .collect();

    cells.chunks(columns).map(<[String]>::concat).collect::<Vec<_>>().join("\n")
}

/// Formats seconds as `m:ss`, with a leading `-` for negative values.
#[must_use]
pub fn format_clock(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let abs = secs.unsigned_abs();
    format!("{sign}{}:{:02}", abs / 60, abs % 60)
}

/// Describes an item's timer at `now`: time left, or how long it is overdone.
#[must_use]
pub fn format_item(item: &CookingItem, now: Timestamp) -> String {
    let remaining = item.remaining_secs(now);
    let name = truncate(&item.name, 24);
    match remaining {
        r if r > 0 => format!("{name} ({} left)", format_clock(r)),
        0 => format!("{name} (done)"),
        r => format!("{name} (done +{})", format_clock(-r)),
    }
}
