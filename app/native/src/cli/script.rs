//! Session scripts: a recorded sequence of sink gestures, replayed offline.
//!
//! A script is a JSONC document:
//!
//! ```jsonc
//! {
//!   // optional, overrides --layout
//!   "layout": "wide",
//!   "steps": [
//!     { "op": "place", "cell": 0, "size": "extraLarge" },
//!     { "op": "add", "cell": 0, "preset": "fusilli" },
//!     { "op": "advance", "seconds": 60 },
//!     { "op": "drop", "from": 0, "to": 2 }
//!   ]
//! }
//! ```
//!
//! Trays are addressed by any cell they cover. Steps run against a fresh sink
//! on a manual clock starting at zero, so replays are deterministic.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::ManualClock;
use crate::config::{LayoutConfig, LayoutPreference, SinkConfig};
use crate::error::SinkError;
use crate::presets::PresetCatalog;
use crate::sink::{Cell, DropOutcome, LayoutMode, Rejection, SinkState, Tray, TrayId, TraySize};

/// Name used for items added without a name or preset.
const FALLBACK_ITEM_NAME: &str = "pasta";

// ============================================================================
// Script Model
// ============================================================================

/// A parsed session script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionScript {
    /// Layout to start with. Command-line flags apply when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutPreference>,

    /// Steps in order.
    pub steps: Vec<Step>,
}

/// One gesture or clock change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    /// Place a tray anchored at `cell`.
    Place { cell: u8, size: TraySize },

    /// Tap an empty cell to place a tray there (blocks find a covering spot).
    Tap { cell: u8, size: TraySize },

    /// Place a tray at the first free anchor.
    AutoPlace { size: TraySize },

    /// Ordinary move of the tray at `from` to anchor `to`.
    Move { from: u8, to: u8 },

    /// Drag the tray at `from` and drop it on `to` (move, else swap).
    Drop { from: u8, to: u8 },

    /// Start cooking an item in the tray at `cell`.
    Add {
        cell: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preset: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seconds: Option<u32>,
    },

    /// Remove the tray at `cell` with its items.
    RemoveTray { cell: u8 },

    /// Remove the `index`th item (0-based) of the tray at `cell`.
    RemoveItem { cell: u8, index: usize },

    /// Move the clock forward.
    Advance { seconds: u64 },

    /// Switch layout mode.
    Layout { mode: LayoutPreference },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place { cell, size } => write!(f, "place {size} at {cell}"),
            Self::Tap { cell, size } => write!(f, "tap {size} on {cell}"),
            Self::AutoPlace { size } => write!(f, "auto-place {size}"),
            Self::Move { from, to } => write!(f, "move {from} -> {to}"),
            Self::Drop { from, to } => write!(f, "drop {from} -> {to}"),
            Self::Add { cell, name, preset, seconds } => {
                let what = name.as_deref().or(preset.as_deref()).unwrap_or(FALLBACK_ITEM_NAME);
                match seconds {
                    Some(secs) => write!(f, "add {what} ({secs}s) to {cell}"),
                    None => write!(f, "add {what} to {cell}"),
                }
            }
            Self::RemoveTray { cell } => write!(f, "remove tray at {cell}"),
            Self::RemoveItem { cell, index } => write!(f, "remove item {index} from {cell}"),
            Self::Advance { seconds } => write!(f, "advance {seconds}s"),
            Self::Layout { mode } => write!(f, "layout {mode}"),
        }
    }
}

/// Parse a JSONC session script.
///
/// # Errors
///
/// `ScriptError` if the text is not a valid script.
pub fn parse_script(source: &str) -> Result<SessionScript, SinkError> {
    let reader = json_comments::StripComments::new(source.as_bytes());
    serde_json::from_reader(reader).map_err(|err| SinkError::ScriptError(err.to_string()))
}

/// Read and parse a session script from disk.
///
/// # Errors
///
/// `IoError` if the file cannot be read, `ScriptError` if it does not parse.
pub fn load_script(path: &Path) -> Result<SessionScript, SinkError> {
    let source = std::fs::read_to_string(path).map_err(|err| {
        SinkError::ScriptError(format!("Failed to read script {}: {err}", path.display()))
    })?;
    parse_script(&source)
}

// ============================================================================
// Replay
// ============================================================================

/// Result of one replayed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    /// 1-based position in the script.
    pub index: usize,

    /// Human-readable step summary.
    pub step: String,

    /// Whether the step changed anything.
    pub applied: bool,

    /// What happened, or why it was refused.
    pub message: String,
}

/// Applies script steps to a private sink.
pub struct Replayer {
    state: SinkState,
    clock: ManualClock,
    layout: LayoutMode,
    layout_config: LayoutConfig,
    viewport_width: Option<u32>,
    catalog: PresetCatalog,
    default_cook_time: u32,
}

impl Replayer {
    /// Create a replayer on an empty sink at time zero.
    #[must_use]
    pub fn new(config: &SinkConfig, layout: LayoutMode, viewport_width: Option<u32>) -> Self {
        let clock = ManualClock::new(0);
        Self {
            state: SinkState::with_clock(clock.clone()),
            clock,
            layout,
            layout_config: config.layout.clone(),
            viewport_width,
            catalog: config.preset_catalog(),
            default_cook_time: config.timer.default_cook_time,
        }
    }

    /// The sink being driven.
    #[must_use]
    pub const fn state(&self) -> &SinkState { &self.state }

    /// The layout currently in effect.
    #[must_use]
    pub const fn layout(&self) -> LayoutMode { self.layout }

    /// Replay every step. Refused steps are reported and skipped.
    pub fn run(&mut self, script: &SessionScript) -> Vec<StepReport> {
        if let Some(mode) = script.layout
            && let Err(err) = self.set_layout(mode)
        {
            tracing::warn!(%mode, error = %err, "script layout ignored");
        }

        script
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let result = self.apply(step);
                if let Err(err) = &result {
                    tracing::debug!(index = i + 1, %step, error = %err, "step refused");
                }
                StepReport {
                    index: i + 1,
                    step: step.to_string(),
                    applied: result.is_ok(),
                    message: result.unwrap_or_else(|err| err.to_string()),
                }
            })
            .collect()
    }

    /// Apply one step, returning a description of what changed.
    ///
    /// # Errors
    ///
    /// `Rejected` for sink refusals, `InvalidArguments` for steps that name
    /// an empty cell or an unknown preset.
    pub fn apply(&mut self, step: &Step) -> Result<String, SinkError> {
        let layout = self.layout;
        match step {
            Step::Place { cell, size } => {
                let tray = self.state.place_tray(Cell::new(*cell), *size, layout)?;
                Ok(format!("placed {size} tray on {}", format_cells(&tray)))
            }
            Step::Tap { cell, size } => {
                let tray = self.state.place_at_cell(Cell::new(*cell), *size, layout)?;
                Ok(format!("placed {size} tray on {}", format_cells(&tray)))
            }
            Step::AutoPlace { size } => {
                let tray = self.state.auto_place_tray(*size, layout)?;
                Ok(format!("placed {size} tray on {}", format_cells(&tray)))
            }
            Step::Move { from, to } => {
                let id = self.tray_id_at(*from)?;
                let cells = self.state.move_tray(id, Cell::new(*to), layout)?;
                Ok(format!("moved tray to {}", join_cells(&cells)))
            }
            Step::Drop { from, to } => {
                let id = self.tray_id_at(*from)?;
                let session =
                    self.state.begin_drag(id).ok_or(Rejection::TrayNotFound { tray: id })?;
                match self.state.drop_tray(session, Cell::new(*to), layout)? {
                    DropOutcome::Moved { anchor } => Ok(format!("moved tray to anchor {anchor}")),
                    DropOutcome::Swapped { plan } => Ok(format!(
                        "swapped into anchor {}, displacing {} tray(s)",
                        plan.anchor,
                        plan.displaced.len()
                    )),
                }
            }
            Step::Add { cell, name, preset, seconds } => {
                self.add_item(*cell, name.as_deref(), preset.as_deref(), *seconds)
            }
            Step::RemoveTray { cell } => {
                let id = self.tray_id_at(*cell)?;
                let removed = self.state.remove_tray(id).ok_or(Rejection::TrayNotFound { tray: id })?;
                Ok(format!("removed {} tray with {} item(s)", removed.size, removed.items.len()))
            }
            Step::RemoveItem { cell, index } => {
                let tray = self.tray_at(*cell)?;
                let (tray_id, item_id) = tray
                    .items
                    .get(*index)
                    .map(|item| (tray.id, item.id))
                    .ok_or(Rejection::ItemNotFound { tray: tray.id })?;
                let removed = self
                    .state
                    .remove_item(tray_id, item_id)
                    .ok_or(Rejection::ItemNotFound { tray: tray_id })?;
                Ok(format!("removed {}", removed.name))
            }
            Step::Advance { seconds } => {
                self.clock.advance_secs(*seconds);
                Ok(format!("clock at {}", format_elapsed(self.clock_secs())))
            }
            Step::Layout { mode } => {
                self.set_layout(*mode)?;
                Ok(format!("layout is {}", self.layout))
            }
        }
    }

    /// Switch layout, unless an extra large tray would stop being a 2x2 block.
    fn set_layout(&mut self, mode: LayoutPreference) -> Result<(), Rejection> {
        let layout = self.layout_config.resolve_with(Some(mode), self.viewport_width);
        self.state.check_layout(layout)?;
        self.layout = layout;
        tracing::debug!(%mode, %layout, "layout changed");
        Ok(())
    }

    fn clock_secs(&self) -> u64 { self.state.now() / 1000 }

    fn tray_at(&self, cell: u8) -> Result<&Tray, SinkError> {
        let cell = Cell::new(cell);
        self.state.tray_at(cell).ok_or_else(|| Rejection::NoTrayAt { cell }.into())
    }

    fn tray_id_at(&self, cell: u8) -> Result<TrayId, SinkError> {
        self.tray_at(cell).map(|t| t.id)
    }

    fn add_item(
        &mut self,
        cell: u8,
        name: Option<&str>,
        preset: Option<&str>,
        seconds: Option<u32>,
    ) -> Result<String, SinkError> {
        let preset = match preset {
            Some(wanted) => Some(self.catalog.find(wanted).cloned().ok_or_else(|| {
                SinkError::InvalidArguments(format!("Unknown preset '{wanted}'"))
            })?),
            None => None,
        };

        let name = name
            .map(str::to_string)
            .or_else(|| preset.as_ref().map(|p| p.name.clone()))
            .unwrap_or_else(|| FALLBACK_ITEM_NAME.to_string());
        let secs = seconds
            .or_else(|| preset.as_ref().map(|p| p.cook_time))
            .unwrap_or(self.default_cook_time);

        let secs = match &preset {
            Some(p) => p.validate_cook_time(secs)?,
            None => self.catalog.validate_cook_time(&name, secs)?,
        };

        let tray_id = self.tray_id_at(cell)?;
        let item = self.state.add_item(tray_id, name, secs)?;
        Ok(format!("cooking {} for {}", item.name, format_elapsed(u64::from(secs))))
    }
}

fn join_cells(cells: &[Cell]) -> String {
    cells.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

fn format_cells(tray: &Tray) -> String {
    if tray.cells.len() == 1 {
        format!("cell {}", join_cells(&tray.cells))
    } else {
        format!("cells {}", join_cells(&tray.cells))
    }
}

/// Formats whole seconds as `m:ss`.
#[must_use]
pub fn format_elapsed(secs: u64) -> String { format!("{}:{:02}", secs / 60, secs % 60) }
