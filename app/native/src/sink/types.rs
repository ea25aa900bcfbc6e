//! Core data types for the sink.
//!
//! These types form a simple ownership tree:
//! - `SinkSnapshot` owns every `Tray` currently placed in the sink
//! - `Tray` owns its `CookingItem`s and the cells it covers
//!
//! Cells are addressed by a flat index `0..8`. How that index maps to rows and
//! columns depends on the `LayoutMode`, which is supplied by the caller on
//! every geometry call and never stored here.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use super::geometry;

/// Number of addressable cells in the sink.
pub const SINK_CELLS: u8 = 8;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

// ============================================================================
// Cell Types
// ============================================================================

/// A flat cell index into the sink.
///
/// The value is not range-checked on construction so that callers can pass
/// raw indices through and let the placement validator reject them.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cell(u8);

impl Cell {
    /// Create a cell from a raw index.
    #[must_use]
    pub const fn new(index: u8) -> Self { Self(index) }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> u8 { self.0 }

    /// Returns true if the cell lies inside the sink.
    #[must_use]
    pub const fn in_bounds(self) -> bool { self.0 < SINK_CELLS }

    /// Iterate over every cell of the sink in ascending order.
    pub fn all() -> impl Iterator<Item = Self> { (0..SINK_CELLS).map(Self) }

    /// Returns the cell `offset` positions further along, saturating at `u8::MAX`.
    #[must_use]
    pub const fn offset(self, offset: u8) -> Self { Self(self.0.saturating_add(offset)) }
}

impl From<u8> for Cell {
    fn from(index: u8) -> Self { Self(index) }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Cells covered by a single tray. Never more than four.
pub type CellSet = SmallVec<[Cell; 4]>;

/// Candidate anchor cells. Never more than the whole sink.
pub type AnchorList = SmallVec<[Cell; 8]>;

// ============================================================================
// Layout Mode
// ============================================================================

/// Arrangement of the eight cells on screen.
///
/// The presentation decides this (typically from the viewport width); the
/// core only needs the column count to know which cells form a 2×2 block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Four columns, two rows.
    #[default]
    Wide,

    /// Two columns, four rows.
    Narrow,
}

impl LayoutMode {
    /// Number of columns in this arrangement.
    #[must_use]
    pub const fn columns(self) -> u8 {
        match self {
            Self::Wide => 4,
            Self::Narrow => 2,
        }
    }

    /// Number of rows in this arrangement.
    #[must_use]
    pub const fn rows(self) -> u8 { SINK_CELLS / self.columns() }

    /// Picks the arrangement for a viewport width.
    ///
    /// Widths at or below `narrow_breakpoint` use the narrow arrangement.
    #[must_use]
    pub const fn for_viewport_width(width: u32, narrow_breakpoint: u32) -> Self {
        if width <= narrow_breakpoint { Self::Narrow } else { Self::Wide }
    }

    /// Returns the mode name as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::Narrow => "narrow",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ============================================================================
// Tray Size
// ============================================================================

/// Size class of a tray.
///
/// All size-dependent behaviour goes through `footprint` and `capacity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TraySize {
    /// One cell, one item.
    Regular,

    /// One cell, two items.
    Large,

    /// A 2×2 block, six items.
    ExtraLarge,
}

impl TraySize {
    /// Every size class, smallest first.
    pub const ALL: [Self; 3] = [Self::Regular, Self::Large, Self::ExtraLarge];

    /// Number of cells a tray of this size covers.
    #[must_use]
    pub const fn footprint(self) -> usize {
        match self {
            Self::Regular | Self::Large => 1,
            Self::ExtraLarge => 4,
        }
    }

    /// Number of cooking items a tray of this size holds.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Regular => 1,
            Self::Large => 2,
            Self::ExtraLarge => 6,
        }
    }

    /// Returns true if this size covers more than one cell.
    #[must_use]
    pub const fn is_block(self) -> bool { self.footprint() > 1 }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Large => "Large (2x)",
            Self::ExtraLarge => "Extra Large (6x)",
        }
    }

    /// Short description of footprint and capacity.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Regular => "1 position, 1 pasta",
            Self::Large => "1 position, 2 pastas",
            Self::ExtraLarge => "4 positions, 6 pastas",
        }
    }

    /// Returns the size name as used in scripts and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Large => "large",
            Self::ExtraLarge => "extraLarge",
        }
    }
}

impl fmt::Display for TraySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ============================================================================
// Identifiers
// ============================================================================

/// Unique tray identifier (UUID v7 for time-ordering).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrayId(Uuid);

impl TrayId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self { Self(Uuid::now_v7()) }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid { &self.0 }
}

impl Default for TrayId {
    fn default() -> Self { Self::new() }
}

impl fmt::Display for TrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Unique cooking item identifier (UUID v7 for time-ordering).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn new() -> Self { Self(Uuid::now_v7()) }
}

impl Default for ItemId {
    fn default() -> Self { Self::new() }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ============================================================================
// Cooking Item
// ============================================================================

/// A timed item cooking in a tray.
///
/// Only the start instant and total duration are stored; elapsed and remaining
/// time are always derived from a caller-supplied "now".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingItem {
    /// Unique identifier.
    pub id: ItemId,

    /// Display name (e.g., "spaghetti").
    pub name: String,

    /// Total cook time in seconds. Always positive.
    pub duration_secs: u32,

    /// When cooking started.
    pub started_at: Timestamp,
}

impl CookingItem {
    /// Whole seconds elapsed since the item started.
    #[must_use]
    pub const fn elapsed_secs(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.started_at) / 1000
    }

    /// Seconds left until done. Negative once the item is overcooked.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)] // elapsed seconds fit comfortably in i64
    pub const fn remaining_secs(&self, now: Timestamp) -> i64 {
        self.duration_secs as i64 - self.elapsed_secs(now) as i64
    }

    /// Returns true once the full duration has elapsed.
    #[must_use]
    pub const fn is_done(&self, now: Timestamp) -> bool { self.remaining_secs(now) <= 0 }

    /// Progress towards done, capped at 100.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self, now: Timestamp) -> f64 {
        if self.duration_secs == 0 {
            return 100.0;
        }
        let elapsed = self.elapsed_secs(now) as f64;
        (elapsed / f64::from(self.duration_secs) * 100.0).min(100.0)
    }
}

// ============================================================================
// Tray
// ============================================================================

/// A tray placed in the sink.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tray {
    /// Unique identifier.
    pub id: TrayId,

    /// Size class.
    pub size: TraySize,

    /// Cells covered, anchor first.
    pub cells: CellSet,

    /// Items in insertion order.
    pub items: Vec<CookingItem>,
}

impl Tray {
    /// The anchor (top-left) cell.
    #[must_use]
    pub fn anchor(&self) -> Option<Cell> { self.cells.first().copied() }

    /// Returns true if the tray covers `cell`.
    #[must_use]
    pub fn covers(&self, cell: Cell) -> bool { self.cells.contains(&cell) }

    /// Number of further items this tray can hold.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.size.capacity().saturating_sub(self.items.len())
    }

    /// Returns true if no further item fits.
    #[must_use]
    pub fn is_full(&self) -> bool { self.remaining_capacity() == 0 }

    /// Find an item by ID.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&CookingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Checks that the cell set matches the size's footprint shape.
    ///
    /// A tray built by `SinkState` always satisfies this for the layout it was
    /// placed under. A violation means the tray was constructed by hand.
    #[must_use]
    pub fn is_consistent(&self, layout: LayoutMode) -> bool {
        let Some(anchor) = self.anchor() else {
            return false;
        };
        self.cells.len() == self.size.footprint()
            && self.cells.iter().all(|cell| cell.in_bounds())
            && self.cells == geometry::occupied_cells(anchor, self.size, layout)
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// The complete, immutable state of the sink at one instant.
///
/// `SinkState` replaces the whole snapshot on every successful command, so a
/// reader holding one never observes a half-applied change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkSnapshot {
    /// Incremented on every replacement.
    pub revision: u64,

    /// Trays in placement order.
    pub trays: Vec<Tray>,
}

impl SinkSnapshot {
    /// Get a tray by ID.
    #[must_use]
    pub fn tray(&self, id: TrayId) -> Option<&Tray> { self.trays.iter().find(|t| t.id == id) }

    /// Get the tray covering a cell.
    #[must_use]
    pub fn tray_at(&self, cell: Cell) -> Option<&Tray> {
        self.trays.iter().find(|t| t.covers(cell))
    }

    /// Get the index of a tray by ID.
    #[must_use]
    pub fn tray_index(&self, id: TrayId) -> Option<usize> {
        self.trays.iter().position(|t| t.id == id)
    }

    /// Check if the sink holds no trays.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.trays.is_empty() }

    /// Total number of cooking items across all trays.
    #[must_use]
    pub fn item_count(&self) -> usize { self.trays.iter().map(|t| t.items.len()).sum() }
}

// ============================================================================
// Tests
// ============================================================================
