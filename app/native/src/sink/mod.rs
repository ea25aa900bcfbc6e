//! The sink: eight cells, trays of three sizes, and the rules for moving them.
//!
//! This module contains:
//! - Core types (`Cell`, `TraySize`, `LayoutMode`, `Tray`, `CookingItem`)
//! - Pure geometry, occupancy and placement checks
//! - The swap resolver that re-homes trays displaced by a drop
//! - The `SinkState` store and drag sessions built on top of them
//!
//! Layout mode is passed into every call that depends on it and is never
//! stored, so a layout change between two calls is always honoured.

pub mod drag;
pub mod geometry;
pub mod occupancy;
pub mod placement;
pub mod swap;

mod state;
mod types;

pub use drag::{DragSession, DropOutcome, DropPreview};
pub use occupancy::OccupancyMap;
pub use placement::{Rejection, can_place, check_placement, first_free_anchor};
pub use state::SinkState;
pub use swap::{PlannedMove, SwapPlan, apply_swap_plan, find_swap_plan};
pub use types::{
    AnchorList, Cell, CellSet, CookingItem, ItemId, LayoutMode, SINK_CELLS, SinkSnapshot,
    Timestamp, Tray, TrayId, TraySize,
};
