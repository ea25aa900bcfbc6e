//! Drag session tracking for tray rearrangement.
//!
//! # Flow
//!
//! 1. The gesture layer recognises a drag on a tray and calls
//!    [`SinkState::begin_drag`], which records the tray and its cells
//! 2. While the pointer moves, [`DragSession::hover`] resolves what a drop on
//!    the hovered cell would do, for highlighting only
//! 3. On release, [`SinkState::drop_tray`] resolves the drop again against the
//!    current sink and commits it:
//!    - an ordinary move if the tray fits with its own cells freed
//!    - otherwise a swap, if every displaced tray can be re-homed
//!    - otherwise nothing changes
//!
//! Cancelling a drag is dropping the session. Nothing was applied, so there
//! is nothing to roll back.

use serde::Serialize;

use super::geometry;
use super::placement::{Rejection, can_place};
use super::state::SinkState;
use super::swap::{SwapPlan, find_swap_plan};
use super::types::{Cell, CellSet, LayoutMode, Tray, TrayId};

// ============================================================================
// Drop Resolution
// ============================================================================

/// What dropping the dragged tray on a cell would do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DropPreview {
    /// The tray fits at `anchor` with its own cells freed.
    Move { anchor: Cell, cells: CellSet },

    /// The target is taken, but the occupants can be moved out of the way.
    Swap { plan: SwapPlan },

    /// Neither a move nor a swap is possible.
    Blocked,
}

impl DropPreview {
    /// Cells the dragged tray would cover, if the drop is possible.
    #[must_use]
    pub fn target_cells(&self) -> Option<&CellSet> {
        match self {
            Self::Move { cells, .. } => Some(cells),
            Self::Swap { plan } => Some(&plan.cells),
            Self::Blocked => None,
        }
    }

    /// Returns true if the drop would change the sink.
    #[must_use]
    pub const fn is_possible(&self) -> bool { !matches!(self, Self::Blocked) }
}

/// What a committed drop did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DropOutcome {
    /// The tray moved on its own.
    Moved { anchor: Cell },

    /// The tray moved and displaced others per `plan`.
    Swapped { plan: SwapPlan },
}

/// Anchor for an ordinary move of `tray` onto `cell`, if one is legal.
fn move_anchor(trays: &[Tray], tray: &Tray, cell: Cell, layout: LayoutMode) -> Option<Cell> {
    let exclude = [tray.id];
    if tray.size.is_block() {
        geometry::anchors_covering(cell, tray.size, layout)
            .into_iter()
            .find(|&anchor| can_place(trays, anchor, tray.size, layout, &exclude))
    } else {
        can_place(trays, cell, tray.size, layout, &exclude).then_some(cell)
    }
}

/// Resolve a drop of `tray` on `cell`: ordinary move first, swap second.
fn resolve_drop(trays: &[Tray], tray: &Tray, cell: Cell, layout: LayoutMode) -> DropPreview {
    if let Some(anchor) = move_anchor(trays, tray, cell, layout) {
        return DropPreview::Move {
            anchor,
            cells: geometry::occupied_cells(anchor, tray.size, layout),
        };
    }

    match find_swap_plan(trays, tray.id, cell, layout) {
        Some(plan) => DropPreview::Swap { plan },
        None => DropPreview::Blocked,
    }
}

// ============================================================================
// Drag Session
// ============================================================================

/// An in-progress drag of one tray.
#[derive(Clone, Debug)]
pub struct DragSession {
    tray: TrayId,
    origin: CellSet,
    hovered: Option<(Cell, DropPreview)>,
}

impl DragSession {
    /// The tray being dragged.
    #[must_use]
    pub const fn tray(&self) -> TrayId { self.tray }

    /// Cells the tray covered when the drag started.
    #[must_use]
    pub fn origin(&self) -> &CellSet { &self.origin }

    /// The last hovered cell and its preview.
    #[must_use]
    pub fn hovered(&self) -> Option<(Cell, &DropPreview)> {
        self.hovered.as_ref().map(|(cell, preview)| (*cell, preview))
    }

    /// Resolve what dropping on `cell` would do and remember it.
    ///
    /// Re-hovering the same cell recomputes, since the sink may have changed.
    pub fn hover(&mut self, state: &SinkState, cell: Cell, layout: LayoutMode) -> &DropPreview {
        let preview = match state.tray(self.tray) {
            Some(tray) => self.resolve(state.trays(), tray, cell, layout),
            None => DropPreview::Blocked,
        };
        tracing::trace!(tray = %self.tray, %cell, possible = preview.is_possible(), "drag hover");

        &self.hovered.insert((cell, preview)).1
    }

    /// Forget the hovered cell (pointer left the sink).
    pub fn leave(&mut self) { self.hovered = None; }

    /// Dropping back onto the cells the drag started from keeps the tray
    /// where it was, as long as nothing moved it meanwhile.
    fn resolve(&self, trays: &[Tray], tray: &Tray, cell: Cell, layout: LayoutMode) -> DropPreview {
        match self.origin.first() {
            Some(&anchor) if tray.cells == self.origin && self.origin.contains(&cell) => {
                DropPreview::Move { anchor, cells: self.origin.clone() }
            }
            _ => resolve_drop(trays, tray, cell, layout),
        }
    }
}

impl SinkState {
    /// Start dragging a tray. Returns `None` if the tray does not exist.
    #[must_use]
    pub fn begin_drag(&self, tray: TrayId) -> Option<DragSession> {
        let found = self.tray(tray)?;
        tracing::debug!(%tray, anchor = ?found.anchor(), "drag started");
        Some(DragSession {
            tray,
            origin: found.cells.clone(),
            hovered: None,
        })
    }

    /// Finish a drag by dropping on `cell`.
    ///
    /// The drop is resolved against the current sink, never against the
    /// session's last preview. An ordinary move is tried first and a swap only
    /// when the move is illegal.
    ///
    /// # Errors
    ///
    /// - `TrayNotFound` if the dragged tray was removed meanwhile
    /// - `OutOfBounds` if `cell` is outside the sink
    /// - `NoSwap` if neither a move nor a swap is possible
    pub fn drop_tray(
        &mut self,
        session: DragSession,
        cell: Cell,
        layout: LayoutMode,
    ) -> Result<DropOutcome, Rejection> {
        let id = session.tray;
        let tray = self.tray(id).ok_or(Rejection::TrayNotFound { tray: id })?;
        if !cell.in_bounds() {
            return Err(Rejection::OutOfBounds { cell });
        }

        match session.resolve(self.trays(), tray, cell, layout) {
            DropPreview::Move { anchor, .. } => {
                self.move_tray(id, anchor, layout)?;
                Ok(DropOutcome::Moved { anchor })
            }
            DropPreview::Swap { plan } => {
                self.swap_trays(id, plan.anchor, &plan, layout)?;
                Ok(DropOutcome::Swapped { plan })
            }
            DropPreview::Blocked => {
                tracing::debug!(tray = %id, %cell, "drop blocked");
                Err(Rejection::NoSwap { tray: id, target: cell })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
