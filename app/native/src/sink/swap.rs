//! Swap resolution - making room for a dragged tray by displacing others.
//!
//! When a tray is dropped on cells held by other trays, every tray touching
//! the drop target is lifted out and given a new anchor. The search is greedy
//! and never backtracks:
//!
//! 1. Resolve the cells the dragged tray would cover at the target.
//! 2. Collect every other tray owning one of those cells, in cell order.
//! 3. Place displaced trays largest first (blocks have the fewest anchors).
//! 4. For each, try anchors in ascending order, cells vacated by the dragged
//!    tray first, skipping anything already claimed.
//! 5. If any displaced tray finds no anchor, there is no plan at all.
//!
//! Planning is pure. Applying a plan builds the next tray list in one go so
//! the store can swap it in atomically.

use std::cmp::Reverse;

use serde::Serialize;
use smallvec::SmallVec;

use super::geometry;
use super::occupancy::OccupancyMap;
use super::placement::{Rejection, check_placement};
use super::types::{AnchorList, Cell, CellSet, LayoutMode, SINK_CELLS, Tray, TrayId};

/// New position for one displaced tray.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMove {
    /// The displaced tray.
    pub tray: TrayId,

    /// Its new anchor.
    pub anchor: Cell,

    /// The cells it would cover from that anchor.
    pub cells: CellSet,
}

/// A complete reassignment that lets a dragged tray take an occupied target.
///
/// Only produced when every displaced tray received a non-conflicting anchor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapPlan {
    /// The dragged tray.
    pub tray: TrayId,

    /// Anchor the dragged tray moves to.
    pub anchor: Cell,

    /// Cells the dragged tray would cover.
    pub cells: CellSet,

    /// Every displaced tray with its new anchor, in placement order.
    pub displaced: SmallVec<[PlannedMove; 4]>,
}

impl SwapPlan {
    /// New anchor planned for `tray`, if it is part of the plan.
    #[must_use]
    pub fn anchor_for(&self, tray: TrayId) -> Option<Cell> {
        if tray == self.tray {
            return Some(self.anchor);
        }
        self.displaced.iter().find(|m| m.tray == tray).map(|m| m.anchor)
    }

    /// IDs of every displaced tray.
    pub fn displaced_ids(&self) -> impl Iterator<Item = TrayId> + '_ {
        self.displaced.iter().map(|m| m.tray)
    }
}

/// Cells the dragged tray would cover when dropped on `target`.
///
/// Block trays take the first valid block covering `target`.
fn drop_cells(tray: &Tray, target: Cell, layout: LayoutMode) -> Option<(Cell, CellSet)> {
    if tray.size.is_block() {
        let anchor = geometry::anchors_covering(target, tray.size, layout).first().copied()?;
        Some((anchor, geometry::occupied_cells(anchor, tray.size, layout)))
    } else {
        Some((target, geometry::occupied_cells(target, tray.size, layout)))
    }
}

/// Finds a swap plan for dropping `dragging` on `target`.
///
/// Returns `None` when the tray does not exist, when no block covers the
/// target, when nothing needs displacing (an ordinary move applies), or when
/// some displaced tray cannot be re-homed.
#[must_use]
pub fn find_swap_plan(
    trays: &[Tray],
    dragging: TrayId,
    target: Cell,
    layout: LayoutMode,
) -> Option<SwapPlan> {
    let dragged = trays.iter().find(|t| t.id == dragging)?;

    let Some((anchor, target_cells)) = drop_cells(dragged, target, layout) else {
        tracing::debug!(tray = %dragging, %target, "swap: no block covers target");
        return None;
    };

    // Every other tray touching the target, in the order their cells appear.
    let others = OccupancyMap::build(trays, &[dragging]);
    let mut displaced_ids: SmallVec<[TrayId; 4]> = SmallVec::new();
    for &cell in &target_cells {
        if let Some(owner) = others.owner(cell)
            && !displaced_ids.contains(&owner)
        {
            displaced_ids.push(owner);
        }
    }

    if displaced_ids.is_empty() {
        tracing::debug!(tray = %dragging, %target, "swap: target is free, nothing to displace");
        return None;
    }

    let mut displaced: SmallVec<[&Tray; 4]> =
        displaced_ids.iter().filter_map(|id| trays.iter().find(|t| t.id == *id)).collect();
    // Stable: equal footprints keep encounter order.
    displaced.sort_by_key(|t| Reverse(t.size.footprint()));

    let mut exclude: SmallVec<[TrayId; 5]> = SmallVec::new();
    exclude.push(dragging);
    exclude.extend(displaced_ids.iter().copied());

    let vacated = &dragged.cells;
    let mut assigned: AnchorList = target_cells.iter().copied().collect();
    let mut moves: SmallVec<[PlannedMove; 4]> = SmallVec::new();

    for tray in displaced {
        let mut candidates = geometry::valid_anchors(tray.size, layout);
        candidates.sort_by_key(|anchor| !vacated.contains(anchor));

        let found = candidates.into_iter().find_map(|candidate| {
            let Ok(cells) = check_placement(trays, candidate, tray.size, layout, &exclude) else {
                tracing::trace!(tray = %tray.id, %candidate, "swap: candidate blocked");
                return None;
            };
            if cells.iter().any(|cell| assigned.contains(cell)) {
                tracing::trace!(tray = %tray.id, %candidate, "swap: candidate already claimed");
                return None;
            }
            Some((candidate, cells))
        });

        let Some((new_anchor, cells)) = found else {
            tracing::debug!(
                tray = %dragging,
                %target,
                stuck = %tray.id,
                "swap: displaced tray has nowhere to go"
            );
            return None;
        };

        assigned.extend(cells.iter().copied());
        moves.push(PlannedMove {
            tray: tray.id,
            anchor: new_anchor,
            cells,
        });
    }

    tracing::debug!(
        tray = %dragging,
        %target,
        %anchor,
        displaced = moves.len(),
        "swap: plan found"
    );

    Some(SwapPlan {
        tray: dragging,
        anchor,
        cells: target_cells,
        displaced: moves,
    })
}

/// Builds the tray list that results from applying `plan`.
///
/// The dragged tray moves to `new_anchor` and every displaced tray to its
/// planned anchor. The result is checked as a whole (valid anchors, cells in
/// bounds, no cell shared) so a plan computed against an older sink can never
/// produce an overlapping state.
///
/// # Errors
///
/// - `TrayNotFound` if the dragged tray or a displaced tray no longer exists
/// - `ConflictingPlan` if the plan is for another tray or anchor, or the
///   resulting sink would be inconsistent
pub fn apply_swap_plan(
    trays: &[Tray],
    dragging: TrayId,
    new_anchor: Cell,
    plan: &SwapPlan,
    layout: LayoutMode,
) -> Result<Vec<Tray>, Rejection> {
    if plan.tray != dragging || plan.anchor != new_anchor {
        return Err(Rejection::ConflictingPlan { tray: dragging });
    }

    let mut next = trays.to_vec();

    let mut relocate = |id: TrayId, anchor: Cell| -> Result<(), Rejection> {
        let tray = next
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Rejection::TrayNotFound { tray: id })?;
        if !geometry::is_valid_anchor(anchor, tray.size, layout) {
            return Err(Rejection::ConflictingPlan { tray: dragging });
        }
        tray.cells = geometry::occupied_cells(anchor, tray.size, layout);
        Ok(())
    };

    relocate(dragging, new_anchor)?;
    for planned in &plan.displaced {
        relocate(planned.tray, planned.anchor)?;
    }

    let mut claimed = [false; SINK_CELLS as usize];
    for cell in next.iter().flat_map(|t| t.cells.iter()) {
        let Some(slot) = claimed.get_mut(usize::from(cell.index())) else {
            return Err(Rejection::ConflictingPlan { tray: dragging });
        };
        if *slot {
            return Err(Rejection::ConflictingPlan { tray: dragging });
        }
        *slot = true;
    }

    Ok(next)
}

// ============================================================================
// Tests
// ============================================================================
