//! Placement validation.
//!
//! `check_placement` answers "may a tray of this size start at this cell if
//! these trays were lifted out?". It has no side effects, so previews, the
//! swap resolver and committing commands all share the same answer.

use serde::Serialize;
use thiserror::Error;

use super::geometry;
use super::occupancy::OccupancyMap;
use super::types::{Cell, CellSet, LayoutMode, Tray, TrayId, TraySize};

/// Why a sink command or query was refused.
///
/// Every variant is an ordinary outcome of user input. None of them leave the
/// sink in a changed state.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Rejection {
    /// The anchor is not a legal block start for this size and layout.
    #[error("cell {anchor} is not a valid anchor for a {size} tray in the {layout} layout")]
    InvalidAnchor {
        anchor: Cell,
        size: TraySize,
        layout: LayoutMode,
    },

    /// A cell lies outside the sink.
    #[error("cell {cell} is outside the sink")]
    OutOfBounds { cell: Cell },

    /// A cell is already taken by another tray.
    #[error("cell {cell} is occupied by tray {owner}")]
    Occupied { cell: Cell, owner: TrayId },

    /// The tray already holds as many items as its size allows.
    #[error("tray {tray} is full ({capacity} items)")]
    TrayFull { tray: TrayId, capacity: usize },

    /// No tray with this ID exists.
    #[error("tray {tray} not found")]
    TrayNotFound { tray: TrayId },

    /// The cell holds no tray.
    #[error("no tray at cell {cell}")]
    NoTrayAt { cell: Cell },

    /// The tray holds no item with this index or ID.
    #[error("item not found in tray {tray}")]
    ItemNotFound { tray: TrayId },

    /// A cook time of zero, or one outside the preset's allowed range.
    #[error("cook time of {secs}s is not allowed{}", bounds_suffix(.min, .max))]
    InvalidDuration {
        secs: u32,
        min: Option<u32>,
        max: Option<u32>,
    },

    /// No legal anchor is left anywhere for a tray of this size.
    #[error("no room left for another {size} tray")]
    NoSpace { size: TraySize },

    /// The dragged tray cannot take the target by displacing other trays.
    #[error("tray {tray} cannot be swapped into cell {target}")]
    NoSwap { tray: TrayId, target: Cell },

    /// A tray's cells do not form its footprint shape in the requested layout.
    #[error("tray {tray} does not fit the {layout} layout")]
    LayoutMismatch { tray: TrayId, layout: LayoutMode },

    /// A swap plan no longer fits the current sink.
    #[error("swap plan for tray {tray} conflicts with the current sink")]
    ConflictingPlan { tray: TrayId },
}

fn bounds_suffix(min: &Option<u32>, max: &Option<u32>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(" (expected {min}..={max}s)"),
        (Some(min), None) => format!(" (expected at least {min}s)"),
        (None, Some(max)) => format!(" (expected at most {max}s)"),
        (None, None) => String::new(),
    }
}

/// Checks whether a tray of `size` may be anchored at `anchor`.
///
/// Trays in `exclude` are treated as absent. On success returns the cells the
/// tray would cover.
///
/// # Errors
///
/// - `InvalidAnchor` if a block size does not start at a valid block anchor
/// - `OutOfBounds` if a covered cell lies outside the sink
/// - `Occupied` if a covered cell belongs to a tray not in `exclude`
pub fn check_placement(
    trays: &[Tray],
    anchor: Cell,
    size: TraySize,
    layout: LayoutMode,
    exclude: &[TrayId],
) -> Result<CellSet, Rejection> {
    if size.is_block() && !geometry::is_valid_anchor(anchor, size, layout) {
        return Err(Rejection::InvalidAnchor { anchor, size, layout });
    }

    let cells = geometry::occupied_cells(anchor, size, layout);

    // Unreachable for block anchors that passed the check above.
    if let Some(&cell) = cells.iter().find(|c| !c.in_bounds()) {
        return Err(Rejection::OutOfBounds { cell });
    }

    let occupancy = OccupancyMap::build(trays, exclude);
    for &cell in &cells {
        if let Some(owner) = occupancy.owner(cell) {
            return Err(Rejection::Occupied { cell, owner });
        }
    }

    Ok(cells)
}

/// Returns true if a tray of `size` may be anchored at `anchor`.
#[must_use]
pub fn can_place(
    trays: &[Tray],
    anchor: Cell,
    size: TraySize,
    layout: LayoutMode,
    exclude: &[TrayId],
) -> bool {
    check_placement(trays, anchor, size, layout, exclude).is_ok()
}

/// First valid anchor, ascending, at which a tray of `size` fits.
#[must_use]
pub fn first_free_anchor(
    trays: &[Tray],
    size: TraySize,
    layout: LayoutMode,
    exclude: &[TrayId],
) -> Option<Cell> {
    geometry::valid_anchors(size, layout)
        .into_iter()
        .find(|&anchor| can_place(trays, anchor, size, layout, exclude))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tray(size: TraySize, anchor: u8, layout: LayoutMode) -> Tray {
        Tray {
            id: TrayId::new(),
            size,
            cells: geometry::occupied_cells(Cell::new(anchor), size, layout),
            items: Vec::new(),
        }
    }

    #[test]
    fn test_empty_sink_accepts_every_valid_anchor() {
        for layout in [LayoutMode::Wide, LayoutMode::Narrow] {
            for size in TraySize::ALL {
                for anchor in geometry::valid_anchors(size, layout) {
                    assert!(can_place(&[], anchor, size, layout, &[]));
                }
            }
        }
    }

    #[test]
    fn test_single_cell_out_of_bounds() {
        let result = check_placement(&[], Cell::new(8), TraySize::Regular, LayoutMode::Wide, &[]);
        assert_eq!(result, Err(Rejection::OutOfBounds { cell: Cell::new(8) }));
    }

    #[test]
    fn test_block_requires_valid_anchor() {
        let result =
            check_placement(&[], Cell::new(3), TraySize::ExtraLarge, LayoutMode::Wide, &[]);
        assert!(matches!(result, Err(Rejection::InvalidAnchor { .. })));

        // 1 is valid in wide but not in narrow
        assert!(can_place(&[], Cell::new(1), TraySize::ExtraLarge, LayoutMode::Wide, &[]));
        assert!(!can_place(&[], Cell::new(1), TraySize::ExtraLarge, LayoutMode::Narrow, &[]));
    }

    #[test]
    fn test_occupied_cell_rejected_with_owner() {
        let layout = LayoutMode::Wide;
        let tray = make_tray(TraySize::Regular, 3, layout);
        let trays = vec![tray.clone()];

        let result = check_placement(&trays, Cell::new(3), TraySize::Large, layout, &[]);
        assert_eq!(result, Err(Rejection::Occupied {
            cell: Cell::new(3),
            owner: tray.id,
        }));
    }

    #[test]
    fn test_block_overlap_rejected() {
        let layout = LayoutMode::Wide;
        let trays = vec![make_tray(TraySize::ExtraLarge, 0, layout)];

        assert!(!can_place(&trays, Cell::new(1), TraySize::ExtraLarge, layout, &[]));
        let cells = check_placement(&trays, Cell::new(2), TraySize::ExtraLarge, layout, &[])
            .expect("anchor 2 is free");
        assert_eq!(cells.to_vec(), vec![
            Cell::new(2),
            Cell::new(3),
            Cell::new(6),
            Cell::new(7)
        ]);
    }

    #[test]
    fn test_tray_can_always_move_onto_itself() {
        let layout = LayoutMode::Wide;
        let block = make_tray(TraySize::ExtraLarge, 1, layout);
        let single = make_tray(TraySize::Regular, 0, layout);
        let trays = vec![block.clone(), single.clone()];

        assert!(can_place(&trays, Cell::new(1), TraySize::ExtraLarge, layout, &[block.id]));
        assert!(can_place(&trays, Cell::new(0), TraySize::Regular, layout, &[single.id]));
        assert!(!can_place(&trays, Cell::new(0), TraySize::Regular, layout, &[block.id]));
    }

    #[test]
    fn test_multiple_exclusions() {
        let layout = LayoutMode::Wide;
        let a = make_tray(TraySize::Regular, 0, layout);
        let b = make_tray(TraySize::Regular, 1, layout);
        let trays = vec![a.clone(), b.clone()];

        assert!(!can_place(&trays, Cell::new(0), TraySize::ExtraLarge, layout, &[a.id]));
        assert!(can_place(&trays, Cell::new(0), TraySize::ExtraLarge, layout, &[a.id, b.id]));
    }

    #[test]
    fn test_first_free_anchor() {
        let layout = LayoutMode::Wide;
        let trays = vec![make_tray(TraySize::Regular, 1, layout)];

        assert_eq!(
            first_free_anchor(&trays, TraySize::ExtraLarge, layout, &[]),
            Some(Cell::new(2))
        );
        assert_eq!(first_free_anchor(&trays, TraySize::Regular, layout, &[]), Some(Cell::new(0)));

        let crowded = vec![
            make_tray(TraySize::Regular, 1, layout),
            make_tray(TraySize::Regular, 6, layout),
        ];
        assert_eq!(first_free_anchor(&crowded, TraySize::ExtraLarge, layout, &[]), None);
    }

    #[test]
    fn test_rejection_messages() {
        let err = Rejection::InvalidDuration {
            secs: 700,
            min: Some(240),
            max: Some(600),
        };
        assert_eq!(err.to_string(), "cook time of 700s is not allowed (expected 240..=600s)");

        let err = Rejection::InvalidDuration {
            secs: 0,
            min: None,
            max: None,
        };
        assert_eq!(err.to_string(), "cook time of 0s is not allowed");

        let err = Rejection::OutOfBounds { cell: Cell::new(9) };
        assert!(err.to_string().contains("outside the sink"));
    }

    #[test]
    fn test_rejection_serializes_with_kind_tag() {
        let err = Rejection::NoSpace { size: TraySize::ExtraLarge };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "noSpace");
        assert_eq!(json["size"], "extraLarge");
    }
}
