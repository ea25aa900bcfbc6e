//! Sink geometry - which cells a tray covers and where it may start.
//!
//! Cells are numbered row by row. With `W` columns, the cell below `c` is
//! `c + W`, so a 2×2 block anchored at `a` covers `a`, `a + 1`, `a + W` and
//! `a + W + 1`.
//!
//! # Valid block anchors
//!
//! A block must not wrap across a row boundary or run off the bottom of the
//! sink:
//!
//! - Wide (4×2): anchors 0, 1, 2
//! - Narrow (2×4): anchors 0, 2, 4
//!
//! Everything here is pure. Layout mode is an argument, never cached.

use smallvec::smallvec;

use super::types::{AnchorList, Cell, CellSet, LayoutMode, SINK_CELLS, TraySize};

/// Number of cells a tray of `size` covers.
#[must_use]
pub const fn footprint(size: TraySize) -> usize { size.footprint() }

/// Cells covered by a tray of `size` anchored at `anchor`, anchor first.
///
/// For block sizes the anchor is expected to come from [`valid_anchors`];
/// other anchors yield cells that may wrap or leave the sink, which the
/// placement validator rejects.
#[must_use]
pub fn occupied_cells(anchor: Cell, size: TraySize, layout: LayoutMode) -> CellSet {
    if !size.is_block() {
        return smallvec![anchor];
    }

    let columns = layout.columns();
    smallvec![
        anchor,
        anchor.offset(1),
        anchor.offset(columns),
        anchor.offset(columns.saturating_add(1)),
    ]
}

/// Every anchor at which a tray of `size` fits inside the sink, ascending.
#[must_use]
pub fn valid_anchors(size: TraySize, layout: LayoutMode) -> AnchorList {
    if !size.is_block() {
        return Cell::all().collect();
    }

    let columns = layout.columns();
    let rows = layout.rows();

    // A block needs one more column to its right and one more row below.
    (0..rows.saturating_sub(1))
        .flat_map(|row| (0..columns.saturating_sub(1)).map(move |col| row * columns + col))
        .filter(|&index| index < SINK_CELLS)
        .map(Cell::new)
        .collect()
}

/// Returns true if `anchor` is a legal starting cell for `size`.
#[must_use]
pub fn is_valid_anchor(anchor: Cell, size: TraySize, layout: LayoutMode) -> bool {
    valid_anchors(size, layout).contains(&anchor)
}

/// Valid anchors whose footprint includes `cell`, ascending.
///
/// Resolves "the user pointed at this cell" into the block(s) that would
/// cover it. For single-cell sizes this is the cell itself when in bounds.
#[must_use]
pub fn anchors_covering(cell: Cell, size: TraySize, layout: LayoutMode) -> AnchorList {
    valid_anchors(size, layout)
        .into_iter()
        .filter(|&anchor| occupied_cells(anchor, size, layout).contains(&cell))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUTS: [LayoutMode; 2] = [LayoutMode::Wide, LayoutMode::Narrow];

    fn cells(indices: &[u8]) -> Vec<Cell> { indices.iter().copied().map(Cell::new).collect() }

    #[test]
    fn test_single_cell_sizes_cover_anchor_only() {
        for layout in LAYOUTS {
            for size in [TraySize::Regular, TraySize::Large] {
                for anchor in Cell::all() {
                    assert_eq!(occupied_cells(anchor, size, layout).to_vec(), vec![anchor]);
                }
            }
        }
    }

    #[test]
    fn test_block_cells_wide() {
        let block = occupied_cells(Cell::new(0), TraySize::ExtraLarge, LayoutMode::Wide);
        assert_eq!(block.to_vec(), cells(&[0, 1, 4, 5]));

        let block = occupied_cells(Cell::new(2), TraySize::ExtraLarge, LayoutMode::Wide);
        assert_eq!(block.to_vec(), cells(&[2, 3, 6, 7]));
    }

    #[test]
    fn test_block_cells_narrow() {
        let block = occupied_cells(Cell::new(0), TraySize::ExtraLarge, LayoutMode::Narrow);
        assert_eq!(block.to_vec(), cells(&[0, 1, 2, 3]));

        let block = occupied_cells(Cell::new(4), TraySize::ExtraLarge, LayoutMode::Narrow);
        assert_eq!(block.to_vec(), cells(&[4, 5, 6, 7]));
    }

    #[test]
    fn test_valid_anchors_per_layout() {
        assert_eq!(
            valid_anchors(TraySize::ExtraLarge, LayoutMode::Wide).to_vec(),
            cells(&[0, 1, 2])
        );
        assert_eq!(
            valid_anchors(TraySize::ExtraLarge, LayoutMode::Narrow).to_vec(),
            cells(&[0, 2, 4])
        );
        assert_eq!(valid_anchors(TraySize::Regular, LayoutMode::Wide).len(), 8);
        assert_eq!(valid_anchors(TraySize::Large, LayoutMode::Narrow).len(), 8);
    }

    #[test]
    fn test_every_valid_anchor_yields_footprint_in_bounds() {
        for layout in LAYOUTS {
            for size in TraySize::ALL {
                for anchor in valid_anchors(size, layout) {
                    let covered = occupied_cells(anchor, size, layout);
                    assert_eq!(covered.len(), footprint(size));
                    assert!(covered.iter().all(|c| c.in_bounds()));

                    let mut deduped = covered.to_vec();
                    deduped.sort();
                    deduped.dedup();
                    assert_eq!(deduped.len(), covered.len(), "duplicate cell at {anchor}");
                }
            }
        }
    }

    #[test]
    fn test_anchors_covering_wide() {
        let layout = LayoutMode::Wide;
        let xl = TraySize::ExtraLarge;
        assert_eq!(anchors_covering(Cell::new(0), xl, layout).to_vec(), cells(&[0]));
        assert_eq!(anchors_covering(Cell::new(1), xl, layout).to_vec(), cells(&[0, 1]));
        assert_eq!(anchors_covering(Cell::new(5), xl, layout).to_vec(), cells(&[0, 1]));
        assert_eq!(anchors_covering(Cell::new(6), xl, layout).to_vec(), cells(&[1, 2]));
        assert_eq!(anchors_covering(Cell::new(7), xl, layout).to_vec(), cells(&[2]));
    }

    #[test]
    fn test_anchors_covering_narrow() {
        let layout = LayoutMode::Narrow;
        let xl = TraySize::ExtraLarge;
        assert_eq!(anchors_covering(Cell::new(1), xl, layout).to_vec(), cells(&[0]));
        assert_eq!(anchors_covering(Cell::new(3), xl, layout).to_vec(), cells(&[0, 2]));
        assert_eq!(anchors_covering(Cell::new(5), xl, layout).to_vec(), cells(&[2, 4]));
        assert_eq!(anchors_covering(Cell::new(7), xl, layout).to_vec(), cells(&[4]));
    }

    #[test]
    fn test_anchors_covering_single_cell_and_out_of_bounds() {
        let layout = LayoutMode::Wide;
        assert_eq!(
            anchors_covering(Cell::new(6), TraySize::Regular, layout).to_vec(),
            cells(&[6])
        );
        assert!(anchors_covering(Cell::new(9), TraySize::Regular, layout).is_empty());
        assert!(anchors_covering(Cell::new(9), TraySize::ExtraLarge, layout).is_empty());
    }

    #[test]
    fn test_is_valid_anchor() {
        assert!(is_valid_anchor(Cell::new(2), TraySize::ExtraLarge, LayoutMode::Wide));
        assert!(!is_valid_anchor(Cell::new(3), TraySize::ExtraLarge, LayoutMode::Wide));
        assert!(!is_valid_anchor(Cell::new(1), TraySize::ExtraLarge, LayoutMode::Narrow));
        assert!(is_valid_anchor(Cell::new(7), TraySize::Regular, LayoutMode::Narrow));
    }
}
