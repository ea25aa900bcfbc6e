//! Occupancy index - which tray owns which cell.
//!
//! The index is rebuilt from a tray slice on demand. It is cheap (eight
//! slots) and never cached, so speculative queries during drag previews and
//! swap planning read exactly what a commit would read.

use super::types::{Cell, SINK_CELLS, Tray, TrayId};

/// Cell → owning tray, for every cell of the sink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OccupancyMap {
    owners: [Option<TrayId>; SINK_CELLS as usize],
}

impl OccupancyMap {
    /// Build the map from `trays`, skipping every tray listed in `exclude`.
    ///
    /// `exclude` may name zero, one or several trays; the swap resolver asks
    /// "what if all of these were lifted out at once".
    #[must_use]
    pub fn build(trays: &[Tray], exclude: &[TrayId]) -> Self {
        let mut owners = [None; SINK_CELLS as usize];

        for tray in trays.iter().filter(|t| !exclude.contains(&t.id)) {
            for cell in &tray.cells {
                debug_assert!(cell.in_bounds(), "tray {} stores out-of-range cell {cell}", tray.id);
                if let Some(slot) = owners.get_mut(usize::from(cell.index())) {
                    debug_assert!(slot.is_none(), "cell {cell} claimed by more than one tray");
                    *slot = Some(tray.id);
                }
            }
        }

        Self { owners }
    }

    /// The tray owning `cell`, if any. Out-of-range cells have no owner.
    #[must_use]
    pub fn owner(&self, cell: Cell) -> Option<TrayId> {
        self.owners.get(usize::from(cell.index())).copied().flatten()
    }

    /// Returns true if some tray owns `cell`.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool { self.owner(cell).is_some() }

    /// Iterate over `(cell, owner)` for every occupied cell, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, TrayId)> + '_ {
        Cell::all().filter_map(|cell| self.owner(cell).map(|id| (cell, id)))
    }

    /// Number of free cells.
    #[must_use]
    pub fn free_count(&self) -> usize { self.owners.iter().filter(|o| o.is_none()).count() }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;
    use crate::sink::types::TraySize;

    fn make_tray(size: TraySize, cells: &[u8]) -> Tray {
        Tray {
            id: TrayId::new(),
            size,
            cells: cells.iter().copied().map(Cell::new).collect(),
            items: Vec::new(),
        }
    }

    #[test]
    fn test_empty_sink_has_no_owners() {
        let map = OccupancyMap::build(&[], &[]);
        assert!(Cell::all().all(|c| !map.is_occupied(c)));
        assert_eq!(map.free_count(), 8);
    }

    #[test]
    fn test_owners_recorded_per_cell() {
        let block = make_tray(TraySize::ExtraLarge, &[0, 1, 4, 5]);
        let single = make_tray(TraySize::Regular, &[7]);
        let trays = vec![block.clone(), single.clone()];

        let map = OccupancyMap::build(&trays, &[]);
        assert_eq!(map.owner(Cell::new(0)), Some(block.id));
        assert_eq!(map.owner(Cell::new(5)), Some(block.id));
        assert_eq!(map.owner(Cell::new(7)), Some(single.id));
        assert_eq!(map.owner(Cell::new(2)), None);
        assert_eq!(map.free_count(), 3);
        assert_eq!(map.iter().count(), 5);
    }

    #[test]
    fn test_exclusion_of_several_trays() {
        let a = make_tray(TraySize::Regular, &[0]);
        let b = make_tray(TraySize::Large, &[1]);
        let c = make_tray(TraySize::Regular, &[2]);
        let trays = vec![a.clone(), b.clone(), c.clone()];

        let map = OccupancyMap::build(&trays, &[a.id]);
        assert!(!map.is_occupied(Cell::new(0)));
        assert!(map.is_occupied(Cell::new(1)));

        let map = OccupancyMap::build(&trays, &[a.id, c.id]);
        assert!(!map.is_occupied(Cell::new(0)));
        assert!(map.is_occupied(Cell::new(1)));
        assert!(!map.is_occupied(Cell::new(2)));
    }

    #[test]
    fn test_out_of_range_cell_has_no_owner() {
        let tray = Tray {
            id: TrayId::new(),
            size: TraySize::Regular,
            cells: smallvec![Cell::new(4)],
            items: Vec::new(),
        };
        let map = OccupancyMap::build(&[tray], &[]);
        assert_eq!(map.owner(Cell::new(200)), None);
    }
}
