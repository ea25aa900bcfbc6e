//! The `SinkState` store.
//!
//! Owns the canonical tray collection inside an `eyeball::Observable`. Every
//! command validates against the current snapshot first and, only on success,
//! replaces the whole snapshot with a new one. Rejected commands never touch
//! the observable, so subscribers only ever see complete states.

use eyeball::{Observable, Subscriber};

use super::geometry;
use super::placement::{self, Rejection};
use super::swap::{self, SwapPlan};
use super::types::{
    Cell, CellSet, CookingItem, ItemId, LayoutMode, SinkSnapshot, Timestamp, Tray, TrayId, TraySize,
};
use crate::clock::{Clock, SystemClock};

/// The root state container for the sink.
pub struct SinkState {
    /// Current snapshot. Replaced wholesale on every successful command.
    snapshot: Observable<SinkSnapshot>,

    /// Time source for item start timestamps.
    clock: Box<dyn Clock>,
}

impl Default for SinkState {
    fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for SinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkState").field("snapshot", self.snapshot()).finish()
    }
}

impl SinkState {
    /// Create an empty sink on the system clock.
    #[must_use]
    pub fn new() -> Self { Self::with_clock(SystemClock) }

    /// Create an empty sink reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            snapshot: Observable::new(SinkSnapshot::default()),
            clock: Box::new(clock),
        }
    }

    // ========================================================================
    // Snapshot Access
    // ========================================================================

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> &SinkSnapshot { Observable::get(&self.snapshot) }

    /// Subscribe to snapshot replacements.
    #[must_use]
    pub fn subscribe(&self) -> Subscriber<SinkSnapshot> { Observable::subscribe(&self.snapshot) }

    /// All trays in placement order.
    #[must_use]
    pub fn trays(&self) -> &[Tray] { &self.snapshot().trays }

    /// Number of snapshot replacements so far.
    #[must_use]
    pub fn revision(&self) -> u64 { self.snapshot().revision }

    /// Get a tray by ID.
    #[must_use]
    pub fn tray(&self, id: TrayId) -> Option<&Tray> { self.snapshot().tray(id) }

    /// Get the tray covering a cell.
    #[must_use]
    pub fn tray_at(&self, cell: Cell) -> Option<&Tray> { self.snapshot().tray_at(cell) }

    /// Current time according to the sink's clock.
    #[must_use]
    pub fn now(&self) -> Timestamp { self.clock.now() }

    /// Replace the snapshot with `trays`, bumping the revision.
    fn commit(&mut self, trays: Vec<Tray>) {
        let revision = self.revision() + 1;
        Observable::set(&mut self.snapshot, SinkSnapshot { revision, trays });
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns true if a tray of `size` may be anchored at `anchor` with the
    /// trays in `exclude` lifted out.
    #[must_use]
    pub fn can_place(
        &self,
        anchor: Cell,
        size: TraySize,
        layout: LayoutMode,
        exclude: &[TrayId],
    ) -> bool {
        placement::can_place(self.trays(), anchor, size, layout, exclude)
    }

    /// Cells a tray of `size` would cover from `anchor`.
    #[must_use]
    pub fn occupied_cells(&self, anchor: Cell, size: TraySize, layout: LayoutMode) -> CellSet {
        geometry::occupied_cells(anchor, size, layout)
    }

    /// Swap plan for dropping `dragging` on `target`, if one exists.
    #[must_use]
    pub fn find_swap_plan(
        &self,
        dragging: TrayId,
        target: Cell,
        layout: LayoutMode,
    ) -> Option<SwapPlan> {
        swap::find_swap_plan(self.trays(), dragging, target, layout)
    }

    /// Trays that can take at least one more item.
    #[must_use]
    pub fn trays_with_room(&self) -> Vec<&Tray> {
        self.trays().iter().filter(|t| !t.is_full()).collect()
    }

    /// Cells that [`place_at_cell`](Self::place_at_cell) would occupy.
    ///
    /// Used to highlight a tap target before committing.
    #[must_use]
    pub fn placement_preview(
        &self,
        cell: Cell,
        size: TraySize,
        layout: LayoutMode,
    ) -> Option<CellSet> {
        self.resolve_tap(cell, size, layout)
            .ok()
            .map(|anchor| geometry::occupied_cells(anchor, size, layout))
    }

    /// Anchor a tap on `cell` resolves to for a tray of `size`.
    fn resolve_tap(&self, cell: Cell, size: TraySize, layout: LayoutMode) -> Result<Cell, Rejection> {
        if !cell.in_bounds() {
            return Err(Rejection::OutOfBounds { cell });
        }
        if let Some(owner) = self.tray_at(cell) {
            return Err(Rejection::Occupied { cell, owner: owner.id });
        }
        if !size.is_block() {
            return Ok(cell);
        }

        // Prefer a block over the tapped cell, then any block at all.
        geometry::anchors_covering(cell, size, layout)
            .into_iter()
            .chain(geometry::valid_anchors(size, layout))
            .find(|&anchor| self.can_place(anchor, size, layout, &[]))
            .ok_or(Rejection::NoSpace { size })
    }

    /// Check that every tray keeps its footprint shape under `layout`.
    ///
    /// Single-cell trays fit any layout; an extra large tray only fits if its
    /// cells still form a 2x2 block.
    ///
    /// # Errors
    ///
    /// `LayoutMismatch` naming the first tray that does not fit.
    pub fn check_layout(&self, layout: LayoutMode) -> Result<(), Rejection> {
        match self.trays().iter().find(|t| !t.is_consistent(layout)) {
            Some(tray) => Err(Rejection::LayoutMismatch { tray: tray.id, layout }),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Tray Commands
    // ========================================================================

    /// Place a new tray of `size` anchored at `anchor`.
    ///
    /// # Errors
    ///
    /// Any [`check_placement`](placement::check_placement) rejection.
    pub fn place_tray(
        &mut self,
        anchor: Cell,
        size: TraySize,
        layout: LayoutMode,
    ) -> Result<Tray, Rejection> {
        let cells = placement::check_placement(self.trays(), anchor, size, layout, &[])
            .inspect_err(|reason| {
                tracing::debug!(%anchor, %size, %reason, "place_tray rejected");
            })?;

        let tray = Tray {
            id: TrayId::new(),
            size,
            cells,
            items: Vec::new(),
        };

        let mut trays = self.trays().to_vec();
        trays.push(tray.clone());
        self.commit(trays);

        tracing::debug!(tray = %tray.id, %anchor, %size, "placed tray");
        Ok(tray)
    }

    /// Place a new tray of `size` at the first free anchor, ascending.
    ///
    /// # Errors
    ///
    /// `NoSpace` if no valid anchor is free.
    pub fn auto_place_tray(&mut self, size: TraySize, layout: LayoutMode) -> Result<Tray, Rejection> {
        let Some(anchor) = placement::first_free_anchor(self.trays(), size, layout, &[]) else {
            tracing::debug!(%size, "auto_place_tray: no space");
            return Err(Rejection::NoSpace { size });
        };
        self.place_tray(anchor, size, layout)
    }

    /// Place at `anchor`, relocating an extra large tray when that fails.
    ///
    /// Single-cell trays are never relocated; their rejection is returned
    /// as-is.
    ///
    /// # Errors
    ///
    /// The original rejection for single-cell trays, `NoSpace` for blocks
    /// when no anchor is free.
    pub fn place_tray_or_relocate(
        &mut self,
        anchor: Cell,
        size: TraySize,
        layout: LayoutMode,
    ) -> Result<Tray, Rejection> {
        match self.place_tray(anchor, size, layout) {
            Err(reason) if size.is_block() => {
                tracing::debug!(%anchor, %reason, "relocating block tray");
                self.auto_place_tray(size, layout)
            }
            other => other,
        }
    }

    /// Place a tray by tapping an empty cell.
    ///
    /// Extra large trays take the first free block covering `cell`, or failing
    /// that any free block.
    ///
    /// # Errors
    ///
    /// - `OutOfBounds` if `cell` is outside the sink
    /// - `Occupied` if `cell` already holds a tray
    /// - `NoSpace` if no block is free
    pub fn place_at_cell(
        &mut self,
        cell: Cell,
        size: TraySize,
        layout: LayoutMode,
    ) -> Result<Tray, Rejection> {
        let anchor = self.resolve_tap(cell, size, layout).inspect_err(|reason| {
            tracing::debug!(%cell, %size, %reason, "place_at_cell rejected");
        })?;
        self.place_tray(anchor, size, layout)
    }

    /// Move a tray to `new_anchor`. The tray's own cells count as free.
    ///
    /// Returns the tray's new cells.
    ///
    /// # Errors
    ///
    /// `TrayNotFound`, or any placement rejection.
    pub fn move_tray(
        &mut self,
        id: TrayId,
        new_anchor: Cell,
        layout: LayoutMode,
    ) -> Result<CellSet, Rejection> {
        let index = self.snapshot().tray_index(id).ok_or(Rejection::TrayNotFound { tray: id })?;
        let size = self.trays()[index].size;

        let cells = placement::check_placement(self.trays(), new_anchor, size, layout, &[id])
            .inspect_err(|reason| {
                tracing::debug!(tray = %id, anchor = %new_anchor, %reason, "move_tray rejected");
            })?;

        let mut trays = self.trays().to_vec();
        trays[index].cells = cells.clone();
        self.commit(trays);

        tracing::debug!(tray = %id, anchor = %new_anchor, "moved tray");
        Ok(cells)
    }

    /// Apply a swap plan: the dragged tray and every displaced tray move
    /// together in one snapshot replacement.
    ///
    /// # Errors
    ///
    /// `TrayNotFound` or `ConflictingPlan`; the sink is left unchanged.
    pub fn swap_trays(
        &mut self,
        dragging: TrayId,
        new_anchor: Cell,
        plan: &SwapPlan,
        layout: LayoutMode,
    ) -> Result<(), Rejection> {
        let trays = swap::apply_swap_plan(self.trays(), dragging, new_anchor, plan, layout)
            .inspect_err(|reason| {
                tracing::debug!(tray = %dragging, anchor = %new_anchor, %reason, "swap_trays rejected");
            })?;
        self.commit(trays);

        tracing::debug!(
            tray = %dragging,
            anchor = %new_anchor,
            displaced = plan.displaced.len(),
            "swapped trays"
        );
        Ok(())
    }

    /// Remove a tray together with all its items.
    pub fn remove_tray(&mut self, id: TrayId) -> Option<Tray> {
        let index = self.snapshot().tray_index(id)?;
        let mut trays = self.trays().to_vec();
        let removed = trays.remove(index);
        self.commit(trays);

        tracing::debug!(tray = %id, items = removed.items.len(), "removed tray");
        Some(removed)
    }

    // ========================================================================
    // Item Commands
    // ========================================================================

    /// Start cooking a new item in a tray.
    ///
    /// The duration is expected to be validated against preset bounds by the
    /// caller; only zero is refused here.
    ///
    /// # Errors
    ///
    /// - `TrayNotFound` if the tray does not exist
    /// - `InvalidDuration` if `duration_secs` is zero
    /// - `TrayFull` if the tray is at capacity
    pub fn add_item(
        &mut self,
        tray_id: TrayId,
        name: impl Into<String>,
        duration_secs: u32,
    ) -> Result<CookingItem, Rejection> {
        let index = self
            .snapshot()
            .tray_index(tray_id)
            .ok_or(Rejection::TrayNotFound { tray: tray_id })?;

        if duration_secs == 0 {
            tracing::debug!(tray = %tray_id, "add_item rejected: zero duration");
            return Err(Rejection::InvalidDuration {
                secs: duration_secs,
                min: None,
                max: None,
            });
        }

        let tray = &self.trays()[index];
        if tray.is_full() {
            tracing::debug!(tray = %tray_id, capacity = tray.size.capacity(), "add_item rejected: full");
            return Err(Rejection::TrayFull {
                tray: tray_id,
                capacity: tray.size.capacity(),
            });
        }

        let item = CookingItem {
            id: ItemId::new(),
            name: name.into(),
            duration_secs,
            started_at: self.clock.now(),
        };

        let mut trays = self.trays().to_vec();
        trays[index].items.push(item.clone());
        self.commit(trays);

        tracing::debug!(tray = %tray_id, item = %item.id, name = %item.name, duration_secs, "added item");
        Ok(item)
    }

    /// Remove an item from a tray.
    pub fn remove_item(&mut self, tray_id: TrayId, item_id: ItemId) -> Option<CookingItem> {
        let tray_index = self.snapshot().tray_index(tray_id)?;
        let item_index = self.trays()[tray_index].items.iter().position(|i| i.id == item_id)?;

        let mut trays = self.trays().to_vec();
        let removed = trays[tray_index].items.remove(item_index);
        self.commit(trays);

        tracing::debug!(tray = %tray_id, item = %item_id, "removed item");
        Some(removed)
    }
}

// ============================================================================
// Tests
// ============================================================================
