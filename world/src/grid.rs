//! Dense defender occupancy grid.

use lane_siege_core::{Cell, DefenderId};

#[derive(Clone, Debug)]
pub(crate) struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<DefenderId>>,
}

impl OccupancyGrid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    pub(crate) fn is_free(&self, cell: Cell) -> bool {
        self.index(cell).map_or(false, |index| {
            self.cells.get(index).copied().unwrap_or(None).is_none()
        })
    }

    pub(crate) fn occupant(&self, cell: Cell) -> Option<DefenderId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    pub(crate) fn occupy(&mut self, defender: DefenderId, cell: Cell) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(defender);
            }
        }
    }

    pub(crate) fn vacate(&mut self, cell: Cell) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = None;
            }
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
