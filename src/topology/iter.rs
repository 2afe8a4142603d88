//! Lazy traversal of the cell forest.
//!
//! Iterators walk the cell arena in creation order: coarse cells first, then
//! the children of each refinement pass in the order they were created. The
//! order depends only on the sequence of operations applied, so two
//! triangulations built the same way iterate identically.
//!
//! An iterator borrows the triangulation immutably; refining while one is
//! alive is rejected at compile time. Every call to
//! [`Triangulation::active_cells`] starts a fresh walk, and iterators are
//! `Clone`, so a traversal can be restarted from any position.

use std::iter::FusedIterator;

use crate::topology::accessor::CellAccessor;
use crate::topology::ids::CellId;
use crate::topology::triangulation::Triangulation;

/// Iterator over active (childless) cells.
#[derive(Clone, Debug)]
pub struct ActiveCellIter<'a, const DIM: usize, const S: usize> {
    tria: &'a Triangulation<DIM, S>,
    next: usize,
}

impl<'a, const DIM: usize, const S: usize> Iterator for ActiveCellIter<'a, DIM, S> {
    type Item = CellAccessor<'a, DIM, S>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(cell) = self.tria.cells.get(self.next) {
            self.next += 1;
            if cell.is_active() {
                return Some(CellAccessor::new(self.tria, cell));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.tria.cells.len().saturating_sub(self.next)))
    }
}

impl<const DIM: usize, const S: usize> FusedIterator for ActiveCellIter<'_, DIM, S> {}

/// Iterator over all cells, optionally restricted to one level.
#[derive(Clone, Debug)]
pub struct CellIter<'a, const DIM: usize, const S: usize> {
    tria: &'a Triangulation<DIM, S>,
    next: usize,
    level: Option<u8>,
}

impl<'a, const DIM: usize, const S: usize> Iterator for CellIter<'a, DIM, S> {
    type Item = CellAccessor<'a, DIM, S>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(cell) = self.tria.cells.get(self.next) {
            self.next += 1;
            if self.level.is_none_or(|level| cell.level == level) {
                return Some(CellAccessor::new(self.tria, cell));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tria.cells.len().saturating_sub(self.next);
        match self.level {
            None => (remaining, Some(remaining)),
            Some(_) => (0, Some(remaining)),
        }
    }
}

impl<const DIM: usize, const S: usize> FusedIterator for CellIter<'_, DIM, S> {}

impl<const DIM: usize, const S: usize> Triangulation<DIM, S> {
    /// Active cells in traversal order.
    pub fn active_cells(&self) -> ActiveCellIter<'_, DIM, S> {
        ActiveCellIter {
            tria: self,
            next: 0,
        }
    }

    /// Ids of the active cells in traversal order.
    pub fn active_cell_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.iter().filter(|c| c.is_active()).map(|c| c.id)
    }

    /// Every cell ever created, in traversal order.
    pub fn cells(&self) -> CellIter<'_, DIM, S> {
        CellIter {
            tria: self,
            next: 0,
            level: None,
        }
    }

    /// Cells on refinement level `level`, active or not.
    pub fn cells_on_level(&self, level: u8) -> CellIter<'_, DIM, S> {
        CellIter {
            tria: self,
            next: 0,
            level: Some(level),
        }
    }
}
