//! Checksum-keyed memoization shared by every view.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;
use vizgrid_model::{Checksum, Field, Grid};

/// A grid shared between its owner and any number of views.
///
/// Views only ever borrow it immutably. The engine is single-threaded, so
/// mutation must not overlap a view read.
pub type SharedGrid = Rc<RefCell<Grid>>;

pub fn share(grid: Grid) -> SharedGrid {
    Rc::new(RefCell::new(grid))
}

/// One memoized value plus the grid checksum it was computed from.
#[derive(Debug)]
pub struct ChecksumCache<T> {
    slot: RefCell<Option<(Checksum, Rc<T>)>>,
}

impl<T> Default for ChecksumCache<T> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }
}

impl<T> ChecksumCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value if `grid`'s checksum still matches, otherwise recompute.
    pub fn resolve(&self, grid: &SharedGrid, compute: impl FnOnce(&Grid) -> T) -> Rc<T> {
        let grid = grid.borrow();
        let checksum = grid.checksum();
        if let Some((cached, value)) = self.slot.borrow().as_ref()
            && *cached == checksum
        {
            return Rc::clone(value);
        }
        trace!(%checksum, "recomputing view");
        let value = Rc::new(compute(&grid));
        *self.slot.borrow_mut() = Some((checksum, Rc::clone(&value)));
        value
    }

    pub fn cached_checksum(&self) -> Option<Checksum> {
        self.slot.borrow().as_ref().map(|(checksum, _)| *checksum)
    }

    pub fn is_fresh(&self, checksum: Checksum) -> bool {
        self.cached_checksum() == Some(checksum)
    }

    pub fn invalidate(&self) {
        self.slot.borrow_mut().take();
    }
}

/// A read-only projection over a shared grid, memoized by the grid checksum.
pub trait DerivedView {
    fn source(&self) -> &SharedGrid;

    /// True when any cached projection no longer matches the grid.
    fn is_stale(&self) -> bool;

    /// Drop cached projections. They are rebuilt on the next read.
    fn invalidate(&self);

    fn checksum(&self) -> Checksum {
        self.source().borrow().checksum()
    }

    fn fields(&self) -> Vec<Field> {
        self.source().borrow().fields().to_vec()
    }
}
