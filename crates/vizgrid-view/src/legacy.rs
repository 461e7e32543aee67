//! Header + rows projection with memoized parsed and formatted tables.

use std::rc::Rc;

use vizgrid_model::{Field, Grid, Row, Value};

use crate::cache::{ChecksumCache, DerivedView, SharedGrid};

/// Formatted cells; `None` where the raw value was empty or failed coercion.
pub type FormattedTable = Vec<Vec<Option<String>>>;
pub type ParsedTable = Vec<Vec<Value>>;

pub struct LegacyView {
    grid: SharedGrid,
    formatted: ChecksumCache<FormattedTable>,
    parsed: ChecksumCache<ParsedTable>,
}

impl LegacyView {
    pub fn new(grid: &SharedGrid) -> Self {
        Self {
            grid: Rc::clone(grid),
            formatted: ChecksumCache::new(),
            parsed: ChecksumCache::new(),
        }
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    /// Field labels in column order.
    pub fn columns(&self) -> Vec<String> {
        self.grid.borrow().header()
    }

    /// Data rows as stored, without the header.
    pub fn raw_data(&self) -> Vec<Row> {
        self.grid.borrow().data().to_vec()
    }

    pub fn formatted_data(&self) -> Rc<FormattedTable> {
        self.formatted.resolve(&self.grid, |grid| {
            map_cells(grid, |field, raw| field.transform(raw))
        })
    }

    pub fn parsed_data(&self) -> Rc<ParsedTable> {
        self.parsed
            .resolve(&self.grid, |grid| map_cells(grid, |field, raw| field.parse(raw)))
    }
}

fn map_cells<T>(grid: &Grid, convert: impl Fn(&Field, &str) -> T) -> Vec<Vec<T>> {
    grid.data()
        .iter()
        .map(|row| {
            grid.fields()
                .iter()
                .zip(row)
                .map(|(field, cell)| convert(field, cell.raw()))
                .collect()
        })
        .collect()
}

impl DerivedView for LegacyView {
    fn source(&self) -> &SharedGrid {
        &self.grid
    }

    fn is_stale(&self) -> bool {
        let checksum = self.checksum();
        !(self.formatted.is_fresh(checksum) && self.parsed.is_fresh(checksum))
    }

    fn invalidate(&self) {
        self.formatted.invalidate();
        self.parsed.invalidate();
    }
}
