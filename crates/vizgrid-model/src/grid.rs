//! The grid: ordered fields plus ordered rows of raw cell text.
//!
//! # Row-0 convention
//!
//! The row/cell/column accessors are 1-indexed over the data with row 0
//! standing for the header: `row(0)` is the list of field labels and
//! `row(i)` for `i > 0` is data row `i - 1`. [`Grid::data`] exposes the
//! data rows without the header.
//!
//! # Checksums
//!
//! `checksum = hash(data_checksum, fields_checksum)`. In
//! [`ChecksumMode::Version`] the data checksum is derived from a version
//! stamp that every mutation renews. Stamps come from one process-wide
//! counter, so two grids never share a stamp once either has been written. In [`ChecksumMode::Exact`] one hash per row is kept
//! up to date and the data checksum is the hash of those, so equal content
//! gives equal checksums and a single row write rehashes a single row.
//!
//! # Row width
//!
//! Every stored row has exactly `width()` cells. Shorter input rows are
//! padded with [`CellValue::Missing`]; longer ones are rejected with
//! [`GridError::RowWidthMismatch`]. Operations that resize the field list
//! (header writes, `set_fields`) pad or cut every row to the new width.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checksum::{Checksum, ChecksumBuilder, hash_checksums, hash_row};
use crate::error::{EngineIssue, GridError, Result};
use crate::field::Field;
use crate::inference::{ColumnProfile, profile_column};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// One raw cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    #[default]
    Missing,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Missing => None,
        }
    }

    /// The cell text, with missing cells reading as the empty string.
    pub fn raw(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Missing, Self::Text)
    }
}

/// A data row. Position `i` belongs to field `i`.
pub type Row = Vec<CellValue>;

/// Build a row of text cells.
pub fn text_row<I, S>(values: I) -> Row
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(|v| CellValue::Text(v.into())).collect()
}

/// How the data half of the checksum is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumMode {
    /// Derived from the mutation counter. Cheap; says *that* something changed.
    #[default]
    Version,
    /// One hash per row, recomputed on write.
    Exact,
}

/// Reference to a column by label or by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Label(String),
}

impl From<&str> for ColumnRef {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(value: String) -> Self {
        Self::Label(value)
    }
}

impl From<usize> for ColumnRef {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "#{idx}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    fields: Vec<Field>,
    data: Vec<Row>,
    mode: ChecksumMode,
    version: u64,
    row_checksums: Vec<Checksum>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_checksum_mode(mut self, mode: ChecksumMode) -> Self {
        self.set_checksum_mode(mode);
        self
    }

    /// Build a grid from labels and data rows.
    pub fn from_rows<S: Into<String>>(
        header: impl IntoIterator<Item = S>,
        rows: Vec<Row>,
    ) -> Result<Self> {
        let fields = header.into_iter().map(Field::labeled).collect();
        Self::from_parts(fields, rows)
    }

    pub fn from_parts(fields: Vec<Field>, rows: Vec<Row>) -> Result<Self> {
        let mut grid = Self::new();
        grid.fields = fields;
        grid.set_data(rows)?;
        Ok(grid)
    }

    // === Checksums ===

    pub fn checksum_mode(&self) -> ChecksumMode {
        self.mode
    }

    pub fn set_checksum_mode(&mut self, mode: ChecksumMode) {
        self.mode = mode;
        self.rehash_all();
        self.touch();
    }

    /// Version stamp. 0 for a new grid; strictly larger after every mutating
    /// call.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn fields_checksum(&self) -> Checksum {
        hash_checksums(self.fields.iter().map(Field::checksum))
    }

    pub fn data_checksum(&self) -> Checksum {
        match self.mode {
            ChecksumMode::Version => ChecksumBuilder::new()
                .str("version")
                .u64(self.version)
                .finish(),
            ChecksumMode::Exact => self
                .row_checksums
                .iter()
                .fold(
                    ChecksumBuilder::new()
                        .str("rows")
                        .u64(self.row_checksums.len() as u64),
                    |builder, sum| builder.checksum(*sum),
                )
                .finish(),
        }
    }

    pub fn checksum(&self) -> Checksum {
        hash_checksums([self.data_checksum(), self.fields_checksum()])
    }

    /// Per-row hashes, maintained only in exact mode.
    pub fn row_checksums(&self) -> Option<&[Checksum]> {
        match self.mode {
            ChecksumMode::Exact => Some(self.row_checksums.as_slice()),
            ChecksumMode::Version => None,
        }
    }

    fn touch(&mut self) {
        self.version = NEXT_VERSION.fetch_add(1, Ordering::Relaxed);
    }

    fn rehash_all(&mut self) {
        self.row_checksums = match self.mode {
            ChecksumMode::Exact => self.data.iter().map(|row| hash_row(row)).collect(),
            ChecksumMode::Version => Vec::new(),
        };
    }

    fn rehash_row(&mut self, idx: usize) {
        if self.mode != ChecksumMode::Exact {
            return;
        }
        let sum = hash_row(&self.data[idx]);
        if idx < self.row_checksums.len() {
            self.row_checksums[idx] = sum;
        } else {
            self.row_checksums.push(sum);
        }
    }

    // === Shape ===

    /// Row count including the header row.
    pub fn length(&self) -> usize {
        self.data.len() + 1
    }

    /// Data rows only.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.data.is_empty()
    }

    fn check_width(&self, row: usize, cells: &[CellValue]) -> Result<()> {
        if cells.len() > self.width() {
            return Err(GridError::RowWidthMismatch {
                row,
                expected: self.width(),
                actual: cells.len(),
            });
        }
        Ok(())
    }

    fn fit_rows(&mut self) {
        let width = self.width();
        for row in &mut self.data {
            row.resize(width, CellValue::Missing);
        }
        self.rehash_all();
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column >= self.width() {
            return Err(GridError::ColumnOutOfRange {
                column,
                width: self.width(),
            });
        }
        Ok(())
    }

    // === Fields ===

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, column: usize) -> Option<&Field> {
        self.fields.get(column)
    }

    /// Replace the field list. Rows are padded or cut to the new width.
    pub fn set_fields(&mut self, fields: Vec<Field>) {
        self.fields = fields;
        self.fit_rows();
        self.touch();
    }

    /// Edit one field in place.
    pub fn update_field(&mut self, column: usize, edit: impl FnOnce(&mut Field)) -> Result<()> {
        self.check_column(column)?;
        edit(&mut self.fields[column]);
        self.touch();
        Ok(())
    }

    /// Index of the first field labelled `label`.
    pub fn field_index(&self, label: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.label() == label)
    }

    pub fn field_by_label(&self, label: &str) -> Option<&Field> {
        self.field_index(label).map(|idx| &self.fields[idx])
    }

    /// Resolve a column reference to an in-range index.
    pub fn resolve(&self, column: &ColumnRef) -> Option<usize> {
        match column {
            ColumnRef::Index(idx) => (*idx < self.width()).then_some(*idx),
            ColumnRef::Label(label) => self.field_index(label),
        }
    }

    /// Like [`Grid::resolve`], reporting unresolved references.
    pub fn resolve_or_report(&self, column: &ColumnRef) -> Option<usize> {
        let resolved = self.resolve(column);
        if resolved.is_none() {
            EngineIssue::UnresolvedColumnReference {
                label: column.to_string(),
            }
            .report();
        }
        resolved
    }

    // === Header ===

    pub fn header(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| field.label().to_string())
            .collect()
    }

    /// Relabel fields by position, creating fields for extra labels and
    /// dropping fields past the end. With `as_default` the labels are
    /// stored as defaults rather than explicit values.
    pub fn set_header<S: Into<String>>(
        &mut self,
        labels: impl IntoIterator<Item = S>,
        as_default: bool,
    ) {
        let mut fields = Vec::new();
        let mut existing = std::mem::take(&mut self.fields).into_iter();
        for label in labels {
            let mut field = existing.next().unwrap_or_default();
            if as_default {
                field.set_label_default(label);
            } else {
                field.set_label(label);
            }
            fields.push(field);
        }
        self.fields = fields;
        self.fit_rows();
        self.touch();
    }

    // === Rows ===

    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Replace all data rows.
    pub fn set_data(&mut self, rows: Vec<Row>) -> Result<()> {
        for (idx, row) in rows.iter().enumerate() {
            self.check_width(idx + 1, row)?;
        }
        self.data = rows;
        self.fit_rows();
        self.touch();
        Ok(())
    }

    /// Header (`row == 0`) or data row `row - 1`.
    pub fn row(&self, row: usize) -> Option<Row> {
        if row == 0 {
            return Some(self.header().into_iter().map(CellValue::Text).collect());
        }
        self.data.get(row - 1).cloned()
    }

    /// Write the header (`row == 0`) or a data row. Writing at
    /// `row == length()` appends.
    pub fn set_row(&mut self, row: usize, cells: Row) -> Result<()> {
        if row == 0 {
            let labels: Vec<String> = cells.iter().map(|c| c.raw().to_string()).collect();
            self.set_header(labels, false);
            return Ok(());
        }
        self.check_width(row, &cells)?;
        let idx = row - 1;
        if idx > self.data.len() {
            return Err(GridError::RowOutOfRange {
                row,
                len: self.length(),
            });
        }
        let mut cells = cells;
        cells.resize(self.width(), CellValue::Missing);
        if idx == self.data.len() {
            self.data.push(cells);
        } else {
            self.data[idx] = cells;
        }
        self.rehash_row(idx);
        self.touch();
        Ok(())
    }

    /// Append a data row.
    pub fn push_row(&mut self, cells: Row) -> Result<()> {
        self.set_row(self.length(), cells)
    }

    /// Header followed by every data row.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.length());
        rows.extend(self.row(0));
        rows.extend(self.data.iter().cloned());
        rows
    }

    /// Replace header and data: the first row relabels the fields, the rest
    /// become the data.
    pub fn set_rows(&mut self, rows: Vec<Row>) -> Result<()> {
        let mut rows = rows.into_iter();
        let header: Vec<String> = rows
            .next()
            .unwrap_or_default()
            .iter()
            .map(|cell| cell.raw().to_string())
            .collect();
        let data: Vec<Row> = rows.collect();
        for (idx, row) in data.iter().enumerate() {
            if row.len() > header.len() {
                return Err(GridError::RowWidthMismatch {
                    row: idx + 1,
                    expected: header.len(),
                    actual: row.len(),
                });
            }
        }
        self.set_header(header, false);
        self.set_data(data)
    }

    // === Cells ===

    pub fn cell(&self, row: usize, column: usize) -> Option<CellValue> {
        if row == 0 {
            return self
                .fields
                .get(column)
                .map(|field| CellValue::text(field.label()));
        }
        self.data.get(row - 1)?.get(column).cloned()
    }

    /// Write one cell. Row 0 relabels the field.
    pub fn set_cell(&mut self, row: usize, column: usize, value: CellValue) -> Result<()> {
        self.check_column(column)?;
        if row == 0 {
            self.fields[column].set_label(value.raw());
            self.touch();
            return Ok(());
        }
        let idx = row - 1;
        if idx >= self.data.len() {
            return Err(GridError::RowOutOfRange {
                row,
                len: self.length(),
            });
        }
        self.data[idx][column] = value;
        self.rehash_row(idx);
        self.touch();
        Ok(())
    }

    // === Columns ===

    /// Field label followed by the column's data cells.
    pub fn column(&self, column: usize) -> Option<Vec<CellValue>> {
        let field = self.fields.get(column)?;
        let mut cells = Vec::with_capacity(self.length());
        cells.push(CellValue::text(field.label()));
        cells.extend(self.data.iter().map(|row| row[column].clone()));
        Some(cells)
    }

    /// Write a column: the first value becomes a fresh field with that label,
    /// the rest are written into data rows 1.. (rows are created as needed;
    /// rows past the supplied values keep their cells). Writing at
    /// `column == width()` appends a column.
    pub fn set_column(&mut self, column: usize, values: Vec<CellValue>) -> Result<()> {
        if column > self.width() {
            return Err(GridError::ColumnOutOfRange {
                column,
                width: self.width(),
            });
        }
        let mut values = values.into_iter();
        let label = values.next().unwrap_or_default();
        let field = Field::labeled(label.raw());
        if column == self.width() {
            self.fields.push(field);
        } else {
            self.fields[column] = field;
        }
        let width = self.width();
        for (idx, value) in values.enumerate() {
            if idx == self.data.len() {
                self.data.push(vec![CellValue::Missing; width]);
            }
            let row = &mut self.data[idx];
            row.resize(width, CellValue::Missing);
            row[column] = value;
        }
        self.fit_rows();
        self.touch();
        Ok(())
    }

    pub fn columns(&self) -> Vec<Vec<CellValue>> {
        (0..self.width())
            .filter_map(|column| self.column(column))
            .collect()
    }

    /// Replace the whole grid column by column.
    pub fn set_columns(&mut self, columns: Vec<Vec<CellValue>>) -> Result<()> {
        self.fields.clear();
        self.data.clear();
        self.row_checksums.clear();
        self.touch();
        for (idx, column) in columns.into_iter().enumerate() {
            self.set_column(idx, column)?;
        }
        Ok(())
    }

    // === Whole-grid operations ===

    pub fn clear(&mut self) {
        self.fields.clear();
        self.data.clear();
        self.row_checksums.clear();
        self.touch();
    }

    /// Copy of the grid with no shared storage. `deep` keeps analysis
    /// results on the fields; otherwise only field configuration is copied.
    pub fn clone_grid(&self, deep: bool) -> Grid {
        let fields = if deep {
            self.fields.clone()
        } else {
            self.fields.iter().map(Field::config_clone).collect()
        };
        let mut grid = Grid {
            fields,
            data: self.data.clone(),
            mode: self.mode,
            version: 0,
            row_checksums: Vec::new(),
        };
        grid.rehash_all();
        grid.touch();
        grid
    }

    /// Rows whose value under every predicate label equals the given cell.
    /// A label that matches no field matches no row.
    pub fn filter(&self, predicate: &BTreeMap<String, CellValue>) -> Grid {
        let mut resolved = Vec::with_capacity(predicate.len());
        let mut unresolved = false;
        for (label, value) in predicate {
            match self.resolve_or_report(&ColumnRef::Label(label.clone())) {
                Some(idx) => resolved.push((idx, value)),
                None => unresolved = true,
            }
        }
        let rows = if unresolved {
            Vec::new()
        } else {
            self.data
                .iter()
                .filter(|row| resolved.iter().all(|(idx, value)| &row[*idx] == *value))
                .cloned()
                .collect()
        };
        let mut grid = self.clone_grid(true);
        grid.data = rows;
        grid.rehash_all();
        grid.touch();
        grid
    }

    /// Transpose in place: column `c` (label first) becomes row `c`, so the
    /// old first column becomes the new header. Field metadata is reset.
    ///
    /// Two pivots restore labels and values only when no column was padded
    /// along the way; no reshaping is attempted to make it an exact inverse.
    pub fn pivot(&mut self) -> Result<()> {
        let columns = self.columns();
        debug!(
            rows = self.row_count(),
            width = self.width(),
            "pivoting grid"
        );
        self.fields.clear();
        self.set_rows(columns)
    }

    /// Infer column types for the given columns, store the profiles on the
    /// fields, and return them in request order.
    pub fn analyse(&mut self, columns: &[usize]) -> Result<Vec<ColumnProfile>> {
        for &column in columns {
            self.check_column(column)?;
        }
        let mut profiles = Vec::with_capacity(columns.len());
        for &column in columns {
            let profile = profile_column(self.data.iter().map(|row| row[column].raw()));
            debug!(
                column,
                label = self.fields[column].label(),
                kind = profile.kind(),
                "analysed column"
            );
            self.fields[column].set_profile(Some(profile.clone()));
            profiles.push(profile);
        }
        Ok(profiles)
    }

    /// Analyse every column.
    pub fn analyse_all(&mut self) -> Vec<ColumnProfile> {
        let columns: Vec<usize> = (0..self.width()).collect();
        self.analyse(&columns).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    fn sample() -> Grid {
        Grid::from_rows(
            ["Label", "Amount"],
            vec![
                text_row(["A", "10"]),
                text_row(["A", "5"]),
                text_row(["B", "20"]),
            ],
        )
        .expect("sample grid")
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new();
        assert!(grid.is_empty());
        assert_eq!(grid.version(), 0);
        assert_eq!(grid.length(), 1);
        assert_eq!(grid.width(), 0);
    }

    #[test]
    fn row_zero_is_the_header() {
        let grid = sample();
        assert_eq!(grid.row(0), Some(text_row(["Label", "Amount"])));
        assert_eq!(grid.row(1), Some(text_row(["A", "10"])));
        assert_eq!(grid.row(4), None);
        assert_eq!(grid.cell(0, 1), Some(CellValue::text("Amount")));
        assert_eq!(grid.cell(3, 1), Some(CellValue::text("20")));
        assert_eq!(grid.length(), 4);
        assert_eq!(grid.rows().len(), 4);
    }

    #[test]
    fn columns_include_label() {
        let grid = sample();
        assert_eq!(
            grid.column(1),
            Some(text_row(["Amount", "10", "5", "20"]))
        );
        assert_eq!(grid.columns().len(), 2);
        assert_eq!(grid.column(2), None);
    }

    #[test]
    fn short_rows_are_padded() {
        let mut grid = sample();
        grid.push_row(text_row(["C"])).expect("push short row");
        assert_eq!(grid.cell(4, 1), Some(CellValue::Missing));
    }

    #[test]
    fn wide_rows_are_rejected() {
        let mut grid = sample();
        let err = grid
            .set_row(1, text_row(["A", "1", "extra"]))
            .expect_err("row too wide");
        assert_eq!(
            err,
            GridError::RowWidthMismatch {
                row: 1,
                expected: 2,
                actual: 3
            }
        );
        assert_eq!(grid.row(1), Some(text_row(["A", "10"])));
    }

    #[test]
    fn writing_past_the_end_is_rejected() {
        let mut grid = sample();
        assert!(matches!(
            grid.set_row(9, text_row(["Z", "0"])),
            Err(GridError::RowOutOfRange { row: 9, .. })
        ));
        assert!(matches!(
            grid.set_cell(1, 5, CellValue::text("x")),
            Err(GridError::ColumnOutOfRange { column: 5, .. })
        ));
    }

    #[test]
    fn header_write_relabels_by_position() {
        let mut grid = sample();
        grid.update_field(1, |f| f.set_type(FieldType::Number))
            .expect("update field");
        grid.set_row(0, text_row(["Name", "Total", "Extra"]))
            .expect("write header");
        assert_eq!(grid.header(), vec!["Name", "Total", "Extra"]);
        assert_eq!(grid.fields()[1].field_type(), FieldType::Number);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.cell(1, 2), Some(CellValue::Missing));
    }

    #[test]
    fn header_as_default_is_not_explicit() {
        let mut grid = Grid::new();
        grid.set_header(["A"], true);
        assert_eq!(grid.fields()[0].label(), "A");
        assert!(!grid.fields()[0].label_setting().is_explicit());
    }

    #[test]
    fn every_mutation_bumps_version() {
        let mut grid = sample();
        let mut last = grid.version();
        let mut check = |grid: &Grid| {
            assert!(grid.version() > last);
            last = grid.version();
        };
        grid.set_cell(1, 1, CellValue::text("11")).expect("set cell");
        check(&grid);
        grid.set_row(2, text_row(["A", "6"])).expect("set row");
        check(&grid);
        grid.set_column(1, text_row(["Amount", "1"])).expect("set column");
        check(&grid);
        grid.update_field(0, |f| f.set_format("x")).expect("update field");
        check(&grid);
        grid.clear();
        check(&grid);
    }

    #[test]
    fn checksum_is_stable_and_changes_on_mutation() {
        for mode in [ChecksumMode::Version, ChecksumMode::Exact] {
            let mut grid = sample().with_checksum_mode(mode);
            let before = grid.checksum();
            assert_eq!(before, grid.checksum());
            grid.set_cell(2, 1, CellValue::text("6")).expect("set cell");
            assert_ne!(before, grid.checksum(), "{mode:?}");
        }
    }

    #[test]
    fn field_changes_change_checksum() {
        let mut grid = sample().with_checksum_mode(ChecksumMode::Exact);
        let before = grid.checksum();
        let data_before = grid.data_checksum();
        grid.update_field(1, |f| f.set_type(FieldType::Number))
            .expect("update field");
        assert_ne!(before, grid.checksum());
        assert_eq!(data_before, grid.data_checksum());
    }

    #[test]
    fn exact_mode_rehashes_one_row() {
        let mut grid = sample().with_checksum_mode(ChecksumMode::Exact);
        let before = grid.row_checksums().expect("exact mode").to_vec();
        grid.set_row(2, text_row(["A", "50"])).expect("set row");
        let after = grid.row_checksums().expect("exact mode");
        assert_eq!(before[0], after[0]);
        assert_ne!(before[1], after[1]);
        assert_eq!(before[2], after[2]);
    }

    #[test]
    fn exact_mode_is_content_addressed() {
        let a = sample().with_checksum_mode(ChecksumMode::Exact);
        let mut b = sample().with_checksum_mode(ChecksumMode::Exact);
        b.set_cell(1, 1, CellValue::text("10")).expect("same value");
        assert_eq!(a.checksum(), b.checksum());
        assert!(sample().row_checksums().is_none());
    }

    #[test]
    fn clone_is_independent() {
        let grid = sample();
        let mut copy = grid.clone_grid(true);
        assert_eq!(copy.rows(), grid.rows());
        copy.set_cell(1, 0, CellValue::text("Z")).expect("set cell");
        copy.update_field(0, |f| f.set_label("Renamed"))
            .expect("rename");
        assert_eq!(grid.cell(1, 0), Some(CellValue::text("A")));
        assert_eq!(grid.header(), vec!["Label", "Amount"]);
    }

    #[test]
    fn shallow_clone_drops_profiles() {
        let mut grid = sample();
        grid.analyse(&[1]).expect("analyse");
        assert!(grid.clone_grid(true).fields()[1].profile().is_some());
        assert!(grid.clone_grid(false).fields()[1].profile().is_none());
    }

    #[test]
    fn filter_matches_all_entries() {
        let grid = sample();
        let predicate = BTreeMap::from([("Label".to_string(), CellValue::text("A"))]);
        let filtered = grid.filter(&predicate);
        assert_eq!(
            filtered.data(),
            &[text_row(["A", "10"]), text_row(["A", "5"])]
        );

        let both = BTreeMap::from([
            ("Label".to_string(), CellValue::text("A")),
            ("Amount".to_string(), CellValue::text("5")),
        ]);
        assert_eq!(grid.filter(&both).row_count(), 1);

        let unknown = BTreeMap::from([("Nope".to_string(), CellValue::text("A"))]);
        assert_eq!(grid.filter(&unknown).row_count(), 0);
    }

    #[test]
    fn pivot_transposes() {
        let mut grid = Grid::from_rows(
            ["Name", "Q1", "Q2"],
            vec![text_row(["North", "1", "2"]), text_row(["South", "3", "4"])],
        )
        .expect("grid");
        grid.pivot().expect("pivot");
        assert_eq!(grid.header(), vec!["Name", "North", "South"]);
        assert_eq!(
            grid.data(),
            &[text_row(["Q1", "1", "3"]), text_row(["Q2", "2", "4"])]
        );
    }

    #[test]
    fn double_pivot_of_non_square_grid() {
        let original = Grid::from_parts(
            vec![
                Field::labeled("Name").with_type(FieldType::String),
                Field::labeled("Q1").with_type(FieldType::Number),
                Field::labeled("Q2").with_type(FieldType::Number),
            ],
            vec![
                text_row(["North", "1", "2"]),
                text_row(["South", "3", "4"]),
                vec![
                    CellValue::Missing,
                    CellValue::text("5"),
                    CellValue::text("6"),
                ],
            ],
        )
        .expect("grid");
        let mut grid = original.clone();

        grid.pivot().expect("first pivot");
        assert_eq!(grid.header(), vec!["Name", "North", "South", ""]);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.row_count(), 2);

        grid.pivot().expect("second pivot");
        assert_eq!(grid.header(), original.header());
        // The missing label cell comes back as empty text and field types
        // are reset, so two pivots are not an identity.
        assert_eq!(
            grid.data(),
            &[
                text_row(["North", "1", "2"]),
                text_row(["South", "3", "4"]),
                text_row(["", "5", "6"]),
            ]
        );
        assert_ne!(grid.data(), original.data());
        assert!(
            grid.fields()
                .iter()
                .all(|field| field.field_type() == FieldType::None)
        );
    }

    #[test]
    fn set_column_appends_and_grows() {
        let mut grid = sample();
        grid.set_column(2, text_row(["Note", "a", "b", "c", "d"]))
            .expect("append column");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.row(4), Some(vec![
            CellValue::Missing,
            CellValue::Missing,
            CellValue::text("d"),
        ]));
    }

    #[test]
    fn set_columns_rebuilds_grid() {
        let mut grid = Grid::new();
        grid.set_columns(vec![
            text_row(["A", "1", "2"]),
            text_row(["B", "3", "4"]),
        ])
        .expect("set columns");
        assert_eq!(grid.rows(), vec![
            text_row(["A", "B"]),
            text_row(["1", "3"]),
            text_row(["2", "4"]),
        ]);
    }

    #[test]
    fn set_columns_with_nothing_empties_the_grid() {
        let mut grid = sample().with_checksum_mode(ChecksumMode::Exact);
        let version = grid.version();
        grid.set_columns(Vec::new()).expect("set columns");
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.row_checksums().map(<[Checksum]>::len), Some(0));
        assert!(grid.version() > version);
    }

    #[test]
    fn derived_grids_never_share_a_version_checksum() {
        let grid = sample();
        let a = grid.filter(&BTreeMap::from([("Label".to_string(), CellValue::text("A"))]));
        let b = grid.filter(&BTreeMap::from([("Label".to_string(), CellValue::text("B"))]));
        assert_eq!(a.fields_checksum(), b.fields_checksum());
        assert_ne!(a.checksum(), b.checksum());

        let mut left = grid.clone_grid(true);
        let mut right = grid.clone_grid(true);
        left.set_cell(1, 1, CellValue::text("1")).expect("set cell");
        right.set_cell(1, 1, CellValue::text("2")).expect("set cell");
        assert_ne!(left.checksum(), right.checksum());
        assert_ne!(grid.checksum(), left.checksum());
    }

    #[test]
    fn analyse_annotates_fields() {
        let mut grid = Grid::from_rows(
            ["n", "state"],
            vec![
                text_row(["12", "CA"]),
                text_row(["7", "TX"]),
                text_row(["-3", "WA"]),
            ],
        )
        .expect("grid");
        let profiles = grid.analyse(&[0, 1]).expect("analyse");
        assert!(profiles[0].is_number && !profiles[0].is_string);
        assert!(profiles[1].is_string && profiles[1].is_us_state);
        assert_eq!(grid.fields()[1].profile(), Some(&profiles[1]));
        assert!(grid.analyse(&[2]).is_err());
    }
}
