//! CSV / TSV codec. The first record is the header.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vizgrid_model::{CellValue, Grid, Row};

use crate::error::Result;
use crate::records::merge_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimitedOptions {
    pub delimiter: u8,
    /// Trim surrounding whitespace from every field when decoding.
    pub trim: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self::csv()
    }
}

impl DelimitedOptions {
    pub fn csv() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }

    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            trim: false,
        }
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

fn cell_from_text(value: &str) -> CellValue {
    if value.is_empty() {
        CellValue::Missing
    } else {
        CellValue::text(value)
    }
}

/// Append delimited text to `grid`. Header labels already present reuse
/// their column; empty fields decode as missing. Cells past the header
/// width are dropped.
pub fn merge_delimited(grid: &mut Grid, text: &str, options: DelimitedOptions) -> Result<usize> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .trim(if options.trim { Trim::All } else { Trim::None })
        .from_reader(text.as_bytes());
    let mut records = reader.records();
    let Some(header) = records.next().transpose()? else {
        return Ok(0);
    };
    let labels: Vec<String> = header.iter().map(str::to_string).collect();
    let mut table: Vec<Row> = Vec::new();
    let mut dropped = 0usize;
    for record in records {
        let record = record?;
        dropped += record.len().saturating_sub(labels.len());
        table.push(record.iter().take(labels.len()).map(cell_from_text).collect());
    }
    if dropped > 0 {
        debug!(dropped, "ignored cells beyond the header width");
    }
    merge_table(grid, &labels, table)
}

pub fn from_delimited_str(text: &str, options: DelimitedOptions) -> Result<Grid> {
    let mut grid = Grid::new();
    merge_delimited(&mut grid, text, options)?;
    Ok(grid)
}

pub fn from_csv_str(text: &str) -> Result<Grid> {
    from_delimited_str(text, DelimitedOptions::csv())
}

pub fn from_tsv_str(text: &str) -> Result<Grid> {
    from_delimited_str(text, DelimitedOptions::tsv())
}

/// Header plus data rows in column order; missing cells become empty
/// fields.
pub fn to_delimited_string(grid: &Grid, options: DelimitedOptions) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(grid.header())?;
    for row in grid.data() {
        writer.write_record(row.iter().map(CellValue::raw))?;
    }
    let bytes = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
    Ok(String::from_utf8(bytes)?)
}

pub fn to_csv_string(grid: &Grid) -> Result<String> {
    to_delimited_string(grid, DelimitedOptions::csv())
}

pub fn to_tsv_string(grid: &Grid) -> Result<String> {
    to_delimited_string(grid, DelimitedOptions::tsv())
}
