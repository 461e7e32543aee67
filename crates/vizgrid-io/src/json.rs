//! JSON row-object codec: `[{"label": value, ...}, ...]`.
//!
//! Strings decode as text and `null` as a missing cell. Numbers and
//! booleans keep their JSON spelling; nested arrays and objects are stored
//! as compact JSON text. Encoding writes every cell as a string, missing
//! cells as `null`.

use serde_json::{Map, Value as JsonValue};
use vizgrid_model::{CellValue, Grid};

use crate::error::{CodecError, Result};
use crate::records::merge_records;

pub type RowObject = Map<String, JsonValue>;

fn cell_from_json(value: JsonValue) -> CellValue {
    match value {
        JsonValue::Null => CellValue::Missing,
        JsonValue::String(text) => CellValue::Text(text),
        JsonValue::Bool(flag) => CellValue::text(flag.to_string()),
        JsonValue::Number(number) => CellValue::text(number.to_string()),
        nested @ (JsonValue::Array(_) | JsonValue::Object(_)) => CellValue::text(nested.to_string()),
    }
}

/// Append row objects to `grid`, extending its schema as needed.
pub fn merge_json_rows(grid: &mut Grid, rows: Vec<RowObject>) -> Result<usize> {
    merge_records(
        grid,
        rows.into_iter().map(|object| {
            object
                .into_iter()
                .map(|(key, value)| (key, cell_from_json(value)))
        }),
    )
}

pub fn from_json_rows(rows: Vec<RowObject>) -> Result<Grid> {
    let mut grid = Grid::new();
    merge_json_rows(&mut grid, rows)?;
    Ok(grid)
}

/// Split a parsed document into row objects.
pub fn row_objects(document: JsonValue) -> Result<Vec<RowObject>> {
    let JsonValue::Array(items) = document else {
        return Err(CodecError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            JsonValue::Object(object) => Ok(object),
            _ => Err(CodecError::NotAnObject { index }),
        })
        .collect()
}

pub fn from_json_str(text: &str) -> Result<Grid> {
    let document: JsonValue = serde_json::from_str(text)?;
    from_json_rows(row_objects(document)?)
}

/// One object per data row keyed by field label. With repeated labels the
/// rightmost column wins.
pub fn to_json_rows(grid: &Grid) -> Vec<RowObject> {
    let labels = grid.header();
    grid.data()
        .iter()
        .map(|row| {
            labels
                .iter()
                .zip(row)
                .map(|(label, cell)| {
                    let value = match cell {
                        CellValue::Text(text) => JsonValue::String(text.clone()),
                        CellValue::Missing => JsonValue::Null,
                    };
                    (label.clone(), value)
                })
                .collect()
        })
        .collect()
}

pub fn to_json_string(grid: &Grid) -> Result<String> {
    Ok(serde_json::to_string(&to_json_rows(grid))?)
}

pub fn to_json_string_pretty(grid: &Grid) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json_rows(grid))?)
}
