//! Conversion between grids and polars `DataFrame`s.

use polars::prelude::{AnyValue, Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use tracing::debug;
use vizgrid_model::{CellValue, Field, FieldType, Grid, format_numeric, parse_f64};

use crate::error::Result;

/// Text form of a polars value; nulls become missing cells.
pub fn any_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Missing,
        AnyValue::String(s) => CellValue::text(s),
        AnyValue::StringOwned(s) => CellValue::text(s.as_str()),
        AnyValue::Boolean(b) => CellValue::text(b.to_string()),
        AnyValue::Float32(v) => CellValue::text(format_numeric(f64::from(v))),
        AnyValue::Float64(v) => CellValue::text(format_numeric(v)),
        other => CellValue::text(other.to_string()),
    }
}

/// Field type implied by a column dtype.
pub fn field_type_for(dtype: &DataType) -> FieldType {
    match dtype {
        DataType::Int32
        | DataType::Int64
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64 => FieldType::Number,
        DataType::Boolean => FieldType::Boolean,
        DataType::String => FieldType::String,
        _ => FieldType::None,
    }
}

fn to_series(field: &Field, cells: Vec<&CellValue>) -> Series {
    let name = field.label().into();
    if field.field_type() == FieldType::Number {
        let parsed: Vec<Option<f64>> = cells.iter().map(|cell| parse_f64(cell.raw())).collect();
        let lossless = cells
            .iter()
            .zip(&parsed)
            .all(|(cell, value)| cell.is_missing() || value.is_some());
        if lossless {
            return Series::new(name, parsed);
        }
        debug!(column = field.label(), "number column has non-numeric cells; keeping text");
    }
    let values: Vec<Option<String>> = cells
        .iter()
        .map(|cell| cell.as_str().map(str::to_string))
        .collect();
    Series::new(name, values)
}

/// One column per field. Number fields whose cells all parse become
/// `Float64`; everything else is `String`. Duplicate labels are rejected
/// by polars.
pub fn grid_to_frame(grid: &Grid) -> Result<DataFrame> {
    let columns: Vec<Column> = grid
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let cells: Vec<&CellValue> = grid.data().iter().map(|row| &row[idx]).collect();
            to_series(field, cells).into_column()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Fields typed from each column's dtype; cells in text form.
pub fn frame_to_grid(df: &DataFrame) -> Result<Grid> {
    let fields: Vec<Field> = df
        .get_columns()
        .iter()
        .map(|column| Field::labeled(column.name().as_str()).with_type(field_type_for(column.dtype())))
        .collect();
    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row = df
            .get_columns()
            .iter()
            .map(|column| column.get(idx).map(any_to_cell))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(Grid::from_parts(fields, rows)?)
}
