//! Shared row-object merge used by every text decoder.

use tracing::debug;
use vizgrid_model::{CellValue, Field, Grid, Row, merge_schema};

use crate::error::Result;

/// Append `records` (key/cell pairs) to `grid`.
///
/// Keys matching an existing label reuse that column; unseen keys append
/// trailing columns in first-seen order. Rows written before a column
/// existed read it as missing. A repeated key within one record keeps the
/// last value.
pub fn merge_records<I, R>(grid: &mut Grid, records: I) -> Result<usize>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = (String, CellValue)>,
{
    let mut fields = grid.fields().to_vec();
    let mut rows: Vec<Row> = Vec::new();
    for record in records {
        let (keys, cells): (Vec<String>, Vec<CellValue>) = record.into_iter().unzip();
        let merge = merge_schema(&fields, keys.iter().map(String::as_str));
        fields = merge.fields;
        let mut row = vec![CellValue::Missing; fields.len()];
        for (position, cell) in merge.positions.into_iter().zip(cells) {
            row[position] = cell;
        }
        rows.push(row);
    }
    append(grid, fields.len(), fields, rows)
}

/// Append rows whose cells are already in column order of `labels`.
pub fn merge_table(grid: &mut Grid, labels: &[String], table: Vec<Row>) -> Result<usize> {
    let merge = merge_schema(grid.fields(), labels.iter().map(String::as_str));
    let width = merge.fields.len();
    let rows = table
        .into_iter()
        .map(|cells| {
            let mut row = vec![CellValue::Missing; width];
            for (position, cell) in merge.positions.iter().zip(cells) {
                row[*position] = cell;
            }
            row
        })
        .collect();
    append(grid, width, merge.fields, rows)
}

fn append(grid: &mut Grid, width: usize, fields: Vec<Field>, rows: Vec<Row>) -> Result<usize> {
    let added = rows.len();
    let added_columns = width - grid.width();
    if added_columns > 0 {
        grid.set_fields(fields);
    }
    let mut data = grid.data().to_vec();
    data.extend(rows);
    grid.set_data(data)?;
    debug!(rows = added, new_columns = added_columns, "merged records into grid");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use vizgrid_model::text_row;

    use super::*;

    fn pair(key: &str, value: &str) -> (String, CellValue) {
        (key.to_string(), CellValue::text(value))
    }

    #[test]
    fn unseen_keys_append_columns() {
        let mut grid = Grid::from_rows(["a"], vec![text_row(["1"])]).expect("grid");
        let added = merge_records(
            &mut grid,
            vec![vec![pair("b", "x"), pair("a", "2")], vec![pair("c", "y")]],
        )
        .expect("merge");
        assert_eq!(added, 2);
        assert_eq!(grid.header(), vec!["a", "b", "c"]);
        assert_eq!(
            grid.data(),
            &[
                vec![CellValue::text("1"), CellValue::Missing, CellValue::Missing],
                vec![CellValue::text("2"), CellValue::text("x"), CellValue::Missing],
                vec![CellValue::Missing, CellValue::Missing, CellValue::text("y")],
            ]
        );
    }

    #[test]
    fn table_rows_follow_merged_positions() {
        let mut grid = Grid::from_rows(["b"], Vec::new()).expect("grid");
        let labels = vec!["a".to_string(), "b".to_string()];
        merge_table(&mut grid, &labels, vec![text_row(["1", "2"])]).expect("merge");
        assert_eq!(grid.header(), vec!["b", "a"]);
        assert_eq!(grid.data()[0], text_row(["2", "1"]));
    }
}
