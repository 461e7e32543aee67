//! The aggregation pipeline.
//!
//! Given an ordered list of [`MappingSpec`]s the pipeline emits either one
//! row per group (when any spec is an aggregate function) or one row per
//! source row. Output columns follow spec order; specs whose columns do not
//! resolve are reported and dropped.

use tracing::debug;
use vizgrid_model::{CellValue, ColumnRef, EngineIssue, Grid, Row, Value, parse_f64};
use vizgrid_view::{AggregateFn, group_by_keys, numeric_values};

use crate::mapping::{MappingFn, MappingSpec};
use crate::options::{MappingMode, MappingOptions};

/// A spec with its columns resolved against the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Column {
    /// Position among the group-by columns, plus the source column.
    Group { key: usize, column: usize },
    Function {
        func: MappingFn,
        numerator: usize,
        denominator: Option<usize>,
    },
}

fn resolve_label(grid: &Grid, label: &str) -> Option<usize> {
    grid.resolve_or_report(&ColumnRef::Label(label.to_string()))
}

fn resolve(grid: &Grid, specs: &[MappingSpec]) -> Vec<Column> {
    let mut columns = Vec::with_capacity(specs.len());
    let mut group_keys = 0;
    for spec in specs {
        if spec.func().is_some()
            && let Err(err) = spec.validate()
        {
            EngineIssue::InvalidMappingSpec {
                spec: spec.to_string(),
                reason: err.to_string(),
            }
            .report();
            continue;
        }
        let Some(numerator) = spec.numerator().and_then(|label| resolve_label(grid, label)) else {
            continue;
        };
        match spec.func() {
            None => {
                columns.push(Column::Group {
                    key: group_keys,
                    column: numerator,
                });
                group_keys += 1;
            }
            Some(func) => {
                let denominator = match spec.denominator() {
                    Some(label) => match resolve_label(grid, label) {
                        Some(idx) => Some(idx),
                        None => continue,
                    },
                    None => None,
                };
                columns.push(Column::Function {
                    func,
                    numerator,
                    denominator,
                });
            }
        }
    }
    columns
}

fn is_aggregating(columns: &[Column], mode: MappingMode) -> bool {
    match mode {
        MappingMode::Auto => columns
            .iter()
            .any(|c| matches!(c, Column::Function { func, .. } if func.is_aggregate())),
        MappingMode::RowWise => false,
        MappingMode::Aggregate => true,
    }
}

fn report_invalid(columns: &[Column], aggregating: bool) {
    let mode = if aggregating {
        MappingMode::Aggregate
    } else {
        MappingMode::RowWise
    };
    for column in columns {
        if let Column::Function { func, .. } = column
            && func.is_aggregate() != aggregating
        {
            EngineIssue::InvalidAggregateFunction {
                func: func.to_string(),
                mode: mode.as_str().to_string(),
            }
            .report();
        }
    }
}

fn number(value: Option<f64>) -> Value {
    match value {
        Some(v) if v.is_finite() => Value::Number(v),
        _ => Value::Null,
    }
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Value {
    match (numerator, denominator) {
        (Some(n), Some(d)) => number(Some(n / d)),
        _ => Value::Null,
    }
}

/// One function column over one group.
fn aggregate(func: MappingFn, rows: &[&Row], numerator: usize, denominator: Option<usize>) -> Value {
    let values = numeric_values(rows, numerator);
    match func {
        MappingFn::Sum => number(AggregateFn::Sum.apply(&values)),
        MappingFn::Min => number(AggregateFn::Min.apply(&values)),
        MappingFn::Max => number(AggregateFn::Max.apply(&values)),
        // Ratio of sums. Without a denominator this is the mean.
        MappingFn::Ave => match denominator {
            Some(den) => ratio(
                AggregateFn::Sum.apply(&values),
                AggregateFn::Sum.apply(&numeric_values(rows, den)),
            ),
            None => number(AggregateFn::Mean.apply(&values)),
        },
        // Not a grouping function; fall back to a ratio of means.
        MappingFn::Scale => match denominator {
            Some(den) => ratio(
                AggregateFn::Mean.apply(&values),
                AggregateFn::Mean.apply(&numeric_values(rows, den)),
            ),
            None => number(AggregateFn::Mean.apply(&values)),
        },
    }
}

fn aggregate_rows(grid: &Grid, columns: &[Column]) -> Vec<Vec<Value>> {
    let keys: Vec<usize> = columns
        .iter()
        .filter_map(|c| match c {
            Column::Group { column, .. } => Some(*column),
            Column::Function { .. } => None,
        })
        .collect();
    let rows: Vec<&Row> = grid.data().iter().collect();
    group_by_keys(&rows, &keys)
        .into_iter()
        .map(|(group_key, group)| {
            columns
                .iter()
                .map(|column| match *column {
                    Column::Group { key, .. } => Value::text(group_key[key].clone()),
                    Column::Function {
                        func,
                        numerator,
                        denominator,
                    } => aggregate(func, &group, numerator, denominator),
                })
                .collect()
        })
        .collect()
}

fn cell_value(cell: Option<&CellValue>, missing_data: &str) -> Value {
    match cell {
        Some(CellValue::Text(text)) => Value::text(text.clone()),
        Some(CellValue::Missing) | None if !missing_data.is_empty() => Value::text(missing_data),
        Some(CellValue::Missing) | None => Value::Null,
    }
}

fn scale(row: &Row, numerator: usize, denominator: Option<usize>) -> Value {
    let value = |column: usize| row.get(column).and_then(|cell| parse_f64(cell.raw()));
    match denominator {
        Some(den) => ratio(value(numerator), value(den)),
        None => number(value(numerator)),
    }
}

fn row_wise_rows(grid: &Grid, columns: &[Column], missing_data: &str) -> Vec<Vec<Value>> {
    grid.data()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| match *column {
                    Column::Function {
                        func: MappingFn::Scale,
                        numerator,
                        denominator,
                    } => scale(row, numerator, denominator),
                    // Aggregates have no group here; pass the numerator through.
                    Column::Function { numerator, .. } | Column::Group { column: numerator, .. } => {
                        cell_value(row.get(numerator), missing_data)
                    }
                })
                .collect()
        })
        .collect()
}

/// Evaluate `specs` against `grid`.
///
/// In aggregating mode group-by columns come out as text and function
/// columns as numbers (null when a group has no numeric values). In
/// row-wise mode bare columns and misplaced aggregates pass the source text
/// through and `SCALE` divides per row.
pub fn hipie_mappings(grid: &Grid, specs: &[MappingSpec], options: &MappingOptions) -> Vec<Vec<Value>> {
    let columns = resolve(grid, specs);
    if columns.is_empty() {
        debug!(specs = specs.len(), "no mapping columns resolved");
        return Vec::new();
    }
    let aggregating = is_aggregating(&columns, options.mode);
    report_invalid(&columns, aggregating);
    debug!(
        specs = specs.len(),
        columns = columns.len(),
        aggregating,
        rows = grid.row_count(),
        "evaluating mappings"
    );
    if aggregating {
        aggregate_rows(grid, &columns)
    } else {
        row_wise_rows(grid, &columns, &options.missing_data)
    }
}

#[cfg(test)]
mod tests {
    use vizgrid_model::{Field, FieldType, text_row};

    use super::*;

    fn amounts() -> Grid {
        Grid::from_parts(
            vec![
                Field::labeled("Label").with_type(FieldType::String),
                Field::labeled("Amount").with_type(FieldType::Number),
            ],
            vec![
                text_row(["A", "10"]),
                text_row(["A", "5"]),
                text_row(["B", "20"]),
            ],
        )
        .expect("grid")
    }

    fn revenue() -> Grid {
        Grid::from_parts(
            vec![
                Field::labeled("Revenue").with_type(FieldType::Number),
                Field::labeled("Total").with_type(FieldType::Number),
            ],
            vec![text_row(["10", "100"]), text_row(["20", "200"])],
        )
        .expect("grid")
    }

    #[test]
    fn groups_and_sums_in_first_seen_order() {
        let specs = [
            MappingSpec::group_by("Label"),
            MappingSpec::function(MappingFn::Sum, "Amount"),
        ];
        let out = hipie_mappings(&amounts(), &specs, &MappingOptions::default());
        assert_eq!(
            out,
            vec![
                vec![Value::text("A"), Value::Number(15.0)],
                vec![Value::text("B"), Value::Number(20.0)],
            ]
        );
    }

    #[test]
    fn scale_divides_per_row() {
        let specs = [MappingSpec::ratio(MappingFn::Scale, "Revenue", "Total")];
        let out = hipie_mappings(&revenue(), &specs, &MappingOptions::default());
        assert_eq!(out, vec![vec![Value::Number(0.1)], vec![Value::Number(0.1)]]);
    }

    #[test]
    fn ave_is_ratio_of_sums() {
        let grid = Grid::from_rows(
            ["N", "D"],
            vec![text_row(["1", "2"]), text_row(["3", "6"]), text_row(["6", "8"])],
        )
        .expect("grid");
        let out = hipie_mappings(
            &grid,
            &[MappingSpec::ratio(MappingFn::Ave, "N", "D")],
            &MappingOptions::default(),
        );
        // (1 + 3 + 6) / (2 + 6 + 8), not the mean of 0.5, 0.5, 0.75.
        assert_eq!(out, vec![vec![Value::Number(10.0 / 16.0)]]);
    }

    #[test]
    fn min_max_and_mean() {
        let specs = [
            MappingSpec::group_by("Label"),
            MappingSpec::function(MappingFn::Min, "Amount"),
            MappingSpec::function(MappingFn::Max, "Amount"),
            MappingSpec::function(MappingFn::Ave, "Amount"),
        ];
        let out = hipie_mappings(&amounts(), &specs, &MappingOptions::default());
        assert_eq!(
            out[0],
            vec![
                Value::text("A"),
                Value::Number(5.0),
                Value::Number(10.0),
                Value::Number(7.5)
            ]
        );
    }

    #[test]
    fn scale_in_aggregating_mode_falls_back_to_ratio_of_means() {
        let grid = Grid::from_rows(
            ["G", "N", "D"],
            vec![
                text_row(["x", "1", "10"]),
                text_row(["x", "3", "30"]),
            ],
        )
        .expect("grid");
        let specs = [
            MappingSpec::group_by("G"),
            MappingSpec::function(MappingFn::Sum, "N"),
            MappingSpec::ratio(MappingFn::Scale, "N", "D"),
        ];
        let out = hipie_mappings(&grid, &specs, &MappingOptions::default());
        assert_eq!(
            out,
            vec![vec![Value::text("x"), Value::Number(4.0), Value::Number(0.1)]]
        );
    }

    #[test]
    fn unresolved_columns_are_dropped() {
        let specs = [
            MappingSpec::group_by("Nope"),
            MappingSpec::group_by("Label"),
            MappingSpec::ratio(MappingFn::Sum, "Amount", "Missing"),
            MappingSpec::function(MappingFn::Max, "Amount"),
        ];
        let out = hipie_mappings(&amounts(), &specs, &MappingOptions::default());
        assert_eq!(
            out,
            vec![
                vec![Value::text("A"), Value::Number(10.0)],
                vec![Value::text("B"), Value::Number(20.0)],
            ]
        );
    }

    #[test]
    fn function_specs_with_bad_params_are_dropped() {
        let specs: Vec<MappingSpec> = serde_json::from_str(
            r#"["Label", {"func": "SUM", "params": []}, {"func": "MAX", "params": ["Amount", "Amount", "Amount"]}]"#,
        )
        .expect("deserialize specs");
        let out = hipie_mappings(&amounts(), &specs, &MappingOptions::default());
        assert_eq!(
            out,
            vec![
                vec![Value::text("A")],
                vec![Value::text("A")],
                vec![Value::text("B")],
            ]
        );
    }

    #[test]
    fn row_wise_passes_columns_through() {
        let mut grid = amounts();
        grid.push_row(vec![CellValue::Missing, CellValue::text("1")])
            .expect("push row");
        let specs = [
            MappingSpec::group_by("Label"),
            MappingSpec::function(MappingFn::Sum, "Amount"),
        ];
        let options = MappingOptions::default()
            .with_mode(MappingMode::RowWise)
            .with_missing_data("n/a");
        let out = hipie_mappings(&grid, &specs, &options);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], vec![Value::text("A"), Value::text("10")]);
        assert_eq!(out[3], vec![Value::text("n/a"), Value::text("1")]);
    }

    #[test]
    fn forced_aggregate_without_functions_dedupes_groups() {
        let options = MappingOptions::default().with_mode(MappingMode::Aggregate);
        let out = hipie_mappings(&amounts(), &[MappingSpec::group_by("Label")], &options);
        assert_eq!(
            out,
            vec![
                vec![Value::text("A")],
                vec![Value::text("A")],
                vec![Value::text("B")],
            ]
        );
    }

    #[test]
    fn non_numeric_scale_is_null() {
        let grid = Grid::from_rows(["N", "D"], vec![text_row(["x", "2"]), text_row(["1", "0"])])
            .expect("grid");
        let out = hipie_mappings(
            &grid,
            &[MappingSpec::ratio(MappingFn::Scale, "N", "D")],
            &MappingOptions::default(),
        );
        assert_eq!(out, vec![vec![Value::Null], vec![Value::Null]]);
    }

    #[test]
    fn empty_inputs() {
        let options = MappingOptions::default();
        assert!(hipie_mappings(&Grid::new(), &[MappingSpec::group_by("A")], &options).is_empty());
        assert!(hipie_mappings(&amounts(), &[], &options).is_empty());
    }
}
