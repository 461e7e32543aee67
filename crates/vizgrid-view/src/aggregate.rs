//! Grouping whose rollup is a single scalar per group.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vizgrid_model::{ColumnRef, Grid, Row, parse_f64};

use crate::cache::{DerivedView, SharedGrid};
use crate::nest::{NestMap, NestNode, RollupView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFn {
    Sum,
    Mean,
    Min,
    Max,
}

impl AggregateFn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Reduce `values`. `None` when there is nothing to reduce, except for
    /// `sum` which is zero.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            Self::Sum => Some(values.iter().sum()),
            Self::Mean if values.is_empty() => None,
            Self::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
            Self::Min => values.iter().copied().reduce(f64::min),
            Self::Max => values.iter().copied().reduce(f64::max),
        }
    }
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateFn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "mean" | "ave" | "avg" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(format!("unknown aggregate function '{other}'")),
        }
    }
}

/// Numeric values of `column` across `rows`. Empty and non-numeric cells
/// are skipped.
pub fn numeric_values(rows: &[&Row], column: usize) -> Vec<f64> {
    rows.iter()
        .filter_map(|row| row.get(column))
        .filter_map(|cell| parse_f64(cell.raw()))
        .collect()
}

/// `func(column)`, optionally divided by `func(denominator)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub func: AggregateFn,
    pub column: ColumnRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denominator: Option<ColumnRef>,
}

impl AggregateSpec {
    pub fn new(func: AggregateFn, column: impl Into<ColumnRef>) -> Self {
        Self {
            func,
            column: column.into(),
            denominator: None,
        }
    }

    pub fn with_denominator(mut self, column: impl Into<ColumnRef>) -> Self {
        self.denominator = Some(column.into());
        self
    }

    /// Evaluate over one group. Unresolved columns are reported and yield
    /// `None`, as does a non-finite ratio.
    pub fn evaluate(&self, grid: &Grid, rows: &[&Row]) -> Option<f64> {
        let column = grid.resolve_or_report(&self.column)?;
        let numerator = self.func.apply(&numeric_values(rows, column))?;
        let Some(denominator) = &self.denominator else {
            return Some(numerator);
        };
        let column = grid.resolve_or_report(denominator)?;
        let denominator = self.func.apply(&numeric_values(rows, column))?;
        let ratio = numerator / denominator;
        ratio.is_finite().then_some(ratio)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub keys: Vec<String>,
    pub aggregate: Option<f64>,
}

pub struct AggregateView {
    inner: RollupView<Option<f64>>,
    spec: Option<AggregateSpec>,
}

impl AggregateView {
    /// Row count per group.
    pub fn count(grid: &SharedGrid, columns: Vec<ColumnRef>) -> Self {
        Self {
            inner: RollupView::new(grid, columns, |_, rows| Some(rows.len() as f64)),
            spec: None,
        }
    }

    pub fn new(grid: &SharedGrid, columns: Vec<ColumnRef>, spec: AggregateSpec) -> Self {
        let rollup_spec = spec.clone();
        Self {
            inner: RollupView::new(grid, columns, move |grid, rows| {
                rollup_spec.evaluate(grid, rows)
            }),
            spec: Some(spec),
        }
    }

    pub fn spec(&self) -> Option<&AggregateSpec> {
        self.spec.as_ref()
    }

    pub fn columns(&self) -> &[ColumnRef] {
        self.inner.columns()
    }

    pub fn entries(&self) -> Rc<NestNode<Option<f64>>> {
        self.inner.entries()
    }

    pub fn map(&self) -> NestMap<Option<f64>> {
        self.inner.map()
    }

    pub fn data(&self) -> Vec<AggregateRow> {
        self.inner
            .data()
            .into_iter()
            .map(|row| AggregateRow {
                keys: row.keys,
                aggregate: row.value,
            })
            .collect()
    }
}

impl DerivedView for AggregateView {
    fn source(&self) -> &SharedGrid {
        self.inner.source()
    }

    fn is_stale(&self) -> bool {
        self.inner.is_stale()
    }

    fn invalidate(&self) {
        self.inner.invalidate();
    }
}
