//! Command pipelines: load a file into a grid, then profile, aggregate or
//! re-encode it.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};
use vizgrid_io::{DataFormat, read_path};
use vizgrid_model::Grid;
use vizgrid_transform::{MappingOptions, MappingSpec, hipie_mappings};

use crate::logging::redact_value;
use crate::types::{ColumnReport, InspectReport, MappingTable};

pub fn load_grid(path: &Path, format: Option<DataFormat>) -> Result<Grid> {
    let _span = info_span!("load", path = %path.display()).entered();
    let grid = read_path(path, format).with_context(|| format!("load {}", path.display()))?;
    info!(
        rows = grid.row_count(),
        columns = grid.width(),
        checksum = %grid.checksum(),
        "loaded grid"
    );
    Ok(grid)
}

/// Profile every column of `grid` and record the profiles on its fields.
pub fn inspect_grid(grid: &mut Grid) -> InspectReport {
    let profiles = grid.analyse_all();
    let columns = grid
        .fields()
        .iter()
        .zip(profiles)
        .map(|(field, profile)| ColumnReport {
            label: field.label().to_string(),
            kind: profile.kind(),
            pattern: profile.pattern.clone(),
            non_empty: profile.non_empty,
            distinct: profile.distinct,
        })
        .collect();
    InspectReport {
        rows: grid.row_count(),
        checksum: grid.checksum().to_hex(),
        columns,
    }
}

pub fn parse_specs(specs: &[String]) -> Result<Vec<MappingSpec>> {
    specs
        .iter()
        .map(|text| {
            text.parse::<MappingSpec>()
                .with_context(|| format!("invalid mapping spec '{text}'"))
        })
        .collect()
}

fn resolves(grid: &Grid, spec: &MappingSpec) -> bool {
    let found = |label: &str| grid.field_index(label).is_some();
    spec.numerator().is_some_and(found) && spec.denominator().is_none_or(found)
}

/// Run the aggregation pipeline. Specs whose columns do not exist are
/// left out of the header the same way the pipeline leaves them out of
/// the rows.
pub fn aggregate_grid(grid: &Grid, specs: &[MappingSpec], options: &MappingOptions) -> MappingTable {
    let header = specs
        .iter()
        .filter(|spec| resolves(grid, spec))
        .map(ToString::to_string)
        .collect();
    let rows = hipie_mappings(grid, specs, options);
    for row in &rows {
        let rendered = row
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        trace!(row = redact_value(&rendered), "mapped row");
    }
    info!(rows = rows.len(), mode = options.mode.as_str(), "mapping complete");
    MappingTable { header, rows }
}

/// Encode `grid` as `to`, transposing it first when `pivot` is set.
pub fn convert_grid(grid: &mut Grid, to: DataFormat, pivot: bool) -> Result<String> {
    if pivot {
        grid.pivot().context("pivot grid")?;
    }
    let text = to.encode(grid).with_context(|| format!("encode as {to}"))?;
    info!(format = %to, bytes = text.len(), "encoded grid");
    Ok(text)
}
