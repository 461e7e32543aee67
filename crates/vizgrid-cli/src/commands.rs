use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use vizgrid_cli::pipeline::{aggregate_grid, convert_grid, inspect_grid, load_grid, parse_specs};
use vizgrid_cli::types::{InspectReport, MappingTable};
use vizgrid_io::DataFormat;
use vizgrid_model::Grid;
use vizgrid_transform::MappingOptions;

use crate::cli::{AggregateArgs, ConvertArgs, InputArgs, InspectArgs};

fn load(input: &InputArgs) -> Result<Grid> {
    load_grid(&input.file, input.format.map(DataFormat::from))
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectReport> {
    let mut grid = load(&args.input)?;
    Ok(inspect_grid(&mut grid))
}

pub fn run_aggregate(args: &AggregateArgs) -> Result<MappingTable> {
    let specs = parse_specs(&args.map)?;
    let grid = load(&args.input)?;
    let options = MappingOptions::default()
        .with_mode(args.mode.into())
        .with_missing_data(args.missing.clone());
    Ok(aggregate_grid(&grid, &specs, &options))
}

pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    let mut grid = load(&args.input)?;
    let text = convert_grid(&mut grid, args.to.into(), args.pivot)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
