//! CLI argument definitions for `vizgrid`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use vizgrid_io::DataFormat;
use vizgrid_transform::MappingMode;

#[derive(Parser)]
#[command(
    name = "vizgrid",
    version,
    about = "Inspect, aggregate and convert tabular data files",
    long_about = "Load a JSON row-object, CSV or TSV file into a grid, then profile its \
                  columns, run an aggregation mapping over it, or re-encode it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Profile every column: inferred kind, matched pattern, counts.
    Inspect(InspectArgs),

    /// Evaluate mapping specs such as `Region` or `SUM(Revenue)`.
    Aggregate(AggregateArgs),

    /// Re-encode a file in another format.
    Convert(ConvertArgs),
}

#[derive(Parser)]
pub struct InputArgs {
    /// Data file (.json, .csv or .tsv).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Input format (default: from the file extension).
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Parser)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Parser)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output column spec; repeat for several columns, in output order.
    #[arg(long = "map", value_name = "SPEC", required = true)]
    pub map: Vec<String>,

    /// Grouped or row-wise evaluation.
    #[arg(long = "mode", value_enum, default_value = "auto")]
    pub mode: ModeArg,

    /// Placeholder for missing cells in row-wise output.
    #[arg(long = "missing", value_name = "TEXT", default_value = "")]
    pub missing: String,
}

#[derive(Parser)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format.
    #[arg(long = "to", value_enum)]
    pub to: FormatArg,

    /// Transpose rows and columns before writing.
    #[arg(long = "pivot")]
    pub pivot: bool,

    /// Output file (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
    Tsv,
}

impl From<FormatArg> for DataFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => Self::Json,
            FormatArg::Csv => Self::Csv,
            FormatArg::Tsv => Self::Tsv,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Auto,
    RowWise,
    Aggregate,
}

impl From<ModeArg> for MappingMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Auto => Self::Auto,
            ModeArg::RowWise => Self::RowWise,
            ModeArg::Aggregate => Self::Aggregate,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
