//! Text format selection for file-level decode and encode.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vizgrid_model::Grid;

use crate::delimited::{DelimitedOptions, from_delimited_str, to_delimited_string};
use crate::error::{CodecError, Result};
use crate::json::{from_json_str, to_json_string_pretty};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Json,
    Csv,
    Tsv,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        }
    }

    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        extension.parse()
    }

    pub fn decode(&self, text: &str) -> Result<Grid> {
        match self {
            Self::Json => from_json_str(text),
            Self::Csv => from_delimited_str(text, DelimitedOptions::csv()),
            Self::Tsv => from_delimited_str(text, DelimitedOptions::tsv()),
        }
    }

    pub fn encode(&self, grid: &Grid) -> Result<String> {
        match self {
            Self::Json => to_json_string_pretty(grid),
            Self::Csv => to_delimited_string(grid, DelimitedOptions::csv()),
            Self::Tsv => to_delimited_string(grid, DelimitedOptions::tsv()),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            _ => Err(CodecError::UnknownFormat(s.to_string())),
        }
    }
}

pub fn read_path(path: &Path, format: Option<DataFormat>) -> Result<Grid> {
    let format = match format {
        Some(format) => format,
        None => DataFormat::from_path(path)?,
    };
    let text = std::fs::read_to_string(path)?;
    format.decode(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_from_extensions() {
        assert_eq!(DataFormat::from_path(Path::new("a/b.CSV")).ok(), Some(DataFormat::Csv));
        assert_eq!(DataFormat::from_path(Path::new("rows.json")).ok(), Some(DataFormat::Json));
        assert_eq!(DataFormat::from_path(Path::new("t.tsv")).ok(), Some(DataFormat::Tsv));
        assert!(matches!(
            DataFormat::from_path(Path::new("noext")),
            Err(CodecError::UnknownFormat(_))
        ));
    }

    #[test]
    fn decode_then_encode_other_format() {
        let grid = DataFormat::Csv.decode("a,b\n1,\n").expect("decode");
        let json = DataFormat::Json.encode(&grid).expect("encode");
        let back = DataFormat::Json.decode(&json).expect("decode");
        assert_eq!(back.data(), grid.data());
    }
}
