//! Pipeline options.

use serde::{Deserialize, Serialize};

/// How the pipeline decides between grouped and row-wise output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    /// Aggregate when any spec is a grouping function, otherwise row-wise.
    #[default]
    Auto,
    /// One output row per source row.
    RowWise,
    /// One output row per group, even with only `SCALE` or bare columns.
    Aggregate,
}

impl MappingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::RowWise => "row-wise",
            Self::Aggregate => "aggregating",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingOptions {
    pub mode: MappingMode,
    /// Substituted for missing source cells in row-wise output. Empty means
    /// missing cells become null.
    pub missing_data: String,
}

impl MappingOptions {
    pub fn with_mode(mut self, mode: MappingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_missing_data(mut self, placeholder: impl Into<String>) -> Self {
        self.missing_data = placeholder.into();
        self
    }
}
