use vizgrid_model::Value;

/// One profiled column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnReport {
    pub label: String,
    pub kind: &'static str,
    pub pattern: Option<String>,
    pub non_empty: usize,
    pub distinct: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InspectReport {
    pub rows: usize,
    pub checksum: String,
    pub columns: Vec<ColumnReport>,
}

/// Pipeline output with one header label per emitted column.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}
