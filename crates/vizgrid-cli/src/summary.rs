use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use vizgrid_cli::types::{InspectReport, MappingTable};
use vizgrid_model::Value;

pub fn print_inspect(report: &InspectReport) {
    println!("Rows: {}", report.rows);
    println!("Checksum: {}", report.checksum);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Pattern"),
        header_cell("Non-empty"),
        header_cell("Distinct"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for column in &report.columns {
        table.add_row(vec![
            Cell::new(&column.label).add_attribute(Attribute::Bold),
            kind_cell(column.kind),
            column
                .pattern
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(column.non_empty),
            Cell::new(column.distinct),
        ]);
    }
    println!("{table}");
}

pub fn print_mapping(output: &MappingTable) {
    let mut table = Table::new();
    table.set_header(output.header.iter().map(|label| header_cell(label)));
    apply_table_style(&mut table);
    for row in &output.rows {
        table.add_row(row.iter().map(value_cell));
    }
    println!("{table}");
    println!("{} row(s)", output.rows.len());
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn value_cell(value: &Value) -> Cell {
    match value {
        Value::Null => dim_cell("null"),
        Value::Number(_) => Cell::new(value).set_alignment(CellAlignment::Right),
        _ => Cell::new(value),
    }
}

fn kind_cell(kind: &str) -> Cell {
    let color = match kind {
        "number" => Color::Green,
        "boolean" => Color::Magenta,
        "string" | "us-state" => Color::Reset,
        "empty" => Color::DarkGrey,
        _ => Color::Blue,
    };
    Cell::new(kind).fg(color)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
