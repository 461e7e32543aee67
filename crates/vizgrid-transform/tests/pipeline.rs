//! End-to-end pipeline runs over text-parsed specs.

use vizgrid_model::{Grid, Value, text_row};
use vizgrid_transform::{MappingOptions, MappingSpec, hipie_mappings};

fn specs(text: &[&str]) -> Vec<MappingSpec> {
    text.iter()
        .map(|s| s.parse().expect("valid spec"))
        .collect()
}

fn render(rows: &[Vec<Value>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|value| {
                    if value.is_null() {
                        "null".to_string()
                    } else {
                        value.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn sales() -> Grid {
    Grid::from_rows(
        ["Region", "Quarter", "Revenue", "Visits"],
        vec![
            text_row(["West", "Q1", "120", "40"]),
            text_row(["East", "Q1", "80", "20"]),
            text_row(["West", "Q2", "60", "20"]),
            text_row(["East", "Q2", "", "10"]),
            text_row(["West", "Q1", "20", "40"]),
        ],
    )
    .expect("grid")
}

#[test]
fn grouped_summary() {
    let out = hipie_mappings(
        &sales(),
        &specs(&["Region", "Quarter", "SUM(Revenue)", "AVE(Revenue,Visits)", "MAX(Visits)"]),
        &MappingOptions::default(),
    );
    insta::assert_snapshot!(render(&out), @r"
    West | Q1 | 140 | 1.75 | 40
    East | Q1 | 80 | 4 | 20
    West | Q2 | 60 | 3 | 20
    East | Q2 | 0 | 0 | 10
    ");
}

#[test]
fn row_wise_scale() {
    let out = hipie_mappings(
        &sales(),
        &specs(&["Region", "SCALE(Revenue,Visits)"]),
        &MappingOptions::default(),
    );
    insta::assert_snapshot!(render(&out), @r"
    West | 3
    East | 4
    West | 3
    East | null
    West | 0.5
    ");
}

#[test]
fn json_specs_match_text_specs() {
    let from_json: Vec<MappingSpec> =
        serde_json::from_str(r#"["Region", {"func": "SUM", "params": ["Revenue"]}]"#)
            .expect("json specs");
    assert_eq!(from_json, specs(&["Region", "SUM(Revenue)"]));
}
