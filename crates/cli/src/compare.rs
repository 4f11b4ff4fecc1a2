// litho compare - reconcile two inputs and diff the results

use std::path::Path;

use serde_json::json;

use lithoframe_core::{Table, Value};

use crate::create;
use crate::percent;
use crate::CliError;

/// Tolerance for percentage detection and numeric cell comparison.
pub const EPSILON: f64 = 0.01;

pub fn cmd_compare(
    config: Option<&Path>,
    file1: &Path,
    file2: &Path,
    json: bool,
) -> Result<(), CliError> {
    let config = create::load_config(config)?;
    let mut frame1 = create::process_files(&config, &[file1.to_path_buf()])?;
    let mut frame2 = create::process_files(&config, &[file2.to_path_buf()])?;

    if frame1.requires_translation() || frame2.requires_translation() {
        eprintln!("frames require translation");
        frame1
            .apply_translation(&config.translation)
            .map_err(CliError::data)?;
        frame2
            .apply_translation(&config.translation)
            .map_err(CliError::data)?;
    }

    let minerals = frame1.minerals().map_err(CliError::data)?.to_vec();
    let mut result1 = frame1.result().map_err(CliError::data)?.clone();
    let mut result2 = frame2.result().map_err(CliError::data)?.clone();

    // One percentage-based side forces both sides to percentages, otherwise
    // every cell would differ trivially.
    if has_percent_row(&minerals, &result1) || has_percent_row(&minerals, &result2) {
        eprintln!("converting to percentage-based");
        let union = percent::mineral_union(&config);
        result1 = percent::percentages(&result1, &union);
        result2 = percent::percentages(&result2, &union);
    }

    let report = diff_tables(&result1, &result2);
    if json {
        print_json(&report, file1, file2);
    } else {
        print_report(&report, file1, file2);
    }

    if report.is_identical() {
        Ok(())
    } else {
        Err(CliError::differs())
    }
}

// ---------------------------------------------------------------------------
// Diffing
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CellDiff {
    pub depth: String,
    pub column: String,
    pub left: Value,
    pub right: Value,
}

#[derive(Debug, Default)]
pub struct Report {
    pub extra_left: Vec<String>,
    pub extra_right: Vec<String>,
    pub missing_left: Vec<String>,
    pub missing_right: Vec<String>,
    pub diffs: Vec<CellDiff>,
}

impl Report {
    pub fn is_identical(&self) -> bool {
        self.extra_left.is_empty()
            && self.extra_right.is_empty()
            && self.missing_left.is_empty()
            && self.missing_right.is_empty()
            && self.diffs.is_empty()
    }
}

/// Diff two result tables over their shared columns, keyed on `Depth`.
pub fn diff_tables(left: &Table, right: &Table) -> Report {
    let mut report = Report::default();

    let shared: Vec<&String> = left
        .columns()
        .iter()
        .filter(|c| right.find_column(c).is_some())
        .collect();
    report.extra_left = column_complement(left, right);
    report.extra_right = column_complement(right, left);

    let left_depths = depth_index(left);
    let right_depths = depth_index(right);

    for (depth, _) in &right_depths {
        if !left_depths.iter().any(|(d, _)| d == depth) {
            report.missing_left.push(depth.clone());
        }
    }
    for (depth, left_row) in &left_depths {
        let Some((_, right_row)) = right_depths.iter().find(|(d, _)| d == depth) else {
            report.missing_right.push(depth.clone());
            continue;
        };
        for column in &shared {
            // find_column succeeded for every shared column above
            let (Some(lcol), Some(rcol)) = (left.find_column(column), right.find_column(column))
            else {
                continue;
            };
            let lvalue = left.value(*left_row, lcol);
            let rvalue = right.value(*right_row, rcol);
            if cell_differs(lvalue, rvalue) {
                report.diffs.push(CellDiff {
                    depth: depth.clone(),
                    column: (*column).clone(),
                    left: lvalue.clone(),
                    right: rvalue.clone(),
                });
            }
        }
    }
    report
}

fn column_complement(of: &Table, against: &Table) -> Vec<String> {
    of.columns()
        .iter()
        .filter(|c| against.find_column(c).is_none())
        .cloned()
        .collect()
}

fn depth_index(table: &Table) -> Vec<(String, usize)> {
    match table.find_column("Depth") {
        Some(col) => (0..table.row_count())
            .map(|row| (table.value(row, col).to_string(), row))
            .collect(),
        None => Vec::new(),
    }
}

/// Numeric cells compare within EPSILON; everything else compares exactly.
fn cell_differs(left: &Value, right: &Value) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => (l - r).abs() >= EPSILON,
        _ => left != right,
    }
}

/// True when any row's minerals sum to 100 within tolerance, meaning the
/// table holds percentages rather than raw counts.
pub fn has_percent_row(minerals: &[String], table: &Table) -> bool {
    let cols: Vec<usize> = minerals
        .iter()
        .filter_map(|m| table.find_column(m))
        .collect();
    (0..table.row_count()).any(|row| {
        let sum: f64 = cols
            .iter()
            .filter_map(|&col| table.value(row, col).as_f64())
            .sum();
        (sum - 100.0).abs() < EPSILON
    })
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_report(report: &Report, file1: &Path, file2: &Path) {
    println!("Comparison result:");
    if !report.extra_left.is_empty() {
        println!(
            "Extra columns in {}: [{}]",
            file1.display(),
            report.extra_left.join(", ")
        );
    }
    if !report.extra_right.is_empty() {
        println!(
            "Extra columns in {}: [{}]",
            file2.display(),
            report.extra_right.join(", ")
        );
    }
    println!("{}", "-".repeat(40));
    for depth in &report.missing_left {
        println!("depth {depth}: only in {}", file2.display());
    }
    for depth in &report.missing_right {
        println!("depth {depth}: only in {}", file1.display());
    }
    for diff in &report.diffs {
        println!(
            "depth {}: {}: {} != {}",
            diff.depth, diff.column, diff.left, diff.right
        );
    }
    if report.missing_left.is_empty() && report.missing_right.is_empty() && report.diffs.is_empty()
    {
        println!("File data in matching columns is identical");
    }
}

fn print_json(report: &Report, file1: &Path, file2: &Path) {
    let diffs: Vec<serde_json::Value> = report
        .diffs
        .iter()
        .map(|d| {
            json!({
                "depth": d.depth,
                "column": d.column,
                "left": json_value(&d.left),
                "right": json_value(&d.right),
            })
        })
        .collect();
    let report = json!({
        "files": [file1.display().to_string(), file2.display().to_string()],
        "extra_columns": [report.extra_left, report.extra_right],
        "missing_depths": [report.missing_left, report.missing_right],
        "differences": diffs,
        "identical": report.is_identical(),
    });
    println!("{report}");
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(i) => json!(i),
        Value::Float(v) => json!(v),
        Value::Str(s) => json!(s),
        Value::Null => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, i64, i64)]) -> Table {
        let mut t = Table::new();
        for (depth, a, b) in rows {
            t.append(vec![
                ("Depth".to_string(), Value::Str(depth.to_string())),
                ("A".to_string(), Value::Int(*a)),
                ("B".to_string(), Value::Int(*b)),
            ]);
        }
        t
    }

    #[test]
    fn identical_tables_produce_an_empty_report() {
        let t = table(&[("100", 1, 2), ("101", 3, 4)]);
        let report = diff_tables(&t, &t.clone());
        assert!(report.is_identical());
    }

    #[test]
    fn differing_cells_are_keyed_on_depth() {
        let left = table(&[("100", 1, 2), ("101", 3, 4)]);
        let right = table(&[("101", 3, 9), ("100", 1, 2)]);
        let report = diff_tables(&left, &right);
        assert_eq!(report.diffs.len(), 1);
        assert_eq!(report.diffs[0].depth, "101");
        assert_eq!(report.diffs[0].column, "B");
        assert_eq!(report.diffs[0].left, Value::Int(4));
        assert_eq!(report.diffs[0].right, Value::Int(9));
    }

    #[test]
    fn rows_on_one_side_only_are_reported() {
        let left = table(&[("100", 1, 2)]);
        let right = table(&[("100", 1, 2), ("101", 3, 4)]);
        let report = diff_tables(&left, &right);
        assert_eq!(report.missing_left, vec!["101"]);
        assert!(report.missing_right.is_empty());
        assert!(!report.is_identical());
    }

    #[test]
    fn extra_columns_are_reported_per_side() {
        let left = table(&[("100", 1, 2)]);
        let mut right = Table::new();
        right.append(vec![
            ("Depth".to_string(), Value::Str("100".into())),
            ("A".to_string(), Value::Int(1)),
            ("C".to_string(), Value::Int(7)),
        ]);
        let report = diff_tables(&left, &right);
        assert_eq!(report.extra_left, vec!["B"]);
        assert_eq!(report.extra_right, vec!["C"]);
    }

    #[test]
    fn numeric_cells_compare_within_tolerance() {
        assert!(!cell_differs(&Value::Float(33.333333), &Value::Float(33.339)));
        assert!(cell_differs(&Value::Float(33.3), &Value::Float(33.4)));
        assert!(!cell_differs(&Value::Int(10), &Value::Float(10.0)));
        assert!(cell_differs(&Value::Str("m".into()), &Value::Str("ft".into())));
        assert!(cell_differs(&Value::Null, &Value::Int(0)));
    }

    #[test]
    fn percent_rows_are_detected() {
        let minerals = vec!["A".to_string(), "B".to_string()];
        assert!(has_percent_row(&minerals, &table(&[("100", 75, 25)])));
        assert!(!has_percent_row(&minerals, &table(&[("100", 30, 20)])));
    }
}
