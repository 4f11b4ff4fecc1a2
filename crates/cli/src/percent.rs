// Pixel counts to row percentages

use lithoframe_config::Config;
use lithoframe_core::{Table, Value};

/// Minerals of both palettes, deduplicated in palette order. Percentage
/// conversion normalizes over whichever of these a table actually has.
pub fn mineral_union(config: &Config) -> Vec<String> {
    let mut union: Vec<String> = Vec::new();
    for mineral in config.detailed.minerals().iter().chain(config.reduced.minerals()) {
        if !union.iter().any(|m| m.eq_ignore_ascii_case(mineral)) {
            union.push(mineral.clone());
        }
    }
    union
}

/// Rebuild a table with each mineral cell divided by its row's mineral sum
/// and scaled to 100. Non-mineral columns pass through; rows whose mineral
/// sum is zero are left as they are.
pub fn percentages(table: &Table, minerals: &[String]) -> Table {
    let mineral_cols: Vec<usize> = minerals
        .iter()
        .filter_map(|m| table.find_column(m))
        .collect();

    let mut out = Table::new();
    for row in 0..table.row_count() {
        let sum: f64 = mineral_cols
            .iter()
            .filter_map(|&col| table.value(row, col).as_f64())
            .sum();
        let rebuilt = table
            .columns()
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let value = table.value(row, col);
                let scaled = match value.as_f64() {
                    Some(v) if sum != 0.0 && mineral_cols.contains(&col) => {
                        Value::Float(v / sum * 100.0)
                    }
                    _ => value.clone(),
                };
                (name.clone(), scaled)
            })
            .collect();
        out.append(rebuilt);
    }
    out
}
