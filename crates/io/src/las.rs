// LAS 2.0 well-log read/write

use std::fs;
use std::io::Write;
use std::path::Path;

use lithoframe_core::{Row, Table, Value};

use crate::csv::guess_value;
use crate::error::IoError;
use crate::mnemonic::mnemonics;

/// Conventional LAS "no value" sentinel.
pub const DEFAULT_NULL: f64 = -999.25;

const WELL_COLUMN: &str = "Well";
const DEPTH_COLUMN: &str = "Depth";
const DEPTH_UNIT_COLUMN: &str = "Depth unit";

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Curve {
    pub mnemonic: String,
    pub unit: String,
    pub descr: String,
}

impl Curve {
    /// Column name for this curve: the free-text description when present,
    /// the mnemonic otherwise.
    pub fn column_name(&self) -> &str {
        if self.descr.is_empty() {
            &self.mnemonic
        } else {
            &self.descr
        }
    }
}

/// A parsed LAS file: well-section metadata plus the data matrix, row-major
/// with one value per curve.
#[derive(Debug)]
pub struct LasFile {
    pub well_name: Option<String>,
    pub depth_unit: Option<String>,
    pub null_value: f64,
    pub curves: Vec<Curve>,
    pub rows: Vec<Vec<Value>>,
}

impl LasFile {
    /// Convert to engine rows. Curve descriptions become column names, and
    /// the well-section metadata is injected as uniform `Well` and
    /// `Depth unit` columns, when the file carries it.
    pub fn rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|cells| {
                let mut row: Row = self
                    .curves
                    .iter()
                    .zip(cells)
                    .map(|(curve, value)| (curve.column_name().to_string(), value.clone()))
                    .collect();
                if let Some(well) = &self.well_name {
                    row.push((WELL_COLUMN.to_string(), Value::Str(well.clone())));
                }
                if let Some(unit) = &self.depth_unit {
                    row.push((DEPTH_UNIT_COLUMN.to_string(), Value::Str(unit.clone())));
                }
                row
            })
            .collect()
    }
}

pub fn read_las(path: &Path) -> Result<LasFile, IoError> {
    let content = fs::read_to_string(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_las(&content).map_err(|message| IoError::Las {
        path: path.to_path_buf(),
        message,
    })
}

/// Read a LAS file straight to engine rows.
pub fn read_rows(path: &Path) -> Result<Vec<Row>, IoError> {
    Ok(read_las(path)?.rows())
}

#[derive(PartialEq)]
enum Section {
    Version,
    Well,
    Curves,
    Data,
    Skip,
}

fn parse_las(content: &str) -> Result<LasFile, String> {
    let mut las = LasFile {
        well_name: None,
        depth_unit: None,
        null_value: DEFAULT_NULL,
        curves: Vec::new(),
        rows: Vec::new(),
    };
    let mut section = Section::Skip;
    let mut tokens: Vec<&str> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(marker) = line.strip_prefix('~') {
            section = match marker.chars().next().map(|c| c.to_ascii_uppercase()) {
                Some('V') => Section::Version,
                Some('W') => Section::Well,
                Some('C') => Section::Curves,
                Some('A') => Section::Data,
                _ => Section::Skip,
            };
            continue;
        }
        match section {
            Section::Version => {
                let (mnemonic, _, data, _) = parse_header_line(line)?;
                if mnemonic == "VERS" && data != "2.0" && data != "1.2" {
                    return Err(format!("unsupported LAS version {data}"));
                }
            }
            Section::Well => {
                let (mnemonic, unit, data, _) = parse_header_line(line)?;
                match mnemonic.as_str() {
                    "WELL" if !data.is_empty() => las.well_name = Some(data),
                    "STEP" if !unit.is_empty() => las.depth_unit = Some(unit),
                    "NULL" => {
                        las.null_value = data
                            .parse()
                            .map_err(|_| format!("invalid NULL value {data:?}"))?;
                    }
                    _ => {}
                }
            }
            Section::Curves => {
                let (mnemonic, unit, _, descr) = parse_header_line(line)?;
                las.curves.push(Curve { mnemonic, unit, descr });
            }
            Section::Data => tokens.extend(line.split_whitespace()),
            Section::Skip => {}
        }
    }

    if las.curves.is_empty() {
        return Err("no curve section".to_string());
    }
    if tokens.len() % las.curves.len() != 0 {
        return Err(format!(
            "data section has {} values, not a multiple of {} curves",
            tokens.len(),
            las.curves.len()
        ));
    }
    las.rows = tokens
        .chunks(las.curves.len())
        .map(|chunk| chunk.iter().map(|t| parse_cell(t, las.null_value)).collect())
        .collect();
    Ok(las)
}

/// Parse a `MNEM.UNIT DATA : DESCR` header line. The description is
/// everything after the last colon; the unit runs from the first dot to the
/// first whitespace.
fn parse_header_line(line: &str) -> Result<(String, String, String, String), String> {
    let (body, descr) = match line.rfind(':') {
        Some(idx) => (&line[..idx], line[idx + 1..].trim()),
        None => (line, ""),
    };
    let (mnemonic, rest) = body
        .split_once('.')
        .ok_or_else(|| format!("malformed header line {line:?}"))?;
    let rest = rest.trim_end();
    let (unit, data) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };
    Ok((
        mnemonic.trim().to_string(),
        unit.to_string(),
        data.to_string(),
        descr.to_string(),
    ))
}

fn parse_cell(token: &str, null_value: f64) -> Value {
    if let Ok(v) = token.parse::<f64>() {
        if v == null_value {
            return Value::Null;
        }
    }
    guess_value(token)
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write a result table as LAS 2.0. Curves are `Depth` plus the supplied
/// mineral columns, with shortened mnemonics and the full column name as
/// description. STRT/STOP span the depth column; WELL and the depth unit
/// come from the table's uniform metadata columns.
pub fn write_las(table: &Table, minerals: &[String], path: &Path) -> Result<(), IoError> {
    let depth = table
        .find_column(DEPTH_COLUMN)
        .ok_or(IoError::MissingColumn { path: path.to_path_buf(), column: DEPTH_COLUMN })?;
    let unit_col = table
        .find_column(DEPTH_UNIT_COLUMN)
        .ok_or(IoError::MissingColumn { path: path.to_path_buf(), column: DEPTH_UNIT_COLUMN })?;
    let well_col = table
        .find_column(WELL_COLUMN)
        .ok_or(IoError::MissingColumn { path: path.to_path_buf(), column: WELL_COLUMN })?;

    let unit = table.value(0, unit_col).to_string();
    let well = table.value(0, well_col).to_string();

    let depths: Vec<f64> = (0..table.row_count())
        .filter_map(|row| table.value(row, depth).as_f64())
        .collect();
    if depths.is_empty() {
        return Err(IoError::Las {
            path: path.to_path_buf(),
            message: format!("'{DEPTH_COLUMN}' column has no numeric values"),
        });
    }
    let strt = depths.iter().copied().fold(f64::INFINITY, f64::min);
    let stop = depths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut step = (stop - strt) / table.row_count() as f64;
    if step == 0.0 {
        step = 1.0;
    }

    let mut columns = vec![DEPTH_COLUMN.to_string()];
    columns.extend(minerals.iter().cloned());
    let names = mnemonics(&columns);

    let mut out = Vec::new();
    render_las(&mut out, table, &columns, &names, &unit, &well, strt, stop, step).map_err(|e| {
        IoError::Write { path: path.to_path_buf(), source: e }
    })?;
    fs::write(path, out).map_err(|e| IoError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[allow(clippy::too_many_arguments)]
fn render_las(
    out: &mut impl Write,
    table: &Table,
    columns: &[String],
    names: &[String],
    unit: &str,
    well: &str,
    strt: f64,
    stop: f64,
    step: f64,
) -> std::io::Result<()> {
    writeln!(out, "~Version")?;
    writeln!(out, "VERS.   2.0 : CWLS log ASCII Standard - Version 2.0")?;
    writeln!(out, "WRAP.   NO : One line per depth step")?;
    writeln!(out, "~Well")?;
    writeln!(out, "STRT.{unit} {strt} : START DEPTH")?;
    writeln!(out, "STOP.{unit} {stop} : STOP DEPTH")?;
    writeln!(out, "STEP.{unit} {step} : STEP")?;
    writeln!(out, "NULL.   {DEFAULT_NULL} : NULL VALUE")?;
    writeln!(out, "WELL.   {well} : WELL NAME")?;
    writeln!(out, "~Curve Information")?;
    for (name, column) in names.iter().zip(columns) {
        let unit = if column == DEPTH_COLUMN { unit } else { "" };
        writeln!(out, "{name}.{unit} : {column}")?;
    }
    writeln!(out, "~ASCII")?;
    for row in 0..table.row_count() {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| match table.find_column(column) {
                Some(col) => {
                    let value = table.value(row, col);
                    if value.is_null() {
                        DEFAULT_NULL.to_string()
                    } else {
                        value.to_string()
                    }
                }
                None => DEFAULT_NULL.to_string(),
            })
            .collect();
        writeln!(out, "{}", cells.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
~Version ---------------------------------------------------
VERS.   2.0 : CWLS log ASCII Standard - Version 2.0
WRAP.   NO : One line per depth step
~Well ------------------------------------------------------
STRT.M  1590.0 : START DEPTH
STOP.M  1592.0 : STOP DEPTH
STEP.M  1.0 : STEP
NULL.   -999.25 : NULL VALUE
WELL.   25/2-18 C : WELL NAME
~Curve Information -----------------------------------------
DEPT.M     : Depth
QRTZ.      : Quartz
CLCT.      : Calcite
~ASCII -----------------------------------------------------
 1590.0 10 20
 1591.0 30 -999.25
 1592.0 50 60
";

    #[test]
    fn parses_sections_and_data() {
        let las = parse_las(SAMPLE).unwrap();
        assert_eq!(las.well_name.as_deref(), Some("25/2-18 C"));
        assert_eq!(las.depth_unit.as_deref(), Some("M"));
        assert_eq!(las.curves.len(), 3);
        assert_eq!(las.curves[1].column_name(), "Quartz");
        assert_eq!(las.rows.len(), 3);
        assert_eq!(las.rows[0][1], Value::Int(10));
        assert_eq!(las.rows[1][2], Value::Null);
    }

    #[test]
    fn rows_inject_well_and_depth_unit() {
        let las = parse_las(SAMPLE).unwrap();
        let rows = las.rows();
        assert_eq!(rows[0][0], ("Depth".to_string(), Value::Float(1590.0)));
        assert!(rows[0].contains(&("Well".to_string(), Value::Str("25/2-18 C".into()))));
        assert!(rows[0].contains(&("Depth unit".to_string(), Value::Str("M".into()))));
    }

    #[test]
    fn wrapped_data_lines_are_rechunked() {
        let wrapped = SAMPLE.replace(" 1590.0 10 20", " 1590.0\n 10 20");
        let las = parse_las(&wrapped).unwrap();
        assert_eq!(las.rows.len(), 3);
        assert_eq!(las.rows[0][2], Value::Int(20));
    }

    #[test]
    fn uneven_data_section_is_rejected() {
        let truncated = SAMPLE.replace(" 1592.0 50 60", " 1592.0 50");
        let err = parse_las(&truncated).unwrap_err();
        assert!(err.contains("not a multiple"), "{err}");
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let v3 = SAMPLE.replace("VERS.   2.0", "VERS.   3.0");
        assert!(parse_las(&v3).unwrap_err().contains("version"));
    }

    #[test]
    fn mnemonic_is_the_fallback_column_name() {
        let anonymous = SAMPLE.replace("QRTZ.      : Quartz", "QRTZ.      :");
        let las = parse_las(&anonymous).unwrap();
        assert_eq!(las.curves[1].column_name(), "QRTZ");
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.las");

        let mut table = Table::new();
        for (depth, quartz) in [(1590.5, 10), (1591.5, 30), (1592.5, 50)] {
            table.append(vec![
                ("Depth".to_string(), Value::Float(depth)),
                ("Quartz".to_string(), Value::Int(quartz)),
                ("Well".to_string(), Value::Str("25/2-18 C".into())),
                ("Depth unit".to_string(), Value::Str("M".into())),
            ]);
        }
        write_las(&table, &["Quartz".to_string()], &path).unwrap();

        let las = read_las(&path).unwrap();
        assert_eq!(las.well_name.as_deref(), Some("25/2-18 C"));
        assert_eq!(las.depth_unit.as_deref(), Some("M"));
        assert_eq!(las.curves[0].column_name(), "Depth");
        assert_eq!(las.curves[1].column_name(), "Quartz");
        assert_eq!(las.rows[0], vec![Value::Float(1590.5), Value::Int(10)]);
        assert_eq!(las.rows[2], vec![Value::Float(1592.5), Value::Int(50)]);
    }

    #[test]
    fn non_numeric_depths_are_rejected_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.las");

        let mut table = Table::new();
        table.append(vec![
            ("Depth".to_string(), Value::Str("shallow".into())),
            ("Quartz".to_string(), Value::Int(10)),
            ("Well".to_string(), Value::Str("25/2-18 C".into())),
            ("Depth unit".to_string(), Value::Str("M".into())),
        ]);
        let err = write_las(&table, &["Quartz".to_string()], &path).unwrap_err();
        assert!(err.to_string().contains("no numeric values"), "{err}");
    }

    #[test]
    fn header_line_description_is_after_the_last_colon() {
        let (mnemonic, unit, data, descr) =
            parse_header_line("WELL.   25/2-18 C : WELL: NAME").unwrap();
        assert_eq!(mnemonic, "WELL");
        assert_eq!(unit, "");
        assert_eq!(data, "25/2-18 C : WELL");
        assert_eq!(descr, "NAME");
    }
}
