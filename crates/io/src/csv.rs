// CSV import/export

use std::io::Write;
use std::path::Path;

use lithoframe_core::{Row, Table, Value};

use crate::error::IoError;

/// Read a delimited file into rows keyed by its header line. Cell types are
/// guessed per value: integer, then float, then string; empty cells are Null.
pub fn read_rows(path: &Path) -> Result<Vec<Row>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(path, &e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, &e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, &e))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.clone(), guess_value(cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Read a whole file into a `Table`, used for palette and translation tables.
pub fn read_table(path: &Path) -> Result<Table, IoError> {
    let mut table = Table::new();
    for row in read_rows(path)? {
        table.append(row);
    }
    Ok(table)
}

pub fn write_table(table: &Table, path: &Path) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_table_to(table, file).map_err(|e| csv_error(path, &e))
}

/// Export to any writer; `write_table` is the file-path convenience.
pub fn write_table_to<W: Write>(table: &Table, writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    write_records(table, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_records<W: Write>(table: &Table, writer: &mut csv::Writer<W>) -> Result<(), csv::Error> {
    writer.write_record(table.columns())?;
    for row in 0..table.row_count() {
        let record: Vec<String> = (0..table.columns().len())
            .map(|col| table.value(row, col).to_string())
            .collect();
        writer.write_record(&record)?;
    }
    Ok(())
}

fn csv_error(path: &Path, error: &dyn std::fmt::Display) -> IoError {
    IoError::Csv {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

/// Int first so counts stay integral; a trailing `.0` forces Float.
pub fn guess_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(v) = cell.parse::<f64>() {
        return Value::Float(v);
    }
    Value::Str(cell.to_string())
}
