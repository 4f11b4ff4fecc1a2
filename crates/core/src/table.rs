use std::collections::BTreeSet;

use crate::model::{Row, Value};

static NULL: Value = Value::Null;

/// Snapshot of a table's shape, used to roll back a single append.
#[derive(Debug, Clone, Copy)]
pub struct TableMark {
    columns: usize,
    rows: usize,
}

// ---------------------------------------------------------------------------
// Table - a growable row/column accumulator
// ---------------------------------------------------------------------------

/// Column order is first-seen: the first appended row establishes the
/// initial set, later rows may extend it at the end. Rows shorter than the
/// column list read as `Null` in the missing cells; stored rows are never
/// re-padded, so rolling back a column extension is a truncation.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table with a fixed header, for pre-parsed inputs such as
    /// palette and translation files.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive column lookup.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn value(&self, row: usize, col: usize) -> &Value {
        self.rows[row].get(col).unwrap_or(&NULL)
    }

    /// Append one row, matching names case-insensitively against existing
    /// columns and appending unseen names as new columns.
    pub fn append(&mut self, row: Row) {
        let mut cells = vec![Value::Null; self.columns.len()];
        for (name, value) in row {
            let idx = match self.find_column(&name) {
                Some(idx) => idx,
                None => {
                    self.columns.push(name);
                    cells.push(Value::Null);
                    self.columns.len() - 1
                }
            };
            cells[idx] = value;
        }
        self.rows.push(cells);
    }

    pub fn mark(&self) -> TableMark {
        TableMark {
            columns: self.columns.len(),
            rows: self.rows.len(),
        }
    }

    /// Undo appends made since `mark` was taken.
    pub fn rollback(&mut self, mark: TableMark) {
        self.rows.truncate(mark.rows);
        self.columns.truncate(mark.columns);
        for row in &mut self.rows {
            row.truncate(mark.columns);
        }
    }

    /// The sorted distinct values of one column across all rows.
    pub fn distinct(&self, col: usize) -> BTreeSet<Value> {
        (0..self.rows.len())
            .map(|r| self.value(r, col).clone())
            .collect()
    }

    /// Remove every row and column, returning the rows. The table is left
    /// fully empty so it no longer counts as active.
    pub fn drain(&mut self) -> (Vec<String>, Vec<Vec<Value>>) {
        (
            std::mem::take(&mut self.columns),
            std::mem::take(&mut self.rows),
        )
    }

    pub fn restore(&mut self, columns: Vec<String>, rows: Vec<Vec<Value>>) {
        self.columns = columns;
        self.rows = rows;
    }
}
