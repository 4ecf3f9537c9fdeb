//! Flattening a result set into a rectangular table.

use std::collections::HashSet;

use serde_json::Value;

use super::Row;

/// A result set laid out for display.
///
/// Columns are the union of every row's keys, in order of first appearance,
/// so rows with differing key sets still line up. A row lacking a column gets
/// an empty cell.
///
/// # Examples
///
/// ```
/// use query_console::query::{QueryResponse, ResultTable};
///
/// let reply: QueryResponse =
///     serde_json::from_str(r#"[{"id":1,"name":"A"},{"id":2,"genre":"jazz"}]"#).unwrap();
/// let QueryResponse::Rows(rows) = reply else { unreachable!() };
///
/// let table = ResultTable::from_rows(&rows);
/// assert_eq!(table.columns(), ["id", "name", "genre"]);
/// assert_eq!(table.rows()[1], ["2", "", "jazz"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for key in rows.iter().flat_map(|row| row.keys()) {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }

        let rows = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| row.get(column).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cell text, row-major; every row has `columns().len()` cells.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Display text of one cell. Nested values fall back to compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_owned(),
        other => other.to_string(),
    }
}
