//! In-memory tabular records
//!
//! A [`Table`] is an ordered set of named columns over rows of
//! [`CellValue`] cells — the normalized form that report preprocessing,
//! upload, query flattening and CSV rendering all operate on.

pub mod csv;
pub mod excel;
mod value;

pub use value::CellValue;

use anyhow::{Result, bail};

/// Named columns over rows of cells. Rows always have exactly one cell per
/// column; short rows are padded with nulls on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (row, column name), if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Rename a column in place. Returns false when the column is absent.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Attach a new column on the right, padding missing values with nulls.
    pub fn add_column(&mut self, name: impl Into<String>, mut values: Vec<CellValue>) {
        values.resize(self.rows.len(), CellValue::Null);
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Project onto the given columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            match self.column_index(name) {
                Some(idx) => indices.push(idx),
                None => bail!("Table has no column named '{}'", name),
            }
        }
        let mut selected = Table::new(names.iter().map(|s| s.to_string()).collect());
        for row in &self.rows {
            selected
                .rows
                .push(indices.iter().map(|&i| row[i].clone()).collect());
        }
        Ok(selected)
    }

    /// First `n` rows, as a new table.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec!["a".to_string(), "b".to_string()]);
        table.push_row(vec![CellValue::Int(1), CellValue::String("x".to_string())]);
        table.push_row(vec![CellValue::Int(2)]);
        table
    }

    #[test]
    fn test_push_row_pads_short_rows() {
        let table = sample();
        assert_eq!(table.rows[1], vec![CellValue::Int(2), CellValue::Null]);
    }

    #[test]
    fn test_get_by_name() {
        let table = sample();
        assert_eq!(table.get(0, "b"), Some(&CellValue::String("x".to_string())));
        assert_eq!(table.get(0, "missing"), None);
        assert_eq!(table.get(9, "a"), None);
    }

    #[test]
    fn test_select_projects_and_orders() {
        let table = sample();
        let selected = table.select(&["b", "a"]).unwrap();
        assert_eq!(selected.columns, vec!["b", "a"]);
        assert_eq!(
            selected.rows[0],
            vec![CellValue::String("x".to_string()), CellValue::Int(1)]
        );
        assert!(table.select(&["nope"]).is_err());
    }

    #[test]
    fn test_add_column_pads() {
        let mut table = sample();
        table.add_column("c", vec![CellValue::Bool(true)]);
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.rows[0][2], CellValue::Bool(true));
        assert_eq!(table.rows[1][2], CellValue::Null);
    }

    #[test]
    fn test_rename_column() {
        let mut table = sample();
        assert!(table.rename_column("a", "z"));
        assert!(!table.rename_column("a", "z"));
        assert_eq!(table.column_index("z"), Some(0));
    }
}
