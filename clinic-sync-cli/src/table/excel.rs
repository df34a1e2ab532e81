//! Reading clinic report workbooks
//!
//! The clinic management system exports reports as `.xls` or `.xlsx` with
//! a single data sheet: first row is the header, everything below is data
//! (including a trailing summary row that preprocessing drops).

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

use super::{CellValue, Table};

/// Read the first worksheet of a workbook into a table, using the first
/// row as column names.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        bail!("Workbook has no sheets: {}", path.display());
    };
    let range = workbook
        .worksheet_range(sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        bail!("Sheet '{}' is empty", sheet_name);
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| match cell {
            Data::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .collect();

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_to_value).collect());
    }
    log::debug!(
        "Read {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

/// Convert one worksheet cell to a cell value. Whole floats collapse to
/// integers (chart numbers arrive as floats from Excel).
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                CellValue::Int(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            // Date cells carry a midnight time component in Excel
            Some(naive) if naive.time() == chrono::NaiveTime::MIN => CellValue::Date(naive.date()),
            Some(naive) => CellValue::String(naive.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Null,
        },
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}
