//! Per-command handlers

pub mod convert;
pub mod link;
pub mod pull;
pub mod upload;

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::table::Table;
use crate::table::csv::{to_csv_bytes, write_csv_file};

/// Write a table as CSV to a path, or to stdout when no path is given.
pub(crate) fn write_output(table: &Table, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => write_csv_file(table, path),
        None => {
            let bytes = to_csv_bytes(table)?;
            std::io::stdout()
                .write_all(&bytes)
                .context("Failed to write CSV to stdout")
        }
    }
}

/// Read an opaque JSON payload (filter or sort spec) from a file.
pub(crate) fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}

/// Print the first rows of a table to the terminal.
pub(crate) fn print_preview(table: &Table, limit: usize) -> Result<()> {
    let bytes = to_csv_bytes(&table.head(limit))?;
    print!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
