//! CSV rendering of tabular records

use anyhow::{Context, Result};
use csv::Writer;
use std::io;
use std::path::Path;

use super::Table;

/// Render a table as CSV bytes: header row, one record per row, no index
/// column, UTF-8.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut wtr = Writer::from_writer(&mut buffer);
        write_table(&mut wtr, table)?;
        wtr.flush().context("Failed to flush CSV writer")?;
    }
    Ok(buffer)
}

/// Write a table as CSV to the given path.
pub fn write_csv_file(table: &Table, path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_table(&mut wtr, table)?;
    wtr.flush().context("Failed to flush CSV writer")?;
    log::info!("CSV file exported to: {}", path.display());
    Ok(())
}

fn write_table<W: io::Write>(wtr: &mut Writer<W>, table: &Table) -> Result<()> {
    wtr.write_record(&table.columns)
        .context("Failed to write CSV header")?;
    for (idx, row) in table.rows.iter().enumerate() {
        wtr.write_record(row.iter().map(|cell| cell.to_string()))
            .with_context(|| format!("Failed to write CSV row {}", idx))?;
    }
    Ok(())
}
