//! Cross-referencing between two decoded datasets

use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use anyhow::{Context, Result};

use crate::table::{CellValue, Table};

/// Attach to each primary row the id of the chronologically-latest
/// secondary row sharing its join key, as a new column.
///
/// `predicate` pre-filters the secondary rows (e.g. keep only settled
/// billing rows). Primary rows with no surviving match get a null in the
/// new column. When several secondary rows tie on `time_column`, which one
/// wins is unspecified.
pub fn attach_latest_match<F>(
    primary: &mut Table,
    secondary: &Table,
    join_key: &str,
    time_column: &str,
    id_column: &str,
    new_column: &str,
    predicate: F,
) -> Result<()>
where
    F: Fn(&Table, usize) -> bool,
{
    let secondary_key = require_column(secondary, join_key)?;
    let secondary_time = require_column(secondary, time_column)?;
    let secondary_id = require_column(secondary, id_column)?;
    let primary_key = require_column(primary, join_key)?;

    // join key -> (time, id) of the latest row seen so far
    let mut latest: HashMap<String, (CellValue, CellValue)> = HashMap::new();
    for (idx, row) in secondary.rows.iter().enumerate() {
        if !predicate(secondary, idx) {
            continue;
        }
        let key = &row[secondary_key];
        if key.is_null() {
            continue;
        }
        let time = &row[secondary_time];
        match latest.entry(key.to_string()) {
            Entry::Occupied(mut entry) => {
                if compare_cells(time, &entry.get().0) == Ordering::Greater {
                    entry.insert((time.clone(), row[secondary_id].clone()));
                }
            }
            Entry::Vacant(entry) => {
                entry.insert((time.clone(), row[secondary_id].clone()));
            }
        }
    }

    let joined: Vec<CellValue> = primary
        .rows
        .iter()
        .map(|row| {
            let key = &row[primary_key];
            if key.is_null() {
                return CellValue::Null;
            }
            match latest.get(&key.to_string()) {
                Some((_, id)) => id.clone(),
                None => CellValue::Null,
            }
        })
        .collect();

    let matched = joined.iter().filter(|cell| !cell.is_null()).count();
    log::info!(
        "Cross-reference on '{}': matched {} of {} rows",
        join_key,
        matched,
        primary.len()
    );
    primary.add_column(new_column, joined);
    Ok(())
}

/// Order two cells for latest-match selection: numerically when both
/// sides coerce, lexically on the rendered form otherwise (ISO timestamps
/// order correctly that way).
fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    a.to_string().cmp(&b.to_string())
}

fn require_column(table: &Table, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .with_context(|| format!("Table has no column named '{}'", name))
}
