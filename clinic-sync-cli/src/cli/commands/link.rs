//! Link command: cross-reference reservations with billing pages

use anyhow::{Result, bail};

use super::{read_json, write_output};
use crate::api::{pages_to_table, query_pages};
use crate::cli::LinkArgs;
use crate::config::SyncConfig;
use crate::services::attach_latest_match;
use crate::table::Table;

pub fn handle(config: &SyncConfig, args: &LinkArgs) -> Result<()> {
    let reservation_filter = read_json(&args.reservation_filter)?;
    let billing_filter = read_json(&args.billing_filter)?;
    let client = config.client()?;

    let mut reservations = pages_to_table(&query_pages(
        &client,
        &config.datasets.reservation,
        &reservation_filter,
        None,
        config.api.page_size,
    )?);
    let billing = pages_to_table(&query_pages(
        &client,
        &config.datasets.billing,
        &billing_filter,
        None,
        config.api.page_size,
    )?);

    let where_clause = match &args.filter_where {
        Some(raw) => Some(parse_where(raw)?),
        None => None,
    };
    let predicate = |table: &Table, row: usize| match &where_clause {
        Some((column, value)) => table
            .get(row, column)
            .map(|cell| cell.to_string() == *value)
            .unwrap_or(false),
        None => true,
    };

    attach_latest_match(
        &mut reservations,
        &billing,
        &args.key,
        &args.time_column,
        &args.id_column,
        &args.into,
        predicate,
    )?;
    write_output(&reservations, args.output.as_deref())
}

fn parse_where(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.trim().to_string()))
        }
        _ => bail!("Invalid --where clause '{}': expected column=value", raw),
    }
}
