//! Pull command: query a data source into CSV

use anyhow::Result;

use super::{read_json, write_output};
use crate::api::{pages_to_table, query_pages};
use crate::cli::PullArgs;
use crate::config::SyncConfig;

pub fn handle(config: &SyncConfig, args: &PullArgs) -> Result<()> {
    let filter = read_json(&args.filter)?;
    let sorts = match &args.sorts {
        Some(path) => Some(read_json(path)?),
        None => None,
    };

    let client = config.client()?;
    let pages = query_pages(
        &client,
        config.data_source_id(args.report),
        &filter,
        sorts.as_ref(),
        config.api.page_size,
    )?;
    log::info!("Query returned {} pages", pages.len());

    let table = pages_to_table(&pages);
    write_output(&table, args.output.as_deref())
}
