//! Upload command: workbook -> data source

use anyhow::Result;
use colored::*;

use super::print_preview;
use crate::api::{ApiError, upload_rows};
use crate::cli::UploadArgs;
use crate::config::SyncConfig;
use crate::table::excel;

pub fn handle(config: &SyncConfig, args: &UploadArgs) -> Result<()> {
    let table = excel::read_workbook(&args.input)?;
    let processed = args.report.preprocess(table)?;

    if args.preview > 0 {
        println!("{}", "Rows to upload:".bold());
        print_preview(&processed, args.preview)?;
        println!();
    }

    let data_source_id = config.data_source_id(args.report);
    let client = config.client()?;
    log::info!(
        "Uploading {} {} rows to data source {}",
        processed.len(),
        args.report,
        data_source_id
    );

    match upload_rows(&client, &processed, data_source_id, None) {
        Ok(ids) => {
            println!(
                "{}",
                format!("Uploaded {} of {} rows as new pages", ids.len(), processed.len()).green()
            );
            Ok(())
        }
        Err(ApiError::RateLimited { created }) => {
            // The pages created before the abort stay on the remote side;
            // a plain re-run would duplicate them.
            eprintln!(
                "{}",
                format!(
                    "Rate limited after {} created pages; re-running will duplicate those rows",
                    created.len()
                )
                .red()
            );
            for id in &created {
                eprintln!("  {id}");
            }
            Err(ApiError::RateLimited { created }.into())
        }
        Err(err) => Err(err.into()),
    }
}
