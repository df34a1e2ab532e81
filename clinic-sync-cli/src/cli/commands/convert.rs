//! Convert command: workbook -> CSV, no upload

use anyhow::Result;

use super::write_output;
use crate::cli::ConvertArgs;
use crate::table::excel;

pub fn handle(args: &ConvertArgs) -> Result<()> {
    let table = excel::read_workbook(&args.input)?;
    let processed = args.report.preprocess(table)?;
    write_output(&processed, args.output.as_deref())
}
