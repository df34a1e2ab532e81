//! Command-line interface definitions

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::reports::ReportKind;

#[derive(Debug, Parser)]
#[command(
    name = "clinic-sync",
    about = "Sync clinic report exports into Notion data sources",
    version
)]
pub struct Cli {
    /// Config file path (defaults to <config dir>/clinic-sync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a report workbook to CSV without uploading
    Convert(ConvertArgs),
    /// Upload a report workbook into its data source
    Upload(UploadArgs),
    /// Query a data source and render the result as CSV
    Pull(PullArgs),
    /// Attach the latest billing page id to each reservation row
    Link(LinkArgs),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Which report the workbook contains
    #[arg(value_enum)]
    pub report: ReportKind,
    /// Path to the .xls/.xlsx export
    pub input: PathBuf,
    /// Output CSV path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Which report the workbook contains
    #[arg(value_enum)]
    pub report: ReportKind,
    /// Path to the .xls/.xlsx export
    pub input: PathBuf,
    /// Rows shown in the pre-upload preview
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

#[derive(Debug, Args)]
pub struct PullArgs {
    /// Which dataset to query
    #[arg(value_enum)]
    pub report: ReportKind,
    /// JSON file holding the query filter (passed through verbatim)
    #[arg(long)]
    pub filter: PathBuf,
    /// JSON file holding the sort specification
    #[arg(long)]
    pub sorts: Option<PathBuf>,
    /// Output CSV path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct LinkArgs {
    /// JSON file with the reservation query filter
    #[arg(long)]
    pub reservation_filter: PathBuf,
    /// JSON file with the billing query filter
    #[arg(long)]
    pub billing_filter: PathBuf,
    /// Keep only billing rows whose column renders to the given value
    /// (format: column=value)
    #[arg(long = "where", value_name = "COLUMN=VALUE")]
    pub filter_where: Option<String>,
    /// Join column present in both datasets
    #[arg(long, default_value = crate::reports::CHART_NO)]
    pub key: String,
    /// Billing column giving chronological order
    #[arg(long, default_value = "정산일")]
    pub time_column: String,
    /// Billing column attached to matching reservation rows
    #[arg(long, default_value = "page_id")]
    pub id_column: String,
    /// Name of the new column on the reservation table
    #[arg(long, default_value = "billing_page_id")]
    pub into: String,
    /// Output CSV path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
