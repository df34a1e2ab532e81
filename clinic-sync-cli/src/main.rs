//! clinic-sync entry point

mod api;
mod cli;
mod config;
mod reports;
mod services;
mod table;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};
use config::SyncConfig;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match &cli.command {
        // Convert is purely local and works without a config file
        Command::Convert(args) => cli::commands::convert::handle(args),
        Command::Upload(args) => {
            let config = SyncConfig::load(cli.config.as_deref())?;
            cli::commands::upload::handle(&config, args)
        }
        Command::Pull(args) => {
            let config = SyncConfig::load(cli.config.as_deref())?;
            cli::commands::pull::handle(&config, args)
        }
        Command::Link(args) => {
            let config = SyncConfig::load(cli.config.as_deref())?;
            cli::commands::link::handle(&config, args)
        }
    }
}
