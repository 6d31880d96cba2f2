//! Command-line host for the OVH `client_request` data source.

mod commands;

use clap::Parser;
use ovh_client_request::cli_args::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let Cli { global, command } = Cli::parse();
    match command {
        Commands::Request(args) => commands::run_request(args, &global).await,
        Commands::Schema(args) => commands::run_schema(args),
    }
}
