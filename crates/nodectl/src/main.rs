//! nodectl - status and health reporting for an installed full node

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nodectl::cli::{Cli, Commands};
use nodectl::commands;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Some(Commands::Status { json }) => commands::status::run(&cli, *json).await?,
        // No subcommand defaults to the status check.
        None => commands::status::run(&cli, false).await?,
    };

    std::process::exit(exit_code);
}
