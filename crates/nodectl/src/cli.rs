//! CLI - command-line argument parsing
//!
//! Argument parsing only; execution lives in `commands`. Every tunable of
//! the status check surfaces here so nothing is hard-coded: connection
//! threshold, readiness budget, RPC timeout, paths and names.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Node status and health reporting
#[derive(Parser)]
#[command(name = "nodectl")]
#[command(about = "Status and health reporting for an installed full node", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Path to the node's config file (default: platform-specific)
    #[arg(long, global = true)]
    pub conf: Option<PathBuf>,

    /// Node data directory (default: platform-specific)
    #[arg(long, global = true)]
    pub datadir: Option<PathBuf>,

    /// Node CLI client binary
    #[arg(long, global = true, default_value = "bitcoin-cli")]
    pub cli_bin: String,

    /// OS service name of the node daemon
    #[arg(long, global = true, default_value = "bitcoind")]
    pub service: String,

    /// Connections below this count are flagged "low"
    #[arg(long, global = true, default_value_t = 8)]
    pub min_connections: u64,

    /// Readiness probe attempts before giving up
    #[arg(long, global = true, default_value_t = 30)]
    pub readiness_attempts: u32,

    /// Seconds between readiness probes
    #[arg(long, global = true, default_value_t = 2)]
    pub readiness_interval_secs: u64,

    /// Hard timeout for any single RPC invocation, in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub rpc_timeout_secs: u64,

    /// Subcommand (defaults to `status`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full status check and print a health report
    Status {
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}
