//! `nodectl status` - the full status check
//!
//! Wires CLI flags into the immutable run context, locates the node's
//! config, materializes transient credentials, runs the linear collect
//! flow and renders the result. Exit code 0 whenever a report was
//! produced (warnings included); 1 on any fatal failure.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, warn};

use node_common::context::ReadinessBudget;
use node_common::{node_config, status, CliNodeRpc, NodeContext, Platform, RpcCredentialsFile};

use crate::cli::Cli;
use crate::output;

/// Build the run context from CLI flags over platform defaults.
pub fn build_context(cli: &Cli) -> NodeContext {
    let mut ctx = NodeContext::bitcoin(Platform::current());

    ctx.cli_bin = cli.cli_bin.clone();
    ctx.service_name = cli.service.clone();
    ctx.min_connections = cli.min_connections;
    ctx.readiness = ReadinessBudget {
        max_attempts: cli.readiness_attempts,
        interval: Duration::from_secs(cli.readiness_interval_secs),
    };
    ctx.rpc_timeout = Duration::from_secs(cli.rpc_timeout_secs);

    if let Some(datadir) = &cli.datadir {
        ctx.datadir = datadir.clone();
        ctx.conf_path = datadir.join("bitcoin.conf");
    }
    if let Some(conf) = &cli.conf {
        ctx.conf_path = conf.clone();
    }

    ctx
}

/// Execute the status check; returns the process exit code.
pub async fn run(cli: &Cli, json: bool) -> Result<i32> {
    let ctx = build_context(cli);
    debug!(
        "status check on {} (conf {})",
        ctx.platform.label(),
        ctx.conf_path.display()
    );

    let config = node_config::locate(&ctx);

    // Held for the whole run; dropped (and deleted) on every exit path.
    let credentials = match RpcCredentialsFile::materialize(&config) {
        Ok(credentials) => credentials,
        Err(err) => {
            warn!("could not write credentials file ({}); using default auth", err);
            None
        }
    };

    let rpc = CliNodeRpc::new(&ctx, credentials.as_ref());

    // Ctrl-C flips the cancel signal; the flow aborts promptly and the
    // run exits non-zero with a distinct cancelled error.
    let (cancel_tx, mut cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    match status::collect(&rpc, &config, &ctx, &mut cancel_rx).await {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", output::render_report(&report));
            }
            Ok(0)
        }
        Err(err) => {
            eprint!("{}", output::render_error(&err, &ctx.cli_bin));
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn flags_flow_into_context() {
        let cli = Cli::try_parse_from([
            "nodectl",
            "--cli-bin",
            "knots-cli",
            "--service",
            "knotsd",
            "--min-connections",
            "12",
            "--readiness-attempts",
            "5",
            "--readiness-interval-secs",
            "1",
            "--datadir",
            "/srv/node",
        ])
        .unwrap();

        let ctx = build_context(&cli);
        assert_eq!(ctx.cli_bin, "knots-cli");
        assert_eq!(ctx.service_name, "knotsd");
        assert_eq!(ctx.min_connections, 12);
        assert_eq!(ctx.readiness.max_attempts, 5);
        assert_eq!(ctx.readiness.interval, Duration::from_secs(1));
        assert_eq!(ctx.datadir.to_str().unwrap(), "/srv/node");
        assert!(ctx.conf_path.ends_with("bitcoin.conf"));
    }

    #[test]
    fn explicit_conf_beats_datadir_default() {
        let cli = Cli::try_parse_from([
            "nodectl",
            "--datadir",
            "/srv/node",
            "--conf",
            "/etc/bitcoin/bitcoin.conf",
        ])
        .unwrap();
        let ctx = build_context(&cli);
        assert_eq!(ctx.conf_path.to_str().unwrap(), "/etc/bitcoin/bitcoin.conf");
        assert_eq!(ctx.datadir.to_str().unwrap(), "/srv/node");
    }
}
