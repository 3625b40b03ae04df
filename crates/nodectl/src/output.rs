//! Human-readable rendering of the status report
//!
//! Pure string building over a finished `StatusReport`; all I/O stays in
//! the command layer. Section order is fixed so output is reproducible
//! within a run.

use node_common::metrics::uptime;
use node_common::report::{ConnectionAxis, StatusReport, SyncAxis};
use node_common::terminal_format as fmt;
use node_common::StatusError;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Render the whole report for terminal display.
pub fn render_report(report: &StatusReport) -> String {
    let mut out = String::new();
    let push = |out: &mut String, line: String| {
        out.push_str(&line);
        out.push('\n');
    };

    push(&mut out, fmt::bold("Node Status"));
    push(&mut out, "=".repeat(50));
    push(&mut out, String::new());

    // Chain
    push(&mut out, fmt::section_title("Chain"));
    match report.health.sync {
        SyncAxis::FullySynced => push(
            &mut out,
            format!(
                "  {}",
                fmt::success(&format!(
                    "fully synced (height {}, chain {})",
                    report.chain.blocks, report.chain.chain
                ))
            ),
        ),
        SyncAxis::Syncing { blocks_remaining } => push(
            &mut out,
            format!(
                "  {}",
                fmt::warning(&format!(
                    "syncing: {} blocks remaining (height {} of {})",
                    blocks_remaining, report.chain.blocks, report.chain.headers
                ))
            ),
        ),
        SyncAxis::Unknown => push(
            &mut out,
            format!(
                "  {}",
                fmt::warning("sync state unknown (verification progress not reported)")
            ),
        ),
    }
    match report.chain.progress_percent() {
        Some(percent) => push(
            &mut out,
            format!(
                "  {}",
                fmt::info(&format!("verification progress: {:.2}%", percent))
            ),
        ),
        None => push(
            &mut out,
            format!("  {}", fmt::info("verification progress: undefined")),
        ),
    }
    push(
        &mut out,
        format!(
            "  {}",
            fmt::info(&format!(
                "blockchain size: {:.2} GB{}",
                report.chain.size_on_disk_gb(),
                if report.chain.pruned { " (pruned)" } else { "" }
            ))
        ),
    );
    push(&mut out, String::new());

    // Network
    push(&mut out, fmt::section_title("Network"));
    let conn_line = format!(
        "{} connections (minimum {})",
        report.health.connection_count, report.health.min_connections
    );
    match report.health.connections {
        ConnectionAxis::Healthy => push(&mut out, format!("  {}", fmt::success(&conn_line))),
        ConnectionAxis::Low => push(
            &mut out,
            format!("  {}", fmt::warning(&format!("low: {}", conn_line))),
        ),
    }
    push(
        &mut out,
        format!(
            "  {}",
            fmt::info(&format!(
                "protocol {}, agent {}",
                report.network.protocol_version, report.network.user_agent
            ))
        ),
    );
    if !report.network.networks.is_empty() {
        push(
            &mut out,
            format!(
                "  {}",
                fmt::info(&format!("networks: {}", report.network.networks.join(", ")))
            ),
        );
    }
    push(&mut out, String::new());

    // Mempool
    push(&mut out, fmt::section_title("Mempool"));
    match &report.mempool {
        Some(pool) => push(
            &mut out,
            format!(
                "  {}",
                fmt::info(&format!(
                    "{} transactions, {:.2} MB",
                    pool.transaction_count,
                    pool.size_bytes as f64 / BYTES_PER_MB
                ))
            ),
        ),
        None => push(&mut out, format!("  {}", fmt::dimmed("unavailable"))),
    }
    push(&mut out, String::new());

    // Uptime
    push(&mut out, fmt::section_title("Uptime"));
    match report.uptime_seconds {
        Some(seconds) => {
            let up = uptime::breakdown(seconds);
            push(
                &mut out,
                format!(
                    "  {}",
                    fmt::info(&format!("{}d {}h {}m", up.days, up.hours, up.minutes))
                ),
            );
        }
        None => push(&mut out, format!("  {}", fmt::dimmed("unavailable"))),
    }
    push(&mut out, String::new());

    // SV2 (only when configured)
    if let Some(sv2) = &report.sv2 {
        push(&mut out, fmt::section_title("SV2 template provider"));
        let port_line = format!("port {} on {}", sv2.port, sv2.bind_address);
        if sv2.port_reachable {
            push(
                &mut out,
                format!("  {}", fmt::success(&format!("{} reachable", port_line))),
            );
        } else {
            push(
                &mut out,
                format!("  {}", fmt::warning(&format!("{} not reachable", port_line))),
            );
        }
        push(
            &mut out,
            format!(
                "  {}",
                fmt::info(&format!(
                    "token configured: {}, pool address configured: {}",
                    yes_no(sv2.token_configured),
                    yes_no(sv2.peer_address_configured)
                ))
            ),
        );
        push(&mut out, String::new());
    }

    // Host resources (best-effort; missing metrics are simply absent)
    push(&mut out, fmt::section_title("Host resources"));
    if let Some(disk) = &report.resources.disk {
        push(
            &mut out,
            format!(
                "  {}",
                fmt::info(&format!(
                    "disk {}: {:.1}% used, {:.2} GB free",
                    disk.mount_point,
                    disk.used_percent,
                    disk.available_gb()
                ))
            ),
        );
    }
    if let Some(memory) = &report.resources.memory {
        push(
            &mut out,
            format!(
                "  {}",
                fmt::info(&format!("memory: {:.1}% used", memory.used_percent))
            ),
        );
    }
    if let Some(load) = &report.resources.load {
        push(
            &mut out,
            format!(
                "  {}",
                fmt::info(&format!(
                    "load: {:.2} {:.2} {:.2} ({} cores)",
                    load.one, load.five, load.fifteen, load.cores
                ))
            ),
        );
    }
    if report.resources.disk.is_none()
        && report.resources.memory.is_none()
        && report.resources.load.is_none()
    {
        push(&mut out, format!("  {}", fmt::dimmed("unavailable")));
    }
    push(&mut out, String::new());

    // Service
    push(&mut out, fmt::section_title("Service"));
    push(
        &mut out,
        format!("  {}", fmt::info(&format!("state: {}", report.service.label()))),
    );
    push(&mut out, String::new());

    // Summary
    push(&mut out, fmt::section_title("Summary"));
    if report.health.all_clear() {
        push(
            &mut out,
            format!("  {}", fmt::success("fully synced and healthy")),
        );
    } else {
        if let SyncAxis::Syncing { blocks_remaining } = report.health.sync {
            push(
                &mut out,
                format!(
                    "  {}",
                    fmt::warning(&format!("still syncing ({} blocks behind)", blocks_remaining))
                ),
            );
        }
        if report.health.sync == SyncAxis::Unknown {
            push(&mut out, format!("  {}", fmt::warning("sync state unknown")));
        }
        if report.health.connections == ConnectionAxis::Low {
            push(
                &mut out,
                format!(
                    "  {}",
                    fmt::warning(&format!(
                        "low connection count ({} < {})",
                        report.health.connection_count, report.health.min_connections
                    ))
                ),
            );
        }
        if report.health.sv2_unreachable {
            push(
                &mut out,
                format!("  {}", fmt::warning("SV2 template port not reachable")),
            );
        }
    }

    out
}

/// Error line plus one actionable suggestion, for fatal failures.
pub fn render_error(err: &StatusError, cli_bin: &str) -> String {
    format!(
        "{}\n  {}\n",
        fmt::error(&format!("Error: {}", err)),
        fmt::dimmed(&format!("Suggestion: {}", err.suggestion(cli_bin)))
    )
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use node_common::metrics::{MempoolStatus, NetworkStatus, SyncStatus};
    use node_common::report::{self, HealthReport};
    use node_common::resources::ResourceSnapshot;
    use node_common::service::ServiceState;

    fn sample_report() -> StatusReport {
        let chain = SyncStatus {
            chain: "main".to_string(),
            blocks: 800_000,
            headers: 800_000,
            verification_progress: Some(1.0),
            size_on_disk_bytes: 500_000_000_000,
            pruned: false,
        };
        let network = NetworkStatus {
            protocol_version: 270_000,
            user_agent: "/Satoshi:27.0.0/".to_string(),
            connections: 12,
            networks: vec!["ipv4".to_string(), "ipv6".to_string()],
        };
        let health: HealthReport = report::synthesize(&chain, &network, None, 8);
        StatusReport {
            timestamp: Utc::now(),
            chain,
            network,
            mempool: Some(MempoolStatus {
                transaction_count: 421,
                size_bytes: 1_048_576,
            }),
            uptime_seconds: Some(90_061),
            sv2: None,
            resources: ResourceSnapshot {
                disk: None,
                memory: None,
                load: None,
            },
            service: ServiceState::Running,
            health,
        }
    }

    #[test]
    fn healthy_report_mentions_key_facts() {
        let text = render_report(&sample_report());
        assert!(text.contains("fully synced"));
        assert!(text.contains("main"));
        assert!(text.contains("465.66 GB"));
        assert!(text.contains("12 connections"));
        assert!(text.contains("1d 1h 1m"));
        assert!(text.contains("fully synced and healthy"));
    }

    #[test]
    fn degraded_sections_render_unavailable() {
        let mut report = sample_report();
        report.mempool = None;
        report.uptime_seconds = None;
        let text = render_report(&report);
        assert!(text.contains("unavailable"));
    }

    #[test]
    fn undefined_progress_is_not_zero() {
        let mut report = sample_report();
        report.chain.verification_progress = None;
        report.health = report::synthesize(&report.chain, &report.network, None, 8);
        let text = render_report(&report);
        assert!(text.contains("undefined"));
        assert!(!text.contains("0.00%"));
    }

    #[test]
    fn error_rendering_includes_suggestion() {
        let err = StatusError::CliNotFound("bitcoin-cli".to_string());
        let text = render_error(&err, "bitcoin-cli");
        assert!(text.contains("Error:"));
        assert!(text.contains("Suggestion:"));
        assert!(text.contains("bitcoin-cli"));
    }
}
