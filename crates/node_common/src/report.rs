//! Report Synthesizer - pure pass/warn classification
//!
//! Synthesis is a pure function over the extracted metrics; no I/O here.
//! The sync axis and the connection axis are independent: a run can carry
//! both a sync warning and a connection warning.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::metrics::{MempoolStatus, NetworkStatus, Sv2Status, SyncStatus};
use crate::resources::ResourceSnapshot;
use crate::service::ServiceState;

/// Sync axis of the health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum SyncAxis {
    FullySynced,
    Syncing { blocks_remaining: u64 },
    /// Verification progress was not reported; completeness is undefined.
    Unknown,
}

/// Connection axis of the health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionAxis {
    Healthy,
    Low,
}

/// Synthesized health view; exists only for the duration of printing.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub sync: SyncAxis,
    pub connections: ConnectionAxis,
    pub connection_count: u64,
    pub min_connections: u64,
    /// Warning when SV2 is enabled but the template port did not answer.
    pub sv2_unreachable: bool,
}

impl HealthReport {
    /// No warnings on any axis.
    pub fn all_clear(&self) -> bool {
        self.sync == SyncAxis::FullySynced
            && self.connections == ConnectionAxis::Healthy
            && !self.sv2_unreachable
    }
}

/// Pure synthesis from the extracted metrics.
pub fn synthesize(
    sync: &SyncStatus,
    network: &NetworkStatus,
    sv2: Option<&Sv2Status>,
    min_connections: u64,
) -> HealthReport {
    let sync_axis = match sync.is_fully_synced() {
        Some(true) => SyncAxis::FullySynced,
        Some(false) => SyncAxis::Syncing {
            blocks_remaining: sync.blocks_remaining(),
        },
        None => SyncAxis::Unknown,
    };

    let connection_axis = if network.connections_healthy(min_connections) {
        ConnectionAxis::Healthy
    } else {
        ConnectionAxis::Low
    };

    HealthReport {
        sync: sync_axis,
        connections: connection_axis,
        connection_count: network.connections,
        min_connections,
        sv2_unreachable: sv2.map(|s| s.enabled && !s.port_reachable).unwrap_or(false),
    }
}

/// Everything one run produced, ready for human or JSON rendering.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub timestamp: DateTime<Utc>,
    pub chain: SyncStatus,
    pub network: NetworkStatus,
    /// Degradable sections: `None` means "unavailable this run".
    pub mempool: Option<MempoolStatus>,
    pub uptime_seconds: Option<u64>,
    pub sv2: Option<Sv2Status>,
    pub resources: ResourceSnapshot,
    pub service: ServiceState,
    pub health: HealthReport,
}
