//! Chain sync state from `getblockchaininfo`

use serde::{Deserialize, Serialize};

use crate::error::StatusError;
use crate::rpc::RpcVerb;

/// Strictly-near-1.0 threshold for "fully synced"; exact equality would be
/// defeated by floating-point residue in the node's own progress figure.
pub const SYNC_PROGRESS_THRESHOLD: f64 = 0.9999;

/// Snapshot of the node's chain sync state. Replaced wholesale on each
/// run, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub chain: String,
    pub blocks: u64,
    pub headers: u64,
    /// Absent when the node did not report it; every derived sync figure
    /// is then undefined rather than zero.
    pub verification_progress: Option<f64>,
    pub size_on_disk_bytes: u64,
    pub pruned: bool,
}

#[derive(Debug, Deserialize)]
struct ChainInfoPayload {
    #[serde(default)]
    chain: Option<String>,
    #[serde(default)]
    blocks: Option<u64>,
    #[serde(default)]
    headers: Option<u64>,
    #[serde(rename = "verificationprogress")]
    verification_progress: Option<f64>,
    #[serde(rename = "size_on_disk", default)]
    size_on_disk: Option<u64>,
    #[serde(default)]
    pruned: Option<bool>,
}

/// Decode the `getblockchaininfo` payload. Individual absent fields are
/// tolerated; a payload that is not JSON at all is a hard failure.
pub fn extract(raw: &str) -> Result<SyncStatus, StatusError> {
    let payload: ChainInfoPayload =
        serde_json::from_str(raw).map_err(|err| StatusError::MalformedResponse {
            verb: RpcVerb::ChainState,
            detail: err.to_string(),
        })?;

    Ok(SyncStatus {
        chain: payload.chain.unwrap_or_else(|| "unknown".to_string()),
        blocks: payload.blocks.unwrap_or(0),
        headers: payload.headers.unwrap_or(0),
        verification_progress: payload.verification_progress,
        size_on_disk_bytes: payload.size_on_disk.unwrap_or(0),
        pruned: payload.pruned.unwrap_or(false),
    })
}

impl SyncStatus {
    /// `Some(true)` iff heights match and verification progress clears the
    /// strict threshold. `None` when progress was not reported - sync
    /// completeness is then undefined.
    pub fn is_fully_synced(&self) -> Option<bool> {
        let progress = self.verification_progress?;
        Some(self.blocks == self.headers && progress > SYNC_PROGRESS_THRESHOLD)
    }

    pub fn blocks_remaining(&self) -> u64 {
        self.headers.saturating_sub(self.blocks)
    }

    /// Verification progress as a percentage, when reported.
    pub fn progress_percent(&self) -> Option<f64> {
        self.verification_progress.map(|p| p * 100.0)
    }

    pub fn size_on_disk_gb(&self) -> f64 {
        super::bytes_to_gb(self.size_on_disk_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_extracts() {
        let raw = r#"{"chain":"main","blocks":800000,"headers":800000,
            "verificationprogress":1.0,"size_on_disk":500000000000,"pruned":false}"#;
        let sync = extract(raw).unwrap();
        assert_eq!(sync.chain, "main");
        assert_eq!(sync.blocks, 800_000);
        assert_eq!(sync.is_fully_synced(), Some(true));
        assert!((sync.size_on_disk_gb() - 465.661).abs() < 0.001);
        assert!(!sync.pruned);
    }

    #[test]
    fn threshold_boundary_is_exclusive() {
        let mut sync = SyncStatus {
            chain: "main".to_string(),
            blocks: 800_000,
            headers: 800_000,
            verification_progress: Some(0.9999),
            size_on_disk_bytes: 0,
            pruned: false,
        };
        // Exactly at the threshold: not synced.
        assert_eq!(sync.is_fully_synced(), Some(false));
        // Just above: synced.
        sync.verification_progress = Some(0.999901);
        assert_eq!(sync.is_fully_synced(), Some(true));
    }

    #[test]
    fn height_gap_blocks_sync() {
        let sync = SyncStatus {
            chain: "main".to_string(),
            blocks: 799_990,
            headers: 800_000,
            verification_progress: Some(0.99999),
            size_on_disk_bytes: 0,
            pruned: false,
        };
        assert_eq!(sync.is_fully_synced(), Some(false));
        assert_eq!(sync.blocks_remaining(), 10);
    }

    #[test]
    fn missing_progress_is_undefined_not_zero() {
        let raw = r#"{"chain":"main","blocks":100,"headers":100}"#;
        let sync = extract(raw).unwrap();
        assert_eq!(sync.verification_progress, None);
        assert_eq!(sync.is_fully_synced(), None);
        assert_eq!(sync.progress_percent(), None);
    }

    #[test]
    fn non_json_is_a_hard_failure() {
        assert!(matches!(
            extract("not json at all"),
            Err(StatusError::MalformedResponse { .. })
        ));
    }
}
