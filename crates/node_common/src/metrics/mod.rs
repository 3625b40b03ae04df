//! Metric Extractors - typed records from raw RPC payloads
//!
//! One extractor per RPC call. Structured serde decoding, never text
//! pattern matching; optional fields that are absent stay unset instead of
//! failing the extraction, except where a derived value strictly needs
//! them (then the derived value is undefined, never silently zero).

pub mod mempool;
pub mod network;
pub mod sv2;
pub mod sync;
pub mod uptime;

pub use mempool::MempoolStatus;
pub use network::NetworkStatus;
pub use sv2::Sv2Status;
pub use sync::SyncStatus;
pub use uptime::UptimeBreakdown;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Bytes to gibibytes for display. Callers round to 2 decimals at the
/// formatting edge; full precision is kept here.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}
