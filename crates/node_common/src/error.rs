//! Error taxonomy for the status check
//!
//! Fatal conditions only. Degradable conditions (missing config file,
//! unavailable optional metric) never surface here - they become warnings
//! or omitted report sections instead.

use thiserror::Error;

use crate::rpc::RpcVerb;

/// Fatal status-check failures. Each carries enough context to print one
/// clearly marked error line plus one actionable suggestion.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The node's command-line client is not installed or not in PATH.
    #[error("node client '{0}' not found in PATH")]
    CliNotFound(String),

    /// The node never answered a basic RPC query within the budget.
    #[error("node RPC did not become ready after {attempts} attempts ({interval_secs}s apart)")]
    ReadinessTimeout { attempts: u32, interval_secs: u64 },

    /// A required RPC call failed after readiness was established.
    #[error("RPC call '{verb}' failed: {detail}")]
    RpcFailed { verb: RpcVerb, detail: String },

    /// A required RPC payload could not be decoded.
    #[error("malformed '{verb}' response: {detail}")]
    MalformedResponse { verb: RpcVerb, detail: String },

    /// The run was cancelled from the outside (Ctrl-C).
    #[error("status check cancelled")]
    Cancelled,
}

impl StatusError {
    /// One actionable suggestion for the user, printed under the error line.
    pub fn suggestion(&self, cli_bin: &str) -> String {
        match self {
            StatusError::CliNotFound(_) => format!(
                "Install the node software or add '{}' to your PATH",
                cli_bin
            ),
            StatusError::ReadinessTimeout { .. } => format!(
                "Check the node is running, then try manually: {} getblockchaininfo",
                cli_bin
            ),
            StatusError::RpcFailed { verb, .. } | StatusError::MalformedResponse { verb, .. } => {
                format!("Try manually: {} {}", cli_bin, verb.cli_args().join(" "))
            }
            StatusError::Cancelled => "Re-run the status check when ready".to_string(),
        }
    }
}
