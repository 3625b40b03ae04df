//! Node uptime from the `uptime` RPC
//!
//! The CLI prints a bare integer (seconds). Decomposition to
//! days/hours/minutes is a pure function; the seconds remainder is
//! deliberately dropped from display.

use serde::Serialize;

use crate::error::StatusError;
use crate::rpc::RpcVerb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UptimeBreakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

pub fn extract(raw: &str) -> Result<u64, StatusError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|err| StatusError::MalformedResponse {
            verb: RpcVerb::Uptime,
            detail: format!("expected integer seconds: {}", err),
        })
}

pub fn breakdown(seconds: u64) -> UptimeBreakdown {
    UptimeBreakdown {
        days: seconds / 86_400,
        hours: (seconds % 86_400) / 3_600,
        minutes: (seconds % 3_600) / 60,
    }
}
