//! Mempool state from `getmempoolinfo`

use serde::{Deserialize, Serialize};

use crate::error::StatusError;
use crate::rpc::RpcVerb;

#[derive(Debug, Clone, Serialize)]
pub struct MempoolStatus {
    pub transaction_count: u64,
    pub size_bytes: u64,
}

#[derive(Debug, Deserialize)]
struct MempoolInfoPayload {
    /// Transaction count; the node calls this field `size`.
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    bytes: Option<u64>,
}

pub fn extract(raw: &str) -> Result<MempoolStatus, StatusError> {
    let payload: MempoolInfoPayload =
        serde_json::from_str(raw).map_err(|err| StatusError::MalformedResponse {
            verb: RpcVerb::MempoolState,
            detail: err.to_string(),
        })?;

    Ok(MempoolStatus {
        transaction_count: payload.size.unwrap_or(0),
        size_bytes: payload.bytes.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_count_and_bytes() {
        let pool = extract(r#"{"size":1234,"bytes":5678901}"#).unwrap();
        assert_eq!(pool.transaction_count, 1234);
        assert_eq!(pool.size_bytes, 5_678_901);
    }

    #[test]
    fn empty_payload_defaults_to_zero() {
        let pool = extract("{}").unwrap();
        assert_eq!(pool.transaction_count, 0);
        assert_eq!(pool.size_bytes, 0);
    }
}
