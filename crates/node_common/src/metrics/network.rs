//! Network and peer state from `getnetworkinfo`

use serde::{Deserialize, Serialize};

use crate::error::StatusError;
use crate::rpc::RpcVerb;

/// Snapshot of the node's network-facing state.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkStatus {
    pub protocol_version: i64,
    pub user_agent: String,
    pub connections: u64,
    /// Reachable network names, in the node's own order (ipv4, ipv6,
    /// onion, ...).
    pub networks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NetworkInfoPayload {
    #[serde(default)]
    version: Option<i64>,
    #[serde(default)]
    subversion: Option<String>,
    #[serde(default)]
    connections: Option<u64>,
    #[serde(default)]
    networks: Vec<NetworkEntry>,
}

#[derive(Debug, Deserialize)]
struct NetworkEntry {
    #[serde(default)]
    name: Option<String>,
}

pub fn extract(raw: &str) -> Result<NetworkStatus, StatusError> {
    let payload: NetworkInfoPayload =
        serde_json::from_str(raw).map_err(|err| StatusError::MalformedResponse {
            verb: RpcVerb::NetworkState,
            detail: err.to_string(),
        })?;

    Ok(NetworkStatus {
        protocol_version: payload.version.unwrap_or(0),
        user_agent: payload.subversion.unwrap_or_default(),
        connections: payload.connections.unwrap_or(0),
        networks: payload
            .networks
            .into_iter()
            .filter_map(|n| n.name)
            .collect(),
    })
}

impl NetworkStatus {
    /// Healthy iff at or above the threshold (boundary inclusive).
    pub fn connections_healthy(&self, min_connections: u64) -> bool {
        self.connections >= min_connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_extracts() {
        let raw = r#"{"version":270000,"subversion":"/Satoshi:27.0.0/","connections":12,
            "networks":[{"name":"ipv4"},{"name":"ipv6"}]}"#;
        let net = extract(raw).unwrap();
        assert_eq!(net.protocol_version, 270_000);
        assert_eq!(net.user_agent, "/Satoshi:27.0.0/");
        assert_eq!(net.connections, 12);
        assert_eq!(net.networks, vec!["ipv4", "ipv6"]);
    }

    #[test]
    fn connection_threshold_boundary() {
        let mut net = extract(r#"{"connections":7}"#).unwrap();
        assert!(!net.connections_healthy(8));
        net.connections = 8;
        assert!(net.connections_healthy(8));
    }

    #[test]
    fn missing_fields_default() {
        let net = extract("{}").unwrap();
        assert_eq!(net.connections, 0);
        assert!(net.networks.is_empty());
        assert_eq!(net.user_agent, "");
    }
}
