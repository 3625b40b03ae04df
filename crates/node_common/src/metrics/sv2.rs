//! SV2 template-provider status (optional section)
//!
//! Present only when the node's config enables the auxiliary mining
//! template protocol. Reachability is a plain TCP connect probe against
//! the configured port; everything else is config presence checks.

use std::time::Duration;

use serde::Serialize;
use tokio::net::TcpStream;
use tracing::debug;

use crate::node_config::Sv2Settings;

#[derive(Debug, Clone, Serialize)]
pub struct Sv2Status {
    pub enabled: bool,
    pub port: u16,
    pub bind_address: String,
    pub port_reachable: bool,
    pub token_configured: bool,
    pub peer_address_configured: bool,
}

/// Probe the template-provider port and fold in config presence flags.
pub async fn probe(settings: &Sv2Settings, timeout: Duration) -> Sv2Status {
    let host = connect_host(&settings.bind);
    let addr = format!("{}:{}", host, settings.port);

    let port_reachable = matches!(
        tokio::time::timeout(timeout, TcpStream::connect(&addr)).await,
        Ok(Ok(_))
    );
    debug!("sv2 port probe {} -> reachable={}", addr, port_reachable);

    Sv2Status {
        enabled: true,
        port: settings.port,
        bind_address: settings.bind.clone(),
        port_reachable,
        token_configured: settings.token.is_some(),
        peer_address_configured: settings.peer_address.is_some(),
    }
}

/// Wildcard binds are probed via loopback.
fn connect_host(bind: &str) -> &str {
    match bind {
        "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn settings(port: u16, bind: &str) -> Sv2Settings {
        Sv2Settings {
            port,
            bind: bind.to_string(),
            token: Some("tok".to_string()),
            peer_address: None,
        }
    }

    #[test]
    fn wildcard_binds_probe_loopback() {
        assert_eq!(connect_host("0.0.0.0"), "127.0.0.1");
        assert_eq!(connect_host("::"), "127.0.0.1");
        assert_eq!(connect_host("10.0.0.5"), "10.0.0.5");
    }

    #[tokio::test]
    async fn open_port_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let status = probe(&settings(port, "127.0.0.1"), Duration::from_secs(1)).await;
        assert!(status.port_reachable);
        assert!(status.token_configured);
        assert!(!status.peer_address_configured);
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        // Bind-then-drop to get a port that is very likely closed.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let status = probe(&settings(port, "127.0.0.1"), Duration::from_millis(500)).await;
        assert!(!status.port_reachable);
    }
}
