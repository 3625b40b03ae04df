//! NodeContext - immutable run context
//!
//! One struct threaded through the whole call chain: platform, binary and
//! service names, paths, thresholds. Built once at startup from CLI flags
//! and platform defaults, never mutated afterwards.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Platform the check is running on. Detected at startup; tests may pick
/// any value explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
        }
    }

    /// Default data directory for a Bitcoin-style node on this platform.
    ///
    /// Linux keeps the dot-directory convention; macOS and Windows use the
    /// OS config base (`~/Library/Application Support`, `%APPDATA%`).
    pub fn default_datadir(&self) -> Option<PathBuf> {
        match self {
            Platform::Linux => dirs::home_dir().map(|h| h.join(".bitcoin")),
            Platform::MacOs | Platform::Windows => {
                dirs::config_dir().map(|c| c.join("Bitcoin"))
            }
        }
    }
}

/// Readiness wait budget. One configurable budget for every platform.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessBudget {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessBudget {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

/// Immutable context for one status-check run.
#[derive(Debug, Clone)]
pub struct NodeContext {
    pub platform: Platform,
    /// Command-line client binary, e.g. `bitcoin-cli`.
    pub cli_bin: String,
    /// Daemon binary name, used for installation checks only.
    pub daemon_bin: String,
    /// OS service name (systemd unit / launchd label / Windows service).
    pub service_name: String,
    pub datadir: PathBuf,
    pub conf_path: PathBuf,
    /// Below this many peer connections the report flags "low".
    pub min_connections: u64,
    pub readiness: ReadinessBudget,
    /// Hard cap on any single external CLI invocation.
    pub rpc_timeout: Duration,
}

impl NodeContext {
    /// Context for a stock Bitcoin-style node with platform defaults.
    /// Falls back to the current directory when no home directory can be
    /// resolved (the config locator degrades gracefully from there).
    pub fn bitcoin(platform: Platform) -> Self {
        let datadir = platform
            .default_datadir()
            .unwrap_or_else(|| PathBuf::from("."));
        let conf_path = datadir.join("bitcoin.conf");
        Self {
            platform,
            cli_bin: "bitcoin-cli".to_string(),
            daemon_bin: "bitcoind".to_string(),
            service_name: "bitcoind".to_string(),
            datadir,
            conf_path,
            min_connections: 8,
            readiness: ReadinessBudget::default(),
            rpc_timeout: Duration::from_secs(30),
        }
    }
}
