//! Config Locator - discovery of the node's own configuration
//!
//! Reads the node's `key=value` config file (bitcoin.conf style) for RPC
//! credentials and the optional SV2 template-provider section. Everything
//! here is tolerant: a missing file or missing keys degrade to
//! cookie/default auth with a warning, never an error.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::context::NodeContext;

/// Default SV2 template-provider port when `sv2port` is not set.
const DEFAULT_SV2_PORT: u16 = 8336;

/// Default SV2 bind address when `sv2bind` is not set.
const DEFAULT_SV2_BIND: &str = "127.0.0.1";

/// Name of the optional environment file carrying SV2 token/pool state,
/// looked up next to the node's config file.
const SV2_ENV_FILE: &str = "sv2.env";

/// Credentials and optional sections read from the node's config file.
/// Immutable snapshot; discarded at process exit.
#[derive(Debug, Clone, Serialize)]
pub struct NodeConfig {
    pub conf_path: PathBuf,
    pub rpc_user: Option<String>,
    pub rpc_password: Option<String>,
    /// Present only when the config enables the SV2 template provider.
    pub sv2: Option<Sv2Settings>,
}

impl NodeConfig {
    /// Both credential fields present.
    pub fn has_credentials(&self) -> bool {
        self.rpc_user.is_some() && self.rpc_password.is_some()
    }
}

/// Typed SV2 template-provider settings. Replaces the loose env-file
/// sourcing of the shell tooling with explicit presence checks.
#[derive(Debug, Clone, Serialize)]
pub struct Sv2Settings {
    pub port: u16,
    pub bind: String,
    pub token: Option<String>,
    pub peer_address: Option<String>,
}

/// Locate and read the node's config. Never fails: absence of the file or
/// of individual keys leaves the corresponding fields unset.
pub fn locate(ctx: &NodeContext) -> NodeConfig {
    let conf_path = ctx.conf_path.clone();

    let text = match fs::read_to_string(&conf_path) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                "config file {} not readable ({}); falling back to default RPC auth",
                conf_path.display(),
                err
            );
            return NodeConfig {
                conf_path,
                rpc_user: None,
                rpc_password: None,
                sv2: None,
            };
        }
    };

    let rpc_user = first_value(&text, "rpcuser");
    let rpc_password = first_value(&text, "rpcpassword");
    if rpc_user.is_none() || rpc_password.is_none() {
        warn!(
            "rpcuser/rpcpassword not found in {}; relying on cookie auth",
            conf_path.display()
        );
    }

    let sv2 = read_sv2_settings(&text, &conf_path);

    NodeConfig {
        conf_path,
        rpc_user,
        rpc_password,
        sv2,
    }
}

/// First `key=value` match wins; `#` comments and non-matching lines are
/// skipped. Keys in bitcoin.conf are not necessarily unique.
pub fn first_value(text: &str, key: &str) -> Option<String> {
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            if k.trim() == key {
                let v = v.trim();
                if !v.is_empty() {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}

fn read_sv2_settings(conf_text: &str, conf_path: &Path) -> Option<Sv2Settings> {
    let enabled = matches!(first_value(conf_text, "sv2").as_deref(), Some("1"));
    if !enabled {
        return None;
    }

    let port = first_value(conf_text, "sv2port")
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(DEFAULT_SV2_PORT);
    let bind = first_value(conf_text, "sv2bind").unwrap_or_else(|| DEFAULT_SV2_BIND.to_string());

    // Token and pool peer live in an optional sibling env file, read once
    // into typed fields.
    let (token, peer_address) = match conf_path.parent() {
        Some(dir) => read_sv2_env(&dir.join(SV2_ENV_FILE)),
        None => (None, None),
    };

    Some(Sv2Settings {
        port,
        bind,
        token,
        peer_address,
    })
}

fn read_sv2_env(path: &Path) -> (Option<String>, Option<String>) {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => {
            debug!("no SV2 env file at {}", path.display());
            return (None, None);
        }
    };
    let token = first_value(&text, "TOKEN");
    let peer = first_value(&text, "POOL_ADDRESS").or_else(|| first_value(&text, "PEER_ADDRESS"));
    (token, peer)
}

/// Transient minimal conf file holding RPC credentials for `-conf=` passing.
///
/// Owner-only permissions; removed on drop, so cleanup holds on every exit
/// path that unwinds. Never passed through the process environment.
#[derive(Debug)]
pub struct RpcCredentialsFile {
    file: NamedTempFile,
}

impl RpcCredentialsFile {
    /// Materialize a credentials file when the config carries credentials;
    /// `None` otherwise (cookie auth handled by the client itself).
    pub fn materialize(config: &NodeConfig) -> std::io::Result<Option<Self>> {
        let (user, password) = match (&config.rpc_user, &config.rpc_password) {
            (Some(u), Some(p)) => (u, p),
            _ => return Ok(None),
        };

        let mut file = tempfile::Builder::new()
            .prefix("nodectl-rpc-")
            .suffix(".conf")
            .tempfile()?;
        writeln!(file, "rpcuser={}", user)?;
        writeln!(file, "rpcpassword={}", password)?;
        file.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(file.path(), fs::Permissions::from_mode(0o600))?;
        }

        debug!("transient credentials file at {}", file.path().display());
        Ok(Some(Self { file }))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
