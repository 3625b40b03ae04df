//! OS service manager query
//!
//! One question per platform: is the node's service running? Observational
//! only; a service manager we cannot talk to yields Unknown, never an
//! error.

use std::process::Command;

use serde::Serialize;
use tracing::debug;

use crate::context::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Running,
    Stopped,
    Absent,
    Unknown,
}

impl ServiceState {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceState::Running => "running",
            ServiceState::Stopped => "stopped",
            ServiceState::Absent => "not installed",
            ServiceState::Unknown => "unknown",
        }
    }
}

/// Ask the platform's service manager about the named service.
pub fn query(platform: Platform, service_name: &str) -> ServiceState {
    let state = match platform {
        Platform::Linux => query_systemd(service_name),
        Platform::MacOs => query_launchd(service_name),
        Platform::Windows => query_sc(service_name),
    };
    debug!("service '{}' is {}", service_name, state.label());
    state
}

fn query_systemd(name: &str) -> ServiceState {
    let output = match Command::new("systemctl").args(["is-active", name]).output() {
        Ok(output) => output,
        Err(_) => return ServiceState::Unknown,
    };
    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.trim() {
        "active" | "activating" => ServiceState::Running,
        "inactive" | "failed" | "deactivating" => {
            // is-active says "inactive" for unknown units too; a unit file
            // check tells the two apart.
            let known = Command::new("systemctl")
                .args(["cat", name])
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false);
            if known {
                ServiceState::Stopped
            } else {
                ServiceState::Absent
            }
        }
        _ => ServiceState::Unknown,
    }
}

fn query_launchd(name: &str) -> ServiceState {
    let output = match Command::new("launchctl").args(["list", name]).output() {
        Ok(output) => output,
        Err(_) => return ServiceState::Unknown,
    };
    if output.status.success() {
        return ServiceState::Running;
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("Could not find") {
        ServiceState::Absent
    } else {
        ServiceState::Stopped
    }
}

fn query_sc(name: &str) -> ServiceState {
    let output = match Command::new("sc").args(["query", name]).output() {
        Ok(output) => output,
        Err(_) => return ServiceState::Unknown,
    };
    let stdout = String::from_utf8_lossy(&output.stdout);
    if stdout.contains("RUNNING") {
        ServiceState::Running
    } else if stdout.contains("STOPPED") {
        ServiceState::Stopped
    } else if stdout.contains("1060") || stdout.contains("does not exist") {
        ServiceState::Absent
    } else {
        ServiceState::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(ServiceState::Running.label(), "running");
        assert_eq!(ServiceState::Absent.label(), "not installed");
    }

    #[test]
    fn query_is_best_effort() {
        // Whatever the host looks like, the query must return, not panic.
        let state = query(Platform::current(), "nodectl-test-no-such-service");
        assert!(matches!(
            state,
            ServiceState::Running | ServiceState::Stopped | ServiceState::Absent | ServiceState::Unknown
        ));
    }
}
