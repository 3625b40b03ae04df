//! RPC Client Adapter - all access to the node's CLI goes through here
//!
//! The node's RPC interface is reached exclusively through its bundled
//! command-line client, never over the wire. A failed call is a value, not
//! an error: callers check the outcome's status. The trait seam exists so
//! tests run against a fake with scripted responses instead of a real node.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::context::NodeContext;
use crate::node_config::RpcCredentialsFile;

/// Cap on captured output; RPC payloads here are small, anything bigger is
/// noise.
const MAX_OUTPUT_BYTES: usize = 64 * 1024;

/// The four query verbs the status check uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcVerb {
    ChainState,
    NetworkState,
    MempoolState,
    Uptime,
}

impl RpcVerb {
    /// Arguments passed to the node CLI for this verb.
    pub fn cli_args(&self) -> &'static [&'static str] {
        match self {
            RpcVerb::ChainState => &["getblockchaininfo"],
            RpcVerb::NetworkState => &["getnetworkinfo"],
            RpcVerb::MempoolState => &["getmempoolinfo"],
            RpcVerb::Uptime => &["uptime"],
        }
    }
}

impl fmt::Display for RpcVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_args()[0])
    }
}

/// How a call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Success,
    /// Ran, but exited non-zero or printed an error marker.
    RpcError,
    /// The CLI binary itself is missing.
    CliNotFound,
    Timeout,
    OsError,
}

/// Raw result of one CLI invocation. Never an Err: failure is a status.
#[derive(Debug, Clone)]
pub struct RpcOutcome {
    pub verb: RpcVerb,
    pub status: CallStatus,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl RpcOutcome {
    pub fn is_success(&self) -> bool {
        self.status == CallStatus::Success
    }

    /// Short human-readable failure detail for error reporting.
    pub fn failure_detail(&self) -> String {
        match self.status {
            CallStatus::Success => "ok".to_string(),
            CallStatus::Timeout => "timed out".to_string(),
            CallStatus::CliNotFound => "client binary not found".to_string(),
            CallStatus::OsError | CallStatus::RpcError => {
                let line = self
                    .stderr
                    .lines()
                    .chain(self.stdout.lines())
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("no output");
                format!("exit {}: {}", self.exit_code, line.trim())
            }
        }
    }

    /// Scripted success, for tests.
    pub fn ok(verb: RpcVerb, stdout: &str) -> Self {
        Self {
            verb,
            status: CallStatus::Success,
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
            duration_ms: 0,
        }
    }

    /// Scripted failure, for tests.
    pub fn failed(verb: RpcVerb, stderr: &str) -> Self {
        Self {
            verb,
            status: CallStatus::RpcError,
            exit_code: 1,
            stdout: String::new(),
            stderr: stderr.to_string(),
            duration_ms: 0,
        }
    }
}

/// Seam between the status flow and the external node CLI.
///
/// Production uses [`CliNodeRpc`]; tests use [`FakeNodeRpc`] with
/// pre-configured responses and no system calls.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    async fn call(&self, verb: RpcVerb) -> RpcOutcome;
}

/// Real adapter: spawns the node CLI with explicit `-conf=` credential
/// passing and a hard per-call timeout.
pub struct CliNodeRpc {
    cli_bin: String,
    conf_arg: Option<PathBuf>,
    timeout: Duration,
}

impl CliNodeRpc {
    pub fn new(ctx: &NodeContext, credentials: Option<&RpcCredentialsFile>) -> Self {
        Self {
            cli_bin: ctx.cli_bin.clone(),
            conf_arg: credentials.map(|c| c.path().to_path_buf()),
            timeout: ctx.rpc_timeout,
        }
    }
}

#[async_trait]
impl NodeRpc for CliNodeRpc {
    async fn call(&self, verb: RpcVerb) -> RpcOutcome {
        let start = Instant::now();

        let mut cmd = tokio::process::Command::new(&self.cli_bin);
        if let Some(conf) = &self.conf_arg {
            cmd.arg(format!("-conf={}", conf.display()));
        }
        cmd.args(verb.cli_args())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("invoking {} {}", self.cli_bin, verb);

        let result = tokio::time::timeout(self.timeout, cmd.output()).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Err(_) => RpcOutcome {
                verb,
                status: CallStatus::Timeout,
                exit_code: -1,
                stdout: String::new(),
                stderr: format!("no answer within {}s", self.timeout.as_secs()),
                duration_ms,
            },
            Ok(Err(err)) => {
                let status = if err.kind() == std::io::ErrorKind::NotFound {
                    CallStatus::CliNotFound
                } else {
                    CallStatus::OsError
                };
                RpcOutcome {
                    verb,
                    status,
                    exit_code: -1,
                    stdout: String::new(),
                    stderr: format!("OS error: {}", err),
                    duration_ms,
                }
            }
            Ok(Ok(output)) => {
                let stdout = truncate_output(&output.stdout);
                let stderr = truncate_output(&output.stderr);
                let exit_code = output.status.code().unwrap_or(-1);

                // bitcoin-cli style failures: non-zero exit, or an error
                // marker even when the exit status lies.
                let failed = !output.status.success()
                    || stderr.contains("error code:")
                    || stderr.trim_start().starts_with("error:");
                let status = if failed {
                    CallStatus::RpcError
                } else {
                    CallStatus::Success
                };

                RpcOutcome {
                    verb,
                    status,
                    exit_code,
                    stdout,
                    stderr,
                    duration_ms,
                }
            }
        }
    }
}

fn truncate_output(bytes: &[u8]) -> String {
    // Truncate the raw bytes before decoding; a multi-byte character cut
    // at the cap degrades to U+FFFD instead of an invalid slice index.
    let capped = if bytes.len() > MAX_OUTPUT_BYTES {
        &bytes[..MAX_OUTPUT_BYTES]
    } else {
        bytes
    };
    String::from_utf8_lossy(capped).to_string()
}

/// Fake adapter with scripted responses, for deterministic tests.
///
/// Responses queued with [`FakeNodeRpc::push`] are consumed first; after
/// the queue drains, the steady response set with [`FakeNodeRpc::respond`]
/// is returned. Verbs with nothing configured fail.
#[derive(Default)]
pub struct FakeNodeRpc {
    queued: Mutex<HashMap<RpcVerb, VecDeque<RpcOutcome>>>,
    steady: Mutex<HashMap<RpcVerb, RpcOutcome>>,
    calls: Mutex<Vec<RpcVerb>>,
}

impl FakeNodeRpc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the steady-state response for a verb.
    pub fn respond(&self, outcome: RpcOutcome) {
        self.steady.lock().unwrap().insert(outcome.verb, outcome);
    }

    /// Queue a one-shot response, consumed before the steady response.
    pub fn push(&self, outcome: RpcOutcome) {
        self.queued
            .lock()
            .unwrap()
            .entry(outcome.verb)
            .or_default()
            .push_back(outcome);
    }

    /// Every verb called so far, in order.
    pub fn calls(&self) -> Vec<RpcVerb> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeRpc for FakeNodeRpc {
    async fn call(&self, verb: RpcVerb) -> RpcOutcome {
        self.calls.lock().unwrap().push(verb);

        if let Some(queue) = self.queued.lock().unwrap().get_mut(&verb) {
            if let Some(outcome) = queue.pop_front() {
                return outcome;
            }
        }
        if let Some(outcome) = self.steady.lock().unwrap().get(&verb) {
            return outcome.clone();
        }
        RpcOutcome::failed(verb, "error: no scripted response")
    }
}
