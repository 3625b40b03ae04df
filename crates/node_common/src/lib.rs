//! node_common - Shared library for the nodectl status tooling
//!
//! Everything the CLI needs to check on an externally-managed full node:
//! config discovery, the CLI-RPC adapter, readiness waiting, metric
//! extraction, host resource probing and report synthesis.

pub mod context;
pub mod error;
pub mod metrics;
pub mod node_config;
pub mod readiness;
pub mod report;
pub mod resources;
pub mod rpc;
pub mod service;
pub mod status;
pub mod terminal_format;

pub use context::{NodeContext, Platform, ReadinessBudget};
pub use error::StatusError;
pub use node_config::{NodeConfig, RpcCredentialsFile, Sv2Settings};
pub use report::{ConnectionAxis, HealthReport, StatusReport, SyncAxis};
pub use rpc::{CliNodeRpc, FakeNodeRpc, NodeRpc, RpcOutcome, RpcVerb};
