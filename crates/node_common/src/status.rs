//! Status flow - the one linear pipeline of the tool
//!
//! detect -> wait for readiness -> fetch each metric in sequence -> probe
//! resources -> synthesize. Strictly sequential; no component here calls
//! back into an earlier one. Chain and network state are required; the
//! mempool, uptime and SV2 sections degrade to "unavailable" instead of
//! failing the run.

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::context::NodeContext;
use crate::error::StatusError;
use crate::metrics::{mempool, network, sv2, sync, uptime};
use crate::node_config::NodeConfig;
use crate::readiness::{self, ReadinessOutcome};
use crate::report::{self, StatusReport};
use crate::resources;
use crate::rpc::{CallStatus, NodeRpc, RpcVerb};
use crate::service;

/// Run the whole status check against an already-constructed RPC adapter.
///
/// Takes the adapter behind the trait object, so the complete flow runs
/// against scripted responses in tests.
pub async fn collect(
    rpc: &dyn NodeRpc,
    config: &NodeConfig,
    ctx: &NodeContext,
    cancel: &mut watch::Receiver<bool>,
) -> Result<StatusReport, StatusError> {
    // Detect: a missing client binary is fatal immediately, before any
    // readiness waiting or metric fetching.
    let probe = rpc.call(RpcVerb::ChainState).await;
    if probe.status == CallStatus::CliNotFound {
        return Err(StatusError::CliNotFound(ctx.cli_bin.clone()));
    }

    match readiness::wait_for_rpc(rpc, &ctx.readiness, cancel).await {
        ReadinessOutcome::Ready { attempts } => {
            debug!("readiness established (attempt {})", attempts);
        }
        ReadinessOutcome::TimedOut { attempts } => {
            return Err(StatusError::ReadinessTimeout {
                attempts,
                interval_secs: ctx.readiness.interval.as_secs(),
            });
        }
        ReadinessOutcome::Cancelled => return Err(StatusError::Cancelled),
    }

    // Required sections. A failure here fails the run.
    let chain = sync::extract(&require(rpc, RpcVerb::ChainState, cancel).await?)?;
    let net = network::extract(&require(rpc, RpcVerb::NetworkState, cancel).await?)?;

    // Degradable sections.
    let pool = match require(rpc, RpcVerb::MempoolState, cancel).await {
        Ok(raw) => match mempool::extract(&raw) {
            Ok(pool) => Some(pool),
            Err(err) => {
                warn!("mempool section unavailable: {}", err);
                None
            }
        },
        Err(StatusError::Cancelled) => return Err(StatusError::Cancelled),
        Err(err) => {
            warn!("mempool section unavailable: {}", err);
            None
        }
    };
    let uptime_seconds = match require(rpc, RpcVerb::Uptime, cancel).await {
        Ok(raw) => match uptime::extract(&raw) {
            Ok(seconds) => Some(seconds),
            Err(err) => {
                warn!("uptime section unavailable: {}", err);
                None
            }
        },
        Err(StatusError::Cancelled) => return Err(StatusError::Cancelled),
        Err(err) => {
            warn!("uptime section unavailable: {}", err);
            None
        }
    };

    let sv2_status = match &config.sv2 {
        Some(settings) => Some(sv2::probe(settings, ctx.rpc_timeout).await),
        None => None,
    };

    let snapshot = resources::probe(&ctx.datadir);
    let service_state = service::query(ctx.platform, &ctx.service_name);

    let health = report::synthesize(&chain, &net, sv2_status.as_ref(), ctx.min_connections);

    Ok(StatusReport {
        timestamp: Utc::now(),
        chain,
        network: net,
        mempool: pool,
        uptime_seconds,
        sv2: sv2_status,
        resources: snapshot,
        service: service_state,
        health,
    })
}

/// One metric fetch after readiness: no retry, failure is immediate.
async fn require(
    rpc: &dyn NodeRpc,
    verb: RpcVerb,
    cancel: &watch::Receiver<bool>,
) -> Result<String, StatusError> {
    if *cancel.borrow() {
        return Err(StatusError::Cancelled);
    }
    let outcome = rpc.call(verb).await;
    if !outcome.is_success() {
        return Err(StatusError::RpcFailed {
            verb,
            detail: outcome.failure_detail(),
        });
    }
    Ok(outcome.stdout)
}
