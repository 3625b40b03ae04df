//! Readiness Waiter - bounded poll until the node answers basic RPC
//!
//! The only retry logic in the whole tool. It retries exactly one
//! operation class (the liveness probe); metric fetches that fail after
//! readiness are hard failures, never retried.

use tokio::sync::watch;
use tracing::{debug, info};

use crate::context::ReadinessBudget;
use crate::rpc::{NodeRpc, RpcVerb};

/// Terminal states of the wait loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOutcome {
    /// The probe succeeded on the given attempt (1-based).
    Ready { attempts: u32 },
    /// Budget exhausted without a successful probe. Fatal for the run.
    TimedOut { attempts: u32 },
    /// Externally cancelled; distinct from a timeout.
    Cancelled,
}

/// Poll a cheap chain-state call until it succeeds, the budget runs out,
/// or the cancel signal fires.
pub async fn wait_for_rpc(
    rpc: &dyn NodeRpc,
    budget: &ReadinessBudget,
    cancel: &mut watch::Receiver<bool>,
) -> ReadinessOutcome {
    for attempt in 1..=budget.max_attempts {
        if *cancel.borrow() {
            return ReadinessOutcome::Cancelled;
        }

        let outcome = rpc.call(RpcVerb::ChainState).await;
        if outcome.is_success() {
            info!("node RPC ready after {} attempt(s)", attempt);
            return ReadinessOutcome::Ready { attempts: attempt };
        }
        debug!(
            "readiness probe {}/{} failed: {}",
            attempt,
            budget.max_attempts,
            outcome.failure_detail()
        );

        if attempt == budget.max_attempts {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(budget.interval) => {}
            changed = cancel.changed() => {
                if changed.is_ok() && *cancel.borrow() {
                    return ReadinessOutcome::Cancelled;
                }
                // Sender dropped or spurious wake: keep the pacing.
                tokio::time::sleep(budget.interval).await;
            }
        }
    }

    ReadinessOutcome::TimedOut {
        attempts: budget.max_attempts,
    }
}
