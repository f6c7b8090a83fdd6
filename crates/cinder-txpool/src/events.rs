//! Pool event pipeline
//!
//! Two independent single-consumer loops, each draining its own unbounded
//! channel in arrival order. The ingestion loop handles chain-head and
//! shutdown signals from the block-sync side; the reorg loop handles the
//! notifications the pool itself emits during admission (queued
//! transactions, promotion requests, resets). Senders never block, so
//! admission latency is independent of consumer progress. There is no
//! ordering guarantee between the two channels.

use crate::transaction::PooledTransaction;
use cinder_primitives::{Address, H256};
use std::collections::HashSet;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, trace};

/// New canonical chain head announced by block sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainHead {
    /// Block hash of the new head
    pub hash: H256,
    /// Block height of the new head
    pub height: u64,
}

/// Messages consumed by the ingestion loop
#[derive(Debug, Clone)]
pub enum HeadEvent {
    /// The canonical chain advanced
    NewHead(ChainHead),
    /// Stop the pipeline; the ingestion loop cancels the reorg loop on exit
    Shutdown,
}

/// Messages consumed by the reorg loop.
///
/// The message set is closed: every variant is known here, so a foreign
/// tag is unrepresentable rather than a runtime fault.
#[derive(Debug, Clone)]
pub enum ReorgEvent {
    /// Reconcile pool state against a different head
    Reset {
        /// Head to reset against
        new_head: H256,
    },
    /// Accounts whose queued transactions may have become executable
    Promote(HashSet<Address>),
    /// A transaction was admitted or replaced in the executable set
    QueuedTx(PooledTransaction),
}

/// Join handles for the two spawned loops.
///
/// Await `ingest` to observe a completed shutdown; `reorg` resolves
/// cancelled once the ingestion loop has torn it down.
pub struct PoolLoops {
    /// The ingestion loop task
    pub ingest: JoinHandle<()>,
    /// The reorg loop task
    pub reorg: JoinHandle<()>,
}

/// Spawn both loops onto the current tokio runtime.
pub(crate) fn spawn(
    head_rx: mpsc::UnboundedReceiver<HeadEvent>,
    reorg_rx: mpsc::UnboundedReceiver<ReorgEvent>,
) -> PoolLoops {
    let reorg = tokio::spawn(reorg_loop(reorg_rx));
    let ingest = tokio::spawn(ingest_loop(head_rx, reorg.abort_handle()));
    PoolLoops { ingest, reorg }
}

/// Drain chain-head and shutdown signals in arrival order.
///
/// Exits on `Shutdown` or channel closure, and in either case cancels the
/// reorg loop as its final act. The reorg channel may still hold buffered
/// notifications at that point; they are dropped with it.
async fn ingest_loop(mut rx: mpsc::UnboundedReceiver<HeadEvent>, reorg: AbortHandle) {
    debug!("ingestion loop started");
    while let Some(event) = rx.recv().await {
        match event {
            HeadEvent::NewHead(head) => {
                // Head-advance reconciliation is owned by the reset handler
                // of the full node; here it is only observed.
                info!(hash = %head.hash, height = head.height, "chain head event");
            }
            HeadEvent::Shutdown => {
                info!("ingestion loop shutting down");
                break;
            }
        }
    }
    reorg.abort();
    debug!("ingestion loop exited");
}

/// Drain pool notifications in arrival order.
///
/// Each message is an independent, idempotent notification; handling is
/// the logging stub the full node replaces with real promotion and reset
/// bookkeeping. The loop has no shutdown branch of its own: it runs until
/// the ingestion loop cancels it.
async fn reorg_loop(mut rx: mpsc::UnboundedReceiver<ReorgEvent>) {
    debug!("reorg loop started");
    while let Some(event) = rx.recv().await {
        match event {
            ReorgEvent::Reset { new_head } => {
                info!(head = %new_head, "pool reset requested");
            }
            ReorgEvent::Promote(accounts) => {
                debug!(accounts = accounts.len(), "promotion requested");
            }
            ReorgEvent::QueuedTx(tx) => {
                trace!(tx = %tx, "queued transaction event");
            }
        }
    }
    debug!("reorg loop exited");
}
