//! Transaction pool implementation

use crate::error::{TxPoolError, TxPoolResult};
use crate::events::{self, HeadEvent, PoolLoops, ReorgEvent};
use crate::list::TxList;
use crate::noncer::{NonceTracker, NoopNoncer};
use crate::priced::PricedHeap;
use crate::transaction::PooledTransaction;
use cinder_primitives::{Address, H256};
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use tracing::debug;

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum percentage a replacement must out-price the original by
    pub price_bump: u128,
    /// Capacity of the executable (pending) partition
    pub global_slots: usize,
    /// Capacity of the non-executable (queued) partition
    pub global_queue: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            price_bump: 10,
            global_slots: 4096,
            global_queue: 1024,
        }
    }
}

impl PoolConfig {
    /// Total number of transactions the pool admits across both partitions
    fn total_slots(&self) -> usize {
        self.global_slots + self.global_queue
    }
}

/// Transaction pool.
///
/// Tracks admitted transactions in two per-account partitions: `pending`
/// holds nonce-contiguous runs believed executable against the current
/// chain state, `queue` holds the rest until gaps ahead of them fill. A
/// flat membership set deduplicates submissions and accounts for capacity,
/// and a price heap picks eviction victims when the pool is full.
///
/// Mutating operations take `&mut self` and never lock: one logical writer
/// drives the pool at a time, and embedders that need concurrent access
/// serialize it at their boundary. Notifications emitted during admission
/// are queued on an unbounded channel and consumed by the loops spawned
/// via [`spawn_loops`](TxPool::spawn_loops), so submitters never wait on
/// downstream bookkeeping.
pub struct TxPool {
    /// Configuration, fixed at construction
    config: PoolConfig,
    /// Executable transactions per account (strict lists)
    pending: HashMap<Address, TxList>,
    /// Not-yet-executable transactions per account (loose lists)
    queue: HashMap<Address, TxList>,
    /// Identity hashes of every admitted transaction
    all: HashSet<H256>,
    /// Cheapest-first eviction candidates over everything in `all`
    priced: PricedHeap,
    /// Lowest-valid-nonce oracle, notified on executable removals
    noncer: Box<dyn NonceTracker>,
    head_tx: mpsc::UnboundedSender<HeadEvent>,
    head_rx: Option<mpsc::UnboundedReceiver<HeadEvent>>,
    reorg_tx: mpsc::UnboundedSender<ReorgEvent>,
    reorg_rx: Option<mpsc::UnboundedReceiver<ReorgEvent>>,
}

impl TxPool {
    /// Create a new pool with the given configuration and nonce tracker
    pub fn new(config: PoolConfig, noncer: Box<dyn NonceTracker>) -> Self {
        let (head_tx, head_rx) = mpsc::unbounded_channel();
        let (reorg_tx, reorg_rx) = mpsc::unbounded_channel();
        Self {
            config,
            pending: HashMap::new(),
            queue: HashMap::new(),
            all: HashSet::new(),
            priced: PricedHeap::new(),
            noncer,
            head_tx,
            head_rx: Some(head_rx),
            reorg_tx,
            reorg_rx: Some(reorg_rx),
        }
    }

    /// Create a pool with default configuration and a no-op nonce tracker
    pub fn with_defaults() -> Self {
        Self::new(PoolConfig::default(), Box::new(NoopNoncer))
    }

    /// Spawn the ingestion and reorg loops onto the current tokio runtime.
    ///
    /// The receivers are handed over on the first call; subsequent calls
    /// return `None`.
    pub fn spawn_loops(&mut self) -> Option<PoolLoops> {
        let head_rx = self.head_rx.take()?;
        let reorg_rx = self.reorg_rx.take()?;
        Some(events::spawn(head_rx, reorg_rx))
    }

    /// Sender for chain-head and shutdown signals, for the block-sync side
    pub fn head_sender(&self) -> mpsc::UnboundedSender<HeadEvent> {
        self.head_tx.clone()
    }

    /// Add a transaction to the pool.
    ///
    /// Returns `Ok(true)` if the transaction replaced an existing entry at
    /// the same nonce, `Ok(false)` if it was inserted fresh. Rejections
    /// (duplicate, underpriced at capacity, insufficient replacement bump)
    /// come back as errors and leave the pool untouched.
    ///
    /// When the pool is full, the submission must out-price the cheapest
    /// admitted transaction; enough of the cheapest entries are then
    /// evicted to make room before insertion.
    pub fn add(&mut self, tx: PooledTransaction) -> TxPoolResult<bool> {
        if self.all.contains(&tx.hash()) {
            return Err(TxPoolError::AlreadyKnown(tx.hash()));
        }

        let cap = self.config.total_slots();
        if self.all.len() >= cap {
            if self.priced.underpriced(&tx, &self.all) {
                return Err(TxPoolError::Underpriced {
                    gas_price: tx.gas_price(),
                });
            }
            let victims = self.priced.discard(self.all.len() - cap + 1, &self.all);
            debug!(
                count = victims.len(),
                priced = self.priced.len(),
                stales = self.priced.stales(),
                "evicting cheapest transactions to make room"
            );
            for victim in &victims {
                self.remove_tx(victim, false);
            }
        }

        // An overlapping nonce in the executable run is replaced in place;
        // everything else routes through the queue until promoted.
        if let Some(list) = self.pending.get_mut(&tx.sender()) {
            if list.overlaps(tx.nonce()) {
                let replaced = list.add(tx.clone(), self.config.price_bump)?;
                if let Some(old) = &replaced {
                    self.all.remove(&old.hash());
                    self.priced.removed(1);
                }
                self.all.insert(tx.hash());
                self.priced.put(tx.clone());
                let _ = self.reorg_tx.send(ReorgEvent::QueuedTx(tx));
                return Ok(replaced.is_some());
            }
        }

        self.enqueue_tx(tx)
    }

    /// Add a batch of transactions in order.
    ///
    /// Senders that received a fresh insertion are collected and announced
    /// with a single promotion request, so a batch never wakes the
    /// promotion handler more than once. Individual rejections are logged
    /// and otherwise swallowed; callers that care about per-transaction
    /// outcomes use [`add`](TxPool::add).
    pub fn add_txs(&mut self, txs: Vec<PooledTransaction>) {
        let mut dirty = HashSet::new();
        for tx in txs {
            let (sender, hash) = (tx.sender(), tx.hash());
            match self.add(tx) {
                Ok(false) => {
                    dirty.insert(sender);
                }
                Ok(true) => {}
                Err(e) => {
                    debug!(tx = %hash, error = %e, "transaction rejected");
                }
            }
        }
        if !dirty.is_empty() {
            let _ = self.reorg_tx.send(ReorgEvent::Promote(dirty));
        }
    }

    /// Remove a transaction from the pool.
    ///
    /// `out_of_bound` marks removals whose price-heap entry is left behind
    /// (anything other than heap-driven eviction) and charges the heap's
    /// stale counter accordingly.
    ///
    /// Removing an executable transaction invalidates every higher nonce
    /// in the sender's pending run: those are demoted back to the queue,
    /// and the nonce tracker is asked to lower its hint for the sender.
    pub fn remove_tx(&mut self, tx: &PooledTransaction, out_of_bound: bool) {
        self.all.remove(&tx.hash());
        if out_of_bound {
            self.priced.removed(1);
        }

        if let Some(list) = self.pending.get_mut(&tx.sender()) {
            let (removed, cascaded) = list.remove(tx.nonce());
            if removed {
                if list.is_empty() {
                    self.pending.remove(&tx.sender());
                }
                for demoted in cascaded {
                    let (sender, nonce) = (demoted.sender(), demoted.nonce());
                    if let Err(e) = self.enqueue_tx(demoted) {
                        debug!(sender = %sender, nonce, error = %e, "demoted transaction dropped");
                    }
                }
                self.noncer.set_if_lower(tx.sender(), tx.nonce());
                return;
            }
        }

        if let Some(list) = self.queue.get_mut(&tx.sender()) {
            let (removed, _) = list.remove(tx.nonce());
            if removed && list.is_empty() {
                self.queue.remove(&tx.sender());
            }
        }
    }

    /// Route a transaction into the sender's queue list.
    ///
    /// Demoted transactions arrive here still registered in the membership
    /// set; only genuinely new ones are added to it and the price heap.
    fn enqueue_tx(&mut self, tx: PooledTransaction) -> TxPoolResult<bool> {
        let bump = self.config.price_bump;
        let list = self
            .queue
            .entry(tx.sender())
            .or_insert_with(|| TxList::new(false));
        let replaced = list.add(tx.clone(), bump)?;
        if let Some(old) = &replaced {
            self.all.remove(&old.hash());
            self.priced.removed(1);
        }
        if self.all.insert(tx.hash()) {
            self.priced.put(tx);
        }
        Ok(replaced.is_some())
    }

    /// Total number of pooled transactions
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Check whether a transaction with this identity is pooled
    pub fn contains(&self, hash: &H256) -> bool {
        self.all.contains(hash)
    }

    /// Number of executable transactions
    pub fn pending_len(&self) -> usize {
        self.pending.values().map(TxList::len).sum()
    }

    /// Number of queued transactions
    pub fn queued_len(&self) -> usize {
        self.queue.values().map(TxList::len).sum()
    }

    /// Iterate the executable set, nonce-ordered within each sender.
    ///
    /// Read surface for block assembly; serialize against mutation
    /// externally.
    pub fn pending_transactions(&self) -> impl Iterator<Item = &PooledTransaction> {
        self.pending.values().flat_map(|list| list.iter())
    }
}
