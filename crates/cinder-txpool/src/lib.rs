//! # cinder-txpool
//!
//! Transaction pool for Cinder.
//!
//! This crate provides:
//! - Per-account nonce-ordered transaction tracking
//! - Pending/queued transaction separation
//! - Transaction replacement gated by gas price bumps
//! - Global pool capacity with price-based eviction
//! - An event pipeline decoupling chain-head handling from admission
//!
//! ## Architecture
//!
//! ```text
//! +---------------------+
//! |       TxPool        |
//! +---------------------+
//!           |
//! +---------+----------+
//! | Pending |  Queued  |  <- Per-account nonce-ordered lists
//! +---------+----------+
//!           |
//! +---------------------+
//! |  Membership (all)   |  <- O(1) dedupe and capacity accounting
//! +---------------------+
//! |    Priced heap      |  <- Cheapest-first eviction candidates
//! +---------------------+
//! ```
//!
//! Admission (`add`, `add_txs`) is synchronous and lock-free; downstream
//! bookkeeping (promotion, reset, queued-tx notifications) is consumed
//! asynchronously by the event loops in [`events`](crate::PoolLoops).
//!
//! ## Usage
//!
//! ```ignore
//! use cinder_txpool::{PooledTransaction, TxPool};
//!
//! let mut pool = TxPool::with_defaults();
//! pool.add(PooledTransaction::new(sender, 0, 100))?;
//! let loops = pool.spawn_loops().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod events;
mod list;
mod noncer;
mod pool;
mod priced;
mod transaction;

pub use error::{TxPoolError, TxPoolResult};
pub use events::{ChainHead, HeadEvent, PoolLoops, ReorgEvent};
pub use noncer::{NonceTracker, NoopNoncer};
pub use pool::{PoolConfig, TxPool};
pub use transaction::PooledTransaction;
