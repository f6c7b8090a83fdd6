//! Nonce tracker seam
//!
//! The pool never reads account nonces itself; it only asks the tracker to
//! relax its lowest-valid-nonce hint downward when an executable
//! transaction is removed. A chain-state-backed implementation plugs in
//! behind the trait without touching pool logic.

use cinder_primitives::Address;
use tracing::trace;

/// Lowest-valid-nonce oracle owned by the chain-state subsystem.
pub trait NonceTracker: Send + Sync {
    /// Lower the tracked nonce for `account` to `nonce` if it is currently
    /// higher; otherwise do nothing.
    fn set_if_lower(&self, account: Address, nonce: u64);
}

/// Tracker stub that only records the request in the log.
///
/// Stands in until the node wires a real chain-state-backed tracker.
#[derive(Debug, Default)]
pub struct NoopNoncer;

impl NonceTracker for NoopNoncer {
    fn set_if_lower(&self, account: Address, nonce: u64) {
        trace!(account = %account, nonce, "nonce hint relaxation requested");
    }
}
