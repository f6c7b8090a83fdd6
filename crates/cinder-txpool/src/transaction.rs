//! Pooled transaction type

use cinder_crypto::keccak256;
use cinder_primitives::{Address, H256};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A transaction as tracked by the pool.
///
/// Carries the fields admission cares about (sender, nonce, gas price) and
/// a derived identity hash. Signature recovery and stateful validation
/// happen upstream; by the time a transaction reaches the pool its sender
/// is authenticated.
///
/// Equality and hashing go through the identity hash only, so two
/// submissions with identical fields are indistinguishable to set and map
/// membership.
#[derive(Debug, Clone)]
pub struct PooledTransaction {
    /// Authenticated sender address
    sender: Address,
    /// Account nonce
    nonce: u64,
    /// Gas price in the smallest fee unit
    gas_price: u128,
    /// Identity hash, derived from the fields above at construction
    hash: H256,
}

impl PooledTransaction {
    /// Create a new pooled transaction, deriving its identity hash.
    pub fn new(sender: Address, nonce: u64, gas_price: u128) -> Self {
        let mut buf = [0u8; Address::LEN + 8 + 16];
        buf[..Address::LEN].copy_from_slice(sender.as_bytes());
        buf[Address::LEN..Address::LEN + 8].copy_from_slice(&nonce.to_be_bytes());
        buf[Address::LEN + 8..].copy_from_slice(&gas_price.to_be_bytes());
        let hash = keccak256(&buf);
        Self {
            sender,
            nonce,
            gas_price,
            hash,
        }
    }

    /// Get the sender address
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Get the nonce
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Get the gas price
    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    /// Get the identity hash
    pub fn hash(&self) -> H256 {
        self.hash
    }
}

impl PartialEq for PooledTransaction {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for PooledTransaction {}

impl Hash for PooledTransaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Display for PooledTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tx({}, sender={}, nonce={}, gas_price={})",
            self.hash, self.sender, self.nonce, self.gas_price
        )
    }
}
