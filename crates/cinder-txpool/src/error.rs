//! Transaction pool error types

use cinder_primitives::H256;
use thiserror::Error;

/// Transaction pool errors
///
/// Admission rejections are ordinary outcomes, not faults: they carry a
/// structured reason and guarantee that the pool was left unmodified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxPoolError {
    /// Transaction already in the pool
    #[error("transaction already known: {0}")]
    AlreadyKnown(H256),

    /// Pool is full and the transaction cannot displace anything
    #[error("transaction underpriced: gas price {gas_price} does not beat the cheapest pooled transaction")]
    Underpriced {
        /// Gas price of the rejected transaction
        gas_price: u128,
    },

    /// Replacement transaction does not meet the price bump threshold
    #[error("replacement transaction underpriced: old {old}, new {new}")]
    ReplacementUnderpriced {
        /// Gas price of the transaction already at this nonce
        old: u128,
        /// Gas price of the rejected replacement
        new: u128,
    },
}

/// Result type for transaction pool operations
pub type TxPoolResult<T> = Result<T, TxPoolError>;
