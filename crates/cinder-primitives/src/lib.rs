//! # cinder-primitives
//!
//! Primitive types for the Cinder node.
//!
//! Provides the account and hash value types shared by the rest of the
//! system.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::{Hash, HashError, H256};

/// Transaction nonce type
pub type Nonce = u64;

/// Block height type
pub type BlockHeight = u64;
