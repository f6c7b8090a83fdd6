//! # cinder-crypto
//!
//! Hashing primitives for Cinder.
//!
//! Signature handling lives with the transaction validation subsystem;
//! this crate only provides the Keccak-256 digest used for identities.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::keccak256;
