//! sigtx - Cryptographic primitives, hashing, and binary encoding utilities.
//!
//! This crate provides the foundational building blocks for the other sigtx crates:
//! - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
//! - Chain hash type for transaction identification
//! - secp256k1 keys and ECDSA signatures (backed by `k256`)
//! - CompactSize integer encoding and byte reader/writer

pub mod hash;
pub mod chainhash;
pub mod util;
pub mod ec;

mod error;
pub use error::PrimitivesError;
