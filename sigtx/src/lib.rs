#![deny(missing_docs)]

//! sigtx - transaction model and signature machinery.
//!
//! Re-exports the component crates for single-crate usage:
//! hashing and keys, scripts, and transactions with their signature hash
//! and signature checking.

pub use sigtx_primitives as primitives;
pub use sigtx_script as script;
pub use sigtx_transaction as transaction;
