//! sigtx - Transaction model, wire codec, legacy signature hashing and
//! signature checking.
//!
//! Provides `Tx` with its inputs and outputs, the canonical binary
//! serialization, the pre-BIP143 signature hash algorithm, DER/SEC1
//! signature checking, and a P2PKH template that ties them together.

pub mod checker;
pub mod config;
pub mod input;
pub mod outpoint;
pub mod output;
pub mod sighash;
pub mod template;
pub mod transaction;

mod error;
pub use checker::{check_sig, SignatureChecker, TxSignatureChecker};
pub use config::DecodeConfig;
pub use error::TransactionError;
pub use input::TxIn;
pub use outpoint::OutPoint;
pub use output::TxOut;
pub use sighash::{signature_hash, SigHashType};
pub use transaction::Tx;
