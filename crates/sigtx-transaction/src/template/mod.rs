//! Script templates for producing unlocking scripts.
//!
//! A template knows how to satisfy one kind of locking script: given the
//! transaction, the input to sign and the locking script of the output
//! that input spends, it computes the signature hash and returns the
//! script to place in the input.

pub mod p2pkh;

use sigtx_script::Script;

use crate::transaction::Tx;
use crate::TransactionError;

/// Trait for signing strategies that produce unlocking scripts.
pub trait UnlockingScriptTemplate {
    /// Produce the unlocking script for input `input_index`.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - The input to sign.
    /// * `prev_locking_script` - Locking script of the output being spent.
    ///
    /// # Returns
    /// The unlocking script, or an error if the input does not exist or
    /// the template cannot satisfy `prev_locking_script`.
    fn sign(
        &self,
        tx: &Tx,
        input_index: usize,
        prev_locking_script: &Script,
    ) -> Result<Script, TransactionError>;
}
