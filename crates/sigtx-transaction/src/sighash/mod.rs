//! Legacy signature hash computation.
//!
//! Computes the digest an ECDSA signature commits to when authorizing an
//! input, using the original pre-BIP143 algorithm: the transaction is
//! copied, the copy's scripts, outputs and sequences are rewritten
//! according to the hash type, and the serialized copy plus the hash type
//! is double-SHA256'd.
//!
//! `SIGHASH_SINGLE` on an input with no matching output does not fail.
//! It yields the fixed digest `1` (see [`SIGHASH_SINGLE_FALLBACK`]), and
//! any signature over that digest is accepted by consensus code, so
//! callers signing with `SINGLE` must check the output exists themselves.

use std::fmt;

use sigtx_primitives::chainhash::{double_hash_h, Hash};
use sigtx_primitives::util::ByteWriter;
use sigtx_script::Script;
use tracing::{debug, trace};

use crate::output::TxOut;
use crate::transaction::Tx;
use crate::TransactionError;

/// Mask selecting the base type (ALL, NONE or SINGLE) from a hash type.
pub const SIGHASH_MASK: u32 = 0x1f;

/// Digest used when `SIGHASH_SINGLE` signs an input past the last output:
/// the little-endian encoding of the integer 1.
pub const SIGHASH_SINGLE_FALLBACK: Hash = Hash::new([
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, //
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
]);

/// The hash type appended to a signature.
///
/// Only the low five bits select the base type and bit `0x80` marks
/// ANYONECANPAY. All 32 bits are committed to in the digest, so two types
/// that behave the same still produce different digests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SigHashType(pub u32);

/// How outputs and other inputs' sequences are treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseType {
    /// Sign every output. Also used for unrecognized base values.
    All,
    /// Sign no outputs.
    None,
    /// Sign only the output at the input's own index.
    Single,
}

impl SigHashType {
    pub const ALL: SigHashType = SigHashType(0x01);
    pub const NONE: SigHashType = SigHashType(0x02);
    pub const SINGLE: SigHashType = SigHashType(0x03);
    pub const ANYONECANPAY: SigHashType = SigHashType(0x80);
    pub const ALL_ANYONECANPAY: SigHashType = SigHashType(0x81);
    pub const NONE_ANYONECANPAY: SigHashType = SigHashType(0x82);
    pub const SINGLE_ANYONECANPAY: SigHashType = SigHashType(0x83);

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn base_type(self) -> BaseType {
        match self.0 & SIGHASH_MASK {
            0x02 => BaseType::None,
            0x03 => BaseType::Single,
            _ => BaseType::All,
        }
    }

    pub fn anyone_can_pay(self) -> bool {
        self.0 & Self::ANYONECANPAY.0 != 0
    }
}

impl Default for SigHashType {
    fn default() -> Self {
        SigHashType::ALL
    }
}

impl From<u8> for SigHashType {
    fn from(byte: u8) -> Self {
        SigHashType(byte as u32)
    }
}

impl From<u32> for SigHashType {
    fn from(value: u32) -> Self {
        SigHashType(value)
    }
}

impl fmt::Display for SigHashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.0 & SIGHASH_MASK {
            0x01 => "ALL",
            0x02 => "NONE",
            0x03 => "SINGLE",
            _ => return write!(f, "{:#04x}", self.0),
        };
        if self.0 & !(SIGHASH_MASK | Self::ANYONECANPAY.0) != 0 {
            return write!(f, "{:#04x}", self.0);
        }
        if self.anyone_can_pay() {
            write!(f, "{}|ANYONECANPAY", base)
        } else {
            f.write_str(base)
        }
    }
}

/// What a signature hash is computed over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Preimage {
    /// Serialized modified transaction followed by the 4-byte hash type.
    Bytes(Vec<u8>),
    /// `SIGHASH_SINGLE` with no matching output; the digest is
    /// [`SIGHASH_SINGLE_FALLBACK`] and there is nothing to hash.
    SingleFallback,
}

/// Compute the digest for input `index` spending an output locked by
/// `script`.
///
/// # Arguments
/// * `tx` - The transaction being signed. It is not modified.
/// * `script` - The locking script of the spent output. Only the part
///   after its last `OP_CODESEPARATOR` is committed to.
/// * `sighash_type` - The hash type that will be appended to the signature.
/// * `index` - The input being signed.
///
/// # Returns
/// The 32-byte digest in internal order, or `IndexOutOfRange` if `index`
/// is not an input of `tx`.
pub fn signature_hash(
    tx: &Tx,
    script: &Script,
    sighash_type: SigHashType,
    index: usize,
) -> Result<Hash, TransactionError> {
    let digest = match calc_preimage(tx, script, sighash_type, index)? {
        Preimage::Bytes(bytes) => double_hash_h(&bytes),
        Preimage::SingleFallback => SIGHASH_SINGLE_FALLBACK,
    };
    trace!(index, sighash_type = %sighash_type, digest = %digest, "computed signature hash");
    Ok(digest)
}

/// Build the bytes [`signature_hash`] double-hashes.
pub fn calc_preimage(
    tx: &Tx,
    script: &Script,
    sighash_type: SigHashType,
    index: usize,
) -> Result<Preimage, TransactionError> {
    if index >= tx.inputs.len() {
        return Err(TransactionError::IndexOutOfRange {
            index,
            len: tx.inputs.len(),
        });
    }

    let base = sighash_type.base_type();
    if base == BaseType::Single && index >= tx.outputs.len() {
        debug!(
            index,
            outputs = tx.outputs.len(),
            "SIGHASH_SINGLE input has no matching output, using fallback digest"
        );
        return Ok(Preimage::SingleFallback);
    }

    let mut copy = tx.clone();
    let sub_script = script.sub_script();
    for (i, input) in copy.inputs.iter_mut().enumerate() {
        input.script = if i == index {
            sub_script.clone()
        } else {
            Script::new()
        };
    }

    match base {
        BaseType::None => {
            copy.outputs.clear();
            zero_other_sequences(&mut copy, index);
        }
        BaseType::Single => {
            copy.outputs.truncate(index + 1);
            for output in &mut copy.outputs[..index] {
                *output = TxOut::null();
            }
            zero_other_sequences(&mut copy, index);
        }
        BaseType::All => {}
    }

    if sighash_type.anyone_can_pay() {
        let own = copy.inputs.swap_remove(index);
        copy.inputs = vec![own];
    }

    let mut writer = ByteWriter::with_capacity(copy.serialized_size() + 4);
    copy.write_to(&mut writer);
    writer.write_u32_le(sighash_type.value());
    Ok(Preimage::Bytes(writer.into_bytes()))
}

fn zero_other_sequences(tx: &mut Tx, index: usize) {
    for (i, input) in tx.inputs.iter_mut().enumerate() {
        if i != index {
            input.sequence = 0;
        }
    }
}
