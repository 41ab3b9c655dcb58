//! Core transaction type.
//!
//! A transaction is a version, ordered inputs, ordered outputs and a lock
//! time. This module owns the canonical binary encoding, the transaction
//! id, and the builder methods used to assemble a transaction before it
//! is signed.

use std::fmt;

use sigtx_primitives::chainhash::{double_hash_h, Hash};
use sigtx_primitives::util::{ByteReader, ByteWriter, VarInt};
use sigtx_script::Script;
use tracing::debug;

use crate::config::DecodeConfig;
use crate::input::{TxIn, MIN_TX_IN_SIZE};
use crate::output::{TxOut, MIN_TX_OUT_SIZE};
use crate::sighash::{self, SigHashType};
use crate::TransactionError;

/// A transaction.
///
/// # Wire format
///
/// | Field        | Size                 |
/// |--------------|----------------------|
/// | version      | 4 bytes (LE, signed) |
/// | input count  | CompactSize          |
/// | inputs       | variable             |
/// | output count | CompactSize          |
/// | outputs      | variable             |
/// | lock_time    | 4 bytes (LE)         |
///
/// Equality is structural, so decoding the encoding of a transaction
/// yields a value equal to it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tx {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Tx {
    /// Create an empty transaction with version 1 and lock time 0.
    pub fn new() -> Self {
        Tx {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    pub fn add_tx_in(&mut self, input: TxIn) {
        self.inputs.push(input);
    }

    pub fn add_tx_out(&mut self, output: TxOut) {
        self.outputs.push(output);
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Sum of all output values, or `None` on overflow.
    pub fn total_output_value(&self) -> Option<i64> {
        self.outputs
            .iter()
            .try_fold(0i64, |acc, out| acc.checked_add(out.value))
    }

    /// A coinbase has exactly one input, and that input spends the null
    /// outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_out_point.is_null()
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from hex, with default decode limits.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::SerializationError(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse exactly one transaction from `bytes`, with default decode limits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        Self::from_bytes_with_config(bytes, &DecodeConfig::default())
    }

    /// Parse exactly one transaction from `bytes`.
    ///
    /// # Arguments
    /// * `bytes` - The raw transaction. Trailing data is an error.
    /// * `config` - Size and count limits for untrusted input.
    ///
    /// # Returns
    /// The transaction, or `TruncatedInput` if the bytes end early,
    /// `LimitExceeded` if a limit is hit, or `TrailingBytes` if data
    /// follows the lock time.
    pub fn from_bytes_with_config(
        bytes: &[u8],
        config: &DecodeConfig,
    ) -> Result<Self, TransactionError> {
        if bytes.len() > config.max_tx_size {
            return Err(TransactionError::LimitExceeded {
                what: "transaction size",
                value: bytes.len(),
                limit: config.max_tx_size,
            });
        }

        let mut reader = ByteReader::new(bytes);
        let result = Self::read_from_with_config(&mut reader, config).and_then(|tx| {
            match reader.remaining() {
                0 => Ok(tx),
                extra => Err(TransactionError::TrailingBytes(extra)),
            }
        });
        if let Err(ref e) = result {
            debug!(len = bytes.len(), error = %e, "transaction decode failed");
        }
        result
    }

    /// Read one transaction from `reader` with no limits beyond its length.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        Self::read_from_with_config(reader, &DecodeConfig::unbounded())
    }

    /// Read one transaction from `reader`, leaving any following bytes.
    ///
    /// Input and output counts are checked against the bytes actually left
    /// before any vector is allocated, so a huge declared count fails fast.
    pub fn read_from_with_config(
        reader: &mut ByteReader<'_>,
        config: &DecodeConfig,
    ) -> Result<Self, TransactionError> {
        let version = reader
            .read_i32_le()
            .map_err(|e| TransactionError::reading("version", e))?;

        let input_count = read_count(reader, "input count", MIN_TX_IN_SIZE, config.max_items)?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TxIn::read_from(reader, config.max_script_size)?);
        }

        let output_count = read_count(reader, "output count", MIN_TX_OUT_SIZE, config.max_items)?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TxOut::read_from(reader, config.max_script_size)?);
        }

        let lock_time = reader
            .read_u32_le()
            .map_err(|e| TransactionError::reading("lock time", e))?;

        Ok(Tx {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Exact length of [`to_bytes`](Self::to_bytes).
    pub fn serialized_size(&self) -> usize {
        4 + VarInt::from(self.inputs.len()).length()
            + self.inputs.iter().map(TxIn::serialized_size).sum::<usize>()
            + VarInt::from(self.outputs.len()).length()
            + self.outputs.iter().map(TxOut::serialized_size).sum::<usize>()
            + 4
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_i32_le(self.version);
        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(writer);
        }
        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(writer);
        }
        writer.write_u32_le(self.lock_time);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.serialized_size());
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Identity and signing
    // -----------------------------------------------------------------

    /// Double SHA-256 of the serialization, in internal byte order.
    pub fn tx_id(&self) -> Hash {
        double_hash_h(&self.to_bytes())
    }

    /// The transaction id in the byte-reversed hex form used by explorers.
    pub fn tx_id_hex(&self) -> String {
        self.tx_id().to_string()
    }

    /// Digest an input's signature commits to.
    ///
    /// See [`sighash::signature_hash`].
    pub fn signature_hash(
        &self,
        script: &Script,
        sighash_type: SigHashType,
        index: usize,
    ) -> Result<Hash, TransactionError> {
        sighash::signature_hash(self, script, sighash_type, index)
    }
}

impl Default for Tx {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Tx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Read an element count and check it against the remaining input and
/// `max_items`.
fn read_count(
    reader: &mut ByteReader<'_>,
    context: &'static str,
    min_element_size: usize,
    max_items: usize,
) -> Result<usize, TransactionError> {
    let declared = reader
        .read_varint()
        .map_err(|e| TransactionError::reading(context, e))?;
    let count = usize::try_from(declared.value()).unwrap_or(usize::MAX);

    let remaining = reader.remaining();
    let needed = count.saturating_mul(min_element_size);
    if needed > remaining {
        return Err(TransactionError::TruncatedInput {
            context,
            needed,
            remaining,
        });
    }
    if count > max_items {
        return Err(TransactionError::LimitExceeded {
            what: context,
            value: count,
            limit: max_items,
        });
    }
    Ok(count)
}
