//! Transaction output: an amount locked by a script.

use sigtx_primitives::util::{ByteReader, ByteWriter};
use sigtx_script::Script;

use crate::TransactionError;

/// Value written for outputs blanked by `SIGHASH_SINGLE`.
pub const NULL_VALUE: i64 = -1;

/// Smallest possible encoded output: value plus an empty script length.
pub const MIN_TX_OUT_SIZE: usize = 8 + 1;

/// A single transaction output.
///
/// `value` is signed so the null output used in signature hashing can be
/// represented; it encodes as 8 bytes little-endian.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TxOut {
    pub value: i64,
    pub script: Script,
}

impl TxOut {
    pub fn new(value: i64, script: Script) -> Self {
        TxOut { value, script }
    }

    /// The output `SIGHASH_SINGLE` substitutes for earlier outputs.
    pub fn null() -> Self {
        TxOut {
            value: NULL_VALUE,
            script: Script::new(),
        }
    }

    pub fn serialized_size(&self) -> usize {
        8 + self.script.serialized_size()
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_i64_le(self.value);
        self.script.write_to(writer);
    }

    /// Decode one output, rejecting scripts longer than `max_script_size`.
    pub fn read_from(
        reader: &mut ByteReader<'_>,
        max_script_size: usize,
    ) -> Result<Self, TransactionError> {
        let value = reader
            .read_i64_le()
            .map_err(|e| TransactionError::reading("output value", e))?;
        let script = Script::read_from_with_limit(reader, max_script_size)
            .map_err(|e| TransactionError::reading_script("output script", e))?;
        Ok(TxOut { value, script })
    }
}
