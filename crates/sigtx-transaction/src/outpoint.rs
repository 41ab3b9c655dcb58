//! Reference to a previous transaction output.

use std::fmt;

use sigtx_primitives::chainhash::{Hash, HASH_SIZE};
use sigtx_primitives::util::{ByteReader, ByteWriter};

use crate::TransactionError;

/// Output index carried by the null outpoint of a coinbase input.
pub const NULL_INDEX: u32 = 0xFFFF_FFFF;

/// Encoded size of an outpoint: 32-byte hash plus 4-byte index.
pub const OUTPOINT_SIZE: usize = HASH_SIZE + 4;

/// The (transaction id, output index) pair an input spends.
///
/// `hash` is stored in internal byte order, the reverse of the hex form
/// shown by explorers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(hash: Hash, index: u32) -> Self {
        OutPoint { hash, index }
    }

    /// The outpoint referenced by a coinbase input.
    pub fn null() -> Self {
        OutPoint {
            hash: Hash::ZERO,
            index: NULL_INDEX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.hash.is_zero() && self.index == NULL_INDEX
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(self.hash.as_bytes());
        writer.write_u32_le(self.index);
    }

    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let hash = reader
            .read_array::<HASH_SIZE>()
            .map_err(|e| TransactionError::reading("outpoint hash", e))?;
        let index = reader
            .read_u32_le()
            .map_err(|e| TransactionError::reading("outpoint index", e))?;
        Ok(OutPoint {
            hash: Hash::new(hash),
            index,
        })
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}
