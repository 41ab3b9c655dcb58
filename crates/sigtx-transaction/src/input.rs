//! Transaction input spending a previous output.
//!
//! Holds the outpoint being spent, the unlocking script and the sequence
//! number, with the binary encoding used on the wire.

use sigtx_primitives::util::{ByteReader, ByteWriter};
use sigtx_script::Script;

use crate::outpoint::{OutPoint, OUTPOINT_SIZE};
use crate::TransactionError;

/// Sequence number of a finalized input.
pub const DEFAULT_SEQUENCE: u32 = 0xFFFF_FFFF;

/// Smallest possible encoded input: outpoint, one-byte empty script length
/// and sequence.
pub const MIN_TX_IN_SIZE: usize = OUTPOINT_SIZE + 1 + 4;

/// A single transaction input.
///
/// # Wire format
///
/// | Field            | Size          |
/// |------------------|---------------|
/// | previous hash    | 32 bytes      |
/// | previous index   | 4 bytes (LE)  |
/// | script length    | CompactSize   |
/// | script           | variable      |
/// | sequence         | 4 bytes (LE)  |
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TxIn {
    /// The output being spent.
    pub previous_out_point: OutPoint,

    /// Unlocking script. Empty until the input is signed.
    pub script: Script,

    pub sequence: u32,
}

impl TxIn {
    /// Create an unsigned input spending `previous_out_point`.
    pub fn new(previous_out_point: OutPoint) -> Self {
        TxIn {
            previous_out_point,
            script: Script::new(),
            sequence: DEFAULT_SEQUENCE,
        }
    }

    /// Create an input with an explicit script and sequence.
    pub fn with_script(previous_out_point: OutPoint, script: Script, sequence: u32) -> Self {
        TxIn {
            previous_out_point,
            script,
            sequence,
        }
    }

    pub fn serialized_size(&self) -> usize {
        OUTPOINT_SIZE + self.script.serialized_size() + 4
    }

    pub fn write_to(&self, writer: &mut ByteWriter) {
        self.previous_out_point.write_to(writer);
        self.script.write_to(writer);
        writer.write_u32_le(self.sequence);
    }

    /// Decode one input, rejecting scripts longer than `max_script_size`.
    pub fn read_from(
        reader: &mut ByteReader<'_>,
        max_script_size: usize,
    ) -> Result<Self, TransactionError> {
        let previous_out_point = OutPoint::read_from(reader)?;
        let script = Script::read_from_with_limit(reader, max_script_size)
            .map_err(|e| TransactionError::reading_script("input script", e))?;
        let sequence = reader
            .read_u32_le()
            .map_err(|e| TransactionError::reading("input sequence", e))?;
        Ok(TxIn {
            previous_out_point,
            script,
            sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtx_primitives::chainhash::Hash;

    fn sample() -> TxIn {
        TxIn::with_script(
            OutPoint::new(Hash::new([0x11; 32]), 3),
            Script::from_bytes(&[0x51, 0x52]),
            0xfffffffe,
        )
    }

    #[test]
    fn test_new_is_unsigned_and_final() {
        let input = TxIn::new(OutPoint::null());
        assert!(input.script.is_empty());
        assert_eq!(input.sequence, DEFAULT_SEQUENCE);
        assert_eq!(input.serialized_size(), MIN_TX_IN_SIZE);
    }

    #[test]
    fn test_encoding() {
        let input = sample();
        let mut writer = ByteWriter::new();
        input.write_to(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), input.serialized_size());
        assert_eq!(&bytes[32..36], &[3, 0, 0, 0]);
        assert_eq!(&bytes[36..39], &[0x02, 0x51, 0x52]);
        assert_eq!(&bytes[39..], &[0xfe, 0xff, 0xff, 0xff]);

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(TxIn::read_from(&mut reader, usize::MAX).unwrap(), input);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_script_limit() {
        let mut writer = ByteWriter::new();
        sample().write_to(&mut writer);
        let bytes = writer.into_bytes();

        let mut reader = ByteReader::new(&bytes);
        match TxIn::read_from(&mut reader, 1) {
            Err(TransactionError::LimitExceeded { value, limit, .. }) => {
                assert_eq!((value, limit), (2, 1));
            }
            other => panic!("expected LimitExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_sequence_is_truncated() {
        let mut writer = ByteWriter::new();
        sample().write_to(&mut writer);
        let bytes = writer.into_bytes();

        let mut reader = ByteReader::new(&bytes[..bytes.len() - 2]);
        match TxIn::read_from(&mut reader, usize::MAX) {
            Err(TransactionError::TruncatedInput { context, needed, remaining }) => {
                assert_eq!(context, "input sequence");
                assert_eq!((needed, remaining), (4, 2));
            }
            other => panic!("expected TruncatedInput, got {:?}", other),
        }
    }
}
