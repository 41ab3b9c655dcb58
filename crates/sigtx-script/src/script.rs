//! Script type: an owned byte sequence of opcodes and data pushes.
//!
//! Scripts appear as the unlocking script of every input and the locking
//! script of every output. Beyond raw byte access, the operations here are
//! the ones signature hashing and the transaction codec need: sub-script
//! extraction, length-prefixed (de)serialization and the P2PKH helpers.

use std::fmt;

use sigtx_primitives::util::{ByteReader, ByteWriter, VarInt};

use crate::chunk::{push_data_prefix, Ops};
use crate::opcodes::*;
use crate::ScriptError;

/// Length of a P2PKH locking script.
pub const P2PKH_SCRIPT_LEN: usize = 25;

/// A script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Create a script from a hex string such as `"76a914...88ac"`.
    ///
    /// # Returns
    /// The decoded script, or `HexDecode` if the string is not valid hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the parsed ops of this script.
    pub fn ops(&self) -> Ops<'_> {
        Ops::new(&self.0)
    }

    // -----------------------------------------------------------------------
    // Signature coverage
    // -----------------------------------------------------------------------

    /// Offset of the last `OP_CODESEPARATOR` opcode, if any.
    ///
    /// Ops are parsed, so `0xab` bytes inside pushed data do not count. If
    /// a push runs past the end of the script the scan stops there and any
    /// separator seen before it is still reported.
    pub fn last_code_separator(&self) -> Option<usize> {
        let mut last = None;
        for chunk in self.ops() {
            match chunk {
                Ok(chunk) if chunk.op == OP_CODESEPARATOR => last = Some(chunk.offset),
                Ok(_) => {}
                Err(_) => break,
            }
        }
        last
    }

    /// The portion of this script a signature commits to.
    ///
    /// That is every byte after the last `OP_CODESEPARATOR`, with the
    /// separator itself dropped, or the whole script when there is none.
    ///
    /// # Returns
    /// A new script; `self` is left untouched.
    pub fn sub_script(&self) -> Script {
        match self.last_code_separator() {
            Some(offset) => Script(self.0[offset + 1..].to_vec()),
            None => self.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Wire format
    // -----------------------------------------------------------------------

    /// Bytes taken by [`write_to`](Self::write_to): CompactSize length plus body.
    pub fn serialized_size(&self) -> usize {
        VarInt::from(self.0.len()).length() + self.0.len()
    }

    /// Append the CompactSize length followed by the raw bytes.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_varint(VarInt::from(self.0.len()));
        writer.write_bytes(&self.0);
    }

    /// Read a length-prefixed script, bounded only by the input.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, ScriptError> {
        Self::read_from_with_limit(reader, usize::MAX)
    }

    /// Read a length-prefixed script of at most `max_len` bytes.
    ///
    /// The declared length is compared with the bytes actually remaining
    /// before anything is allocated, so a hostile length prefix costs
    /// nothing.
    ///
    /// # Returns
    /// The script, `TruncatedInput` if the reader holds fewer bytes than
    /// declared, or `ScriptTooLarge` if the length exceeds `max_len`.
    pub fn read_from_with_limit(
        reader: &mut ByteReader<'_>,
        max_len: usize,
    ) -> Result<Self, ScriptError> {
        let declared = reader.read_varint().map_err(|e| match e {
            sigtx_primitives::PrimitivesError::UnexpectedEof { needed, remaining } => {
                ScriptError::TruncatedInput { needed, remaining }
            }
            other => ScriptError::Primitives(other),
        })?;
        let remaining = reader.remaining();
        let len = usize::try_from(declared.value()).unwrap_or(usize::MAX);
        if len > remaining {
            return Err(ScriptError::TruncatedInput {
                needed: len,
                remaining,
            });
        }
        if len > max_len {
            return Err(ScriptError::ScriptTooLarge { len, max: max_len });
        }
        let body = reader.read_bytes(len)?;
        Ok(Script(body.to_vec()))
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    /// Whether this is `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn is_p2pkh(&self) -> bool {
        matches!(
            self.0.as_slice(),
            [OP_DUP, OP_HASH160, OP_DATA_20, .., OP_EQUALVERIFY, OP_CHECKSIG]
                if self.0.len() == P2PKH_SCRIPT_LEN
        )
    }

    /// The 20-byte public key hash of a P2PKH script.
    pub fn public_key_hash(&self) -> Result<[u8; 20], ScriptError> {
        if self.0.is_empty() {
            return Err(ScriptError::EmptyScript);
        }
        if !self.is_p2pkh() {
            return Err(ScriptError::NotP2PKH);
        }
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&self.0[3..23]);
        Ok(hash)
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Append `data` with the smallest push prefix that fits it.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append non-push opcodes.
    ///
    /// Push opcodes are rejected because they need a payload; use
    /// [`append_push_data`](Self::append_push_data) for those. Nothing is
    /// appended if any opcode is rejected.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptError> {
        if let Some(&op) = opcodes.iter().find(|&&op| is_push_data_op(op)) {
            return Err(ScriptError::InvalidOpcodeType(op));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
