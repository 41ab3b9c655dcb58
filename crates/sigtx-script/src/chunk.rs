//! Script op parsing and push-data encoding.
//!
//! A script is a flat byte string, but its meaning is a sequence of ops:
//! each op is one opcode byte, optionally followed by an explicit length
//! and a data payload. [`Ops`] walks those ops without copying, which is
//! what sub-script extraction needs to tell a real `OP_CODESEPARATOR`
//! apart from an `0xab` byte inside pushed data.

use crate::opcodes::*;
use crate::ScriptError;

/// One parsed op, borrowing its payload from the script bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptChunk<'a> {
    /// The opcode byte. For direct pushes this is also the payload length.
    pub op: u8,
    /// The pushed payload, for push-data ops.
    pub data: Option<&'a [u8]>,
    /// Offset of the opcode byte within the script.
    pub offset: usize,
    /// Total encoded length of the op: opcode, length prefix and payload.
    pub len: usize,
}

/// Parse the op starting at `pos`.
///
/// # Arguments
/// * `bytes` - The full script.
/// * `pos` - Offset of the opcode byte; must be below `bytes.len()`.
///
/// # Returns
/// The parsed chunk, or `TruncatedPush` if a length prefix or payload runs
/// past the end of the script.
pub fn read_op(bytes: &[u8], pos: usize) -> Result<ScriptChunk<'_>, ScriptError> {
    let op = bytes[pos];
    let rest = &bytes[pos + 1..];

    let (prefix_len, data_len) = match op {
        OP_DATA_1..=OP_DATA_75 => (0, op as usize),
        OP_PUSHDATA1 => (1, read_le_len(rest, 1, pos)?),
        OP_PUSHDATA2 => (2, read_le_len(rest, 2, pos)?),
        OP_PUSHDATA4 => (4, read_le_len(rest, 4, pos)?),
        _ => {
            return Ok(ScriptChunk {
                op,
                data: None,
                offset: pos,
                len: 1,
            })
        }
    };

    let available = rest.len() - prefix_len;
    if data_len > available {
        return Err(ScriptError::TruncatedPush {
            offset: pos,
            needed: data_len,
            remaining: available,
        });
    }
    let data = &rest[prefix_len..prefix_len + data_len];
    Ok(ScriptChunk {
        op,
        data: Some(data),
        offset: pos,
        len: 1 + prefix_len + data_len,
    })
}

/// Read a `width`-byte little-endian length from the front of `rest`.
fn read_le_len(rest: &[u8], width: usize, offset: usize) -> Result<usize, ScriptError> {
    if rest.len() < width {
        return Err(ScriptError::TruncatedPush {
            offset,
            needed: width,
            remaining: rest.len(),
        });
    }
    let mut buf = [0u8; 8];
    buf[..width].copy_from_slice(&rest[..width]);
    Ok(u64::from_le_bytes(buf) as usize)
}

/// Iterator over the ops of a script.
///
/// Yields `Err` once at the first malformed push and then stops.
#[derive(Clone, Debug)]
pub struct Ops<'a> {
    bytes: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Ops<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Ops {
            bytes,
            pos: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for Ops<'a> {
    type Item = Result<ScriptChunk<'a>, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.bytes.len() {
            return None;
        }
        match read_op(self.bytes, self.pos) {
            Ok(chunk) => {
                self.pos += chunk.len;
                Some(Ok(chunk))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Minimal push prefix for a payload of `data_len` bytes.
///
/// # Returns
/// The opcode and length bytes to emit before the payload, or `DataTooBig`
/// if the length does not fit in a u32.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    let prefix = match data_len {
        0..=0x4b => vec![data_len as u8],
        0x4c..=0xff => vec![OP_PUSHDATA1, data_len as u8],
        0x100..=0xffff => {
            let mut buf = vec![OP_PUSHDATA2];
            buf.extend_from_slice(&(data_len as u16).to_le_bytes());
            buf
        }
        _ => {
            let len = u32::try_from(data_len).map_err(|_| ScriptError::DataTooBig(data_len))?;
            let mut buf = vec![OP_PUSHDATA4];
            buf.extend_from_slice(&len.to_le_bytes());
            buf
        }
    };
    Ok(prefix)
}
