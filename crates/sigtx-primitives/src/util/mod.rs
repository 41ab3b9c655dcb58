//! Binary encoding helpers for the transaction wire format.
//!
//! Provides the CompactSize variable-length integer (`VarInt`) and the
//! `ByteReader` / `ByteWriter` pair used by every serializable entity.
//! All fixed-width integers are little-endian.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A CompactSize variable-length integer.
///
/// Used for element counts and byte lengths. The encoding uses 1, 3, 5, or 9
/// bytes depending on magnitude:
///
/// | Value range              | Encoding                 |
/// |--------------------------|--------------------------|
/// | `< 0xfd`                 | 1 byte                   |
/// | `< 0x1_0000`             | `0xfd` + u16 LE          |
/// | `< 0x1_0000_0000`        | `0xfe` + u32 LE          |
/// | otherwise                | `0xff` + u64 LE          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from the start of a byte slice.
    ///
    /// # Returns
    /// The decoded value and the number of bytes consumed, `UnexpectedEof`
    /// if the slice is shorter than the encoding, or `NonCanonicalVarInt`
    /// if a shorter form exists.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let mut reader = ByteReader::new(data);
        let value = reader.read_varint()?;
        Ok((value, data.len() - reader.remaining()))
    }

    /// Wire-format byte length of this VarInt: 1, 3, 5, or 9.
    pub fn length(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        }
    }

    /// Encode the VarInt into a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.length()];
        self.put_bytes(&mut buf);
        buf
    }

    /// Write the VarInt into `dst`, which must hold at least `self.length()`
    /// bytes.
    ///
    /// # Returns
    /// The number of bytes written.
    pub fn put_bytes(&self, dst: &mut [u8]) -> usize {
        let v = self.0;
        match self.length() {
            1 => {
                dst[0] = v as u8;
            }
            3 => {
                dst[0] = 0xfd;
                dst[1..3].copy_from_slice(&(v as u16).to_le_bytes());
            }
            5 => {
                dst[0] = 0xfe;
                dst[1..5].copy_from_slice(&(v as u32).to_le_bytes());
            }
            _ => {
                dst[0] = 0xff;
                dst[1..9].copy_from_slice(&v.to_le_bytes());
            }
        }
        self.length()
    }

    /// The underlying integer value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A cursor over an in-memory byte buffer.
///
/// Every read checks the remaining length first and fails with
/// `UnexpectedEof` instead of panicking, so callers can validate a declared
/// length before allocating anything for it.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Returns
    /// A borrowed slice of length `n`, or `UnexpectedEof` if fewer remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(PrimitivesError::UnexpectedEof { needed: n, remaining });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32, PrimitivesError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64_le(&mut self) -> Result<i64, PrimitivesError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Read a CompactSize-encoded VarInt.
    ///
    /// Only the shortest form is accepted: a value that fits a smaller
    /// encoding fails with `NonCanonicalVarInt`, so decoding and re-encoding
    /// always reproduce the input bytes.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let marker = self.read_u8()?;
        let (value, min) = match marker {
            0xff => (self.read_u64_le()?, 0x1_0000_0000),
            0xfe => (self.read_u32_le()? as u64, 0x1_0000),
            0xfd => (self.read_u16_le()? as u64, 0xfd),
            b => return Ok(VarInt(b as u64)),
        };
        if value < min {
            return Err(PrimitivesError::NonCanonicalVarInt { marker, value });
        }
        Ok(VarInt(value))
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Current read offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }
}

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// An append-only byte buffer with little-endian integer writers.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    /// Create a writer with `capacity` bytes pre-allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    pub fn write_u16_le(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_i32_le(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_i64_le(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Append a CompactSize-encoded VarInt.
    pub fn write_varint(&mut self, varint: VarInt) {
        let mut tmp = [0u8; 9];
        let n = varint.put_bytes(&mut tmp);
        self.buf.extend_from_slice(&tmp[..n]);
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_encoding_boundaries() {
        let cases: Vec<(u64, Vec<u8>)> = vec![
            (0, vec![0x00]),
            (1, vec![0x01]),
            (0xfc, vec![0xfc]),
            (0xfd, vec![0xfd, 0xfd, 0x00]),
            (0xffff, vec![0xfd, 0xff, 0xff]),
            (0x1_0000, vec![0xfe, 0x00, 0x00, 0x01, 0x00]),
            (0xffff_ffff, vec![0xfe, 0xff, 0xff, 0xff, 0xff]),
            (0x1_0000_0000, vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]),
            (u64::MAX, vec![0xff; 9]),
        ];

        for (value, expected) in cases {
            let vi = VarInt(value);
            assert_eq!(vi.length(), expected.len(), "length for {}", value);
            assert_eq!(vi.to_bytes(), expected, "encoding for {}", value);

            let (decoded, consumed) = VarInt::from_bytes(&expected).unwrap();
            assert_eq!(decoded, vi, "decoding for {}", value);
            assert_eq!(consumed, expected.len());
        }
    }

    #[test]
    fn test_varint_from_bytes_truncated() {
        assert!(VarInt::from_bytes(&[]).is_err());
        assert!(VarInt::from_bytes(&[0xfd, 0x01]).is_err());
        assert!(VarInt::from_bytes(&[0xfe, 0x01, 0x02, 0x03]).is_err());
        assert!(VarInt::from_bytes(&[0xff, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_varint_rejects_non_minimal_forms() {
        let cases: Vec<(Vec<u8>, u8, u64)> = vec![
            (vec![0xfd, 0x00, 0x00], 0xfd, 0),
            (vec![0xfd, 0xfc, 0x00], 0xfd, 0xfc),
            (vec![0xfe, 0xff, 0xff, 0x00, 0x00], 0xfe, 0xffff),
            (vec![0xfe, 0x01, 0x00, 0x00, 0x00], 0xfe, 1),
            (vec![0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0], 0xff, 0xffff_ffff),
            (vec![0xff, 0, 0, 0, 0, 0, 0, 0, 0], 0xff, 0),
        ];

        for (bytes, expected_marker, expected_value) in cases {
            match VarInt::from_bytes(&bytes) {
                Err(PrimitivesError::NonCanonicalVarInt { marker, value }) => {
                    assert_eq!(marker, expected_marker, "{:02x?}", bytes);
                    assert_eq!(value, expected_value, "{:02x?}", bytes);
                }
                other => panic!("{:02x?}: expected NonCanonicalVarInt, got {:?}", bytes, other),
            }
        }
    }

    #[test]
    fn test_reader_writer_fixed_width() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0x42);
        writer.write_u16_le(0x1234);
        writer.write_u32_le(0xDEAD_BEEF);
        writer.write_i32_le(-2);
        writer.write_u64_le(0x0102_0304_0506_0708);
        writer.write_i64_le(-1);
        writer.write_varint(VarInt(300));
        writer.write_bytes(b"hello");

        let data = writer.into_bytes();
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_i32_le().unwrap(), -2);
        assert_eq!(reader.read_u64_le().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(reader.read_i64_le().unwrap(), -1);
        assert_eq!(reader.read_varint().unwrap(), VarInt(300));
        assert_eq!(reader.read_bytes(5).unwrap(), b"hello");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_eof_reports_sizes() {
        let mut reader = ByteReader::new(&[0x01, 0x02]);
        match reader.read_u32_le() {
            Err(PrimitivesError::UnexpectedEof { needed, remaining }) => {
                assert_eq!(needed, 4);
                assert_eq!(remaining, 2);
            }
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
        // A failed read does not advance the cursor.
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u16_le().unwrap(), 0x0201);
    }

    #[test]
    fn test_read_bytes_huge_length_does_not_panic() {
        let mut reader = ByteReader::new(&[0u8; 8]);
        assert!(reader.read_bytes(usize::MAX).is_err());
    }
}
