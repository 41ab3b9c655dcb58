//! Chain hash type for transaction identification and signature digests.
//!
//! A `Hash` is 32 raw bytes kept in internal (storage) order. Only the
//! human-readable forms reverse the bytes, matching the convention every
//! block explorer and node RPC uses for transaction IDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Size of a Hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Maximum hex string length accepted by [`Hash::from_hex`].
pub const MAX_HASH_STRING_SIZE: usize = HASH_SIZE * 2;

/// A 32-byte hash used for transaction IDs, outpoint references and
/// signature digests.
///
/// Equality and ordering are byte-wise over the internal order; no byte
/// swapping happens anywhere except in `Display`/`from_hex`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// The all-zero hash, referenced by coinbase outpoints.
    pub const ZERO: Hash = Hash([0u8; HASH_SIZE]);

    /// Create a Hash from bytes in internal order.
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    /// Create a Hash from a byte slice in internal order.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(Hash)` if the slice is 32 bytes, or `InvalidHash` otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; HASH_SIZE] = bytes.try_into().map_err(|_| {
            PrimitivesError::InvalidHash(format!(
                "invalid hash length of {}, want {}",
                bytes.len(),
                HASH_SIZE
            ))
        })?;
        Ok(Hash(arr))
    }

    /// Parse a hash from its display (byte-reversed) hex form.
    ///
    /// Strings shorter than 64 characters are treated as having their
    /// leading zeros stripped, so `"1"` parses to the hash whose first
    /// internal byte is `0x01`. The empty string is the zero hash.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of up to 64 characters.
    ///
    /// # Returns
    /// `Ok(Hash)` on success, or an error for over-long or non-hex input.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() > MAX_HASH_STRING_SIZE {
            return Err(PrimitivesError::InvalidHash(format!(
                "max hash string length is {} characters",
                MAX_HASH_STRING_SIZE
            )));
        }

        let padded = format!("{:0>width$}", hex_str, width = MAX_HASH_STRING_SIZE);
        let mut bytes: [u8; HASH_SIZE] = [0u8; HASH_SIZE];
        hex::decode_to_slice(&padded, &mut bytes)?;
        bytes.reverse();
        Ok(Hash(bytes))
    }

    /// Access the bytes in internal order.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Copy out the bytes in internal order.
    pub fn to_bytes(self) -> [u8; HASH_SIZE] {
        self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_SIZE]
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Byte-reversed lowercase hex.
impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl FromStr for Hash {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute SHA-256d of the input and wrap it as a Hash.
pub fn double_hash_h(data: &[u8]) -> Hash {
    Hash(sha256d(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Genesis block hash in internal byte order.
    const MAIN_NET_GENESIS_HASH: Hash = Hash([
        0x6f, 0xe2, 0x8c, 0x0a, 0xb6, 0xf1, 0xb3, 0x72,
        0xc1, 0xa6, 0xa2, 0x46, 0xae, 0x63, 0xf7, 0x4f,
        0x93, 0x1e, 0x83, 0x65, 0xe1, 0x5a, 0x08, 0x9c,
        0x68, 0xd6, 0x19, 0x00, 0x00, 0x00, 0x00, 0x00,
    ]);

    #[test]
    fn test_display_reverses_bytes() {
        assert_eq!(
            MAIN_NET_GENESIS_HASH.to_string(),
            "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
        );
    }

    #[test]
    fn test_from_hex() {
        let parsed = Hash::from_hex(
            "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f",
        )
        .unwrap();
        assert_eq!(parsed, MAIN_NET_GENESIS_HASH);

        // Leading zeros may be stripped.
        let parsed = Hash::from_hex("19d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f").unwrap();
        assert_eq!(parsed, MAIN_NET_GENESIS_HASH);

        assert_eq!(Hash::from_hex("").unwrap(), Hash::ZERO);

        let one = Hash::from_hex("1").unwrap();
        let mut expected = [0u8; HASH_SIZE];
        expected[0] = 0x01;
        assert_eq!(one.as_bytes(), &expected);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(Hash::from_hex(&"0".repeat(MAX_HASH_STRING_SIZE + 1)).is_err());
        assert!(Hash::from_hex("abcdefg").is_err());
    }

    #[test]
    fn test_from_bytes_length() {
        assert!(Hash::from_bytes(&[0u8; 31]).is_err());
        assert!(Hash::from_bytes(&[0u8; 33]).is_err());
        let h = Hash::from_bytes(MAIN_NET_GENESIS_HASH.as_bytes()).unwrap();
        assert_eq!(h, MAIN_NET_GENESIS_HASH);
    }

    #[test]
    fn test_equality_is_bytewise() {
        let mut other = MAIN_NET_GENESIS_HASH.to_bytes();
        other.reverse();
        assert_ne!(Hash::new(other), MAIN_NET_GENESIS_HASH);
        assert!(Hash::ZERO.is_zero());
        assert!(!MAIN_NET_GENESIS_HASH.is_zero());
    }

    #[test]
    fn test_json_roundtrip() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            hash: Hash,
        }

        let data = Wrapper {
            hash: double_hash_h(b"hello"),
        };
        // sha256d("hello") is 9595c9df...3d50 in internal order.
        assert_eq!(
            data.hash.to_string(),
            "503d8319a48348cdc610a582f7bf754b5833df65038606eb48510790dfc99595"
        );

        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(
            json,
            r#"{"hash":"503d8319a48348cdc610a582f7bf754b5833df65038606eb48510790dfc99595"}"#
        );
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hash, data.hash);
    }
}
