//! secp256k1 private key.
//!
//! Wraps a k256 signing key and adds the raw/hex/WIF encodings wallets hand
//! to this crate. Signing is deterministic (RFC6979) and low-S.

use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::hash::sha256d;
use crate::PrimitivesError;

/// Length of a serialized private key in bytes.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Mainnet WIF prefix byte.
pub const MAINNET_WIF_PREFIX: u8 = 0x80;

/// Testnet WIF prefix byte.
pub const TESTNET_WIF_PREFIX: u8 = 0xef;

/// Flag byte appended to a WIF payload when the public key is compressed.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key from the OS random number generator.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the scalar is non-zero and below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: PRIVATE_KEY_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let inner = SigningKey::from_slice(bytes)
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a private key from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Decode a Base58Check WIF string, compressed or uncompressed, for any
    /// network prefix.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` on success, or an error if the length, compression
    /// flag or checksum is wrong.
    pub fn from_wif(wif: &str) -> Result<Self, PrimitivesError> {
        let decoded = bs58::decode(wif)
            .into_vec()
            .map_err(|e| PrimitivesError::InvalidWif(e.to_string()))?;

        // prefix(1) + key(32) [+ compress flag(1)] + checksum(4)
        let payload_len = match decoded.len() {
            38 if decoded[33] == COMPRESS_MAGIC => 34,
            38 => {
                return Err(PrimitivesError::InvalidWif(
                    "malformed private key: invalid compression flag".to_string(),
                ))
            }
            37 => 33,
            n => {
                return Err(PrimitivesError::InvalidWif(format!(
                    "malformed private key: invalid length {}",
                    n
                )))
            }
        };

        let (payload, checksum) = decoded.split_at(payload_len);
        if sha256d(payload)[..4] != checksum[..] {
            return Err(PrimitivesError::ChecksumMismatch);
        }

        Self::from_bytes(&payload[1..1 + PRIVATE_KEY_BYTES_LEN])
    }

    /// Encode as a compressed-key WIF string with the given network prefix.
    pub fn to_wif(&self, prefix: u8) -> String {
        let mut payload = Vec::with_capacity(1 + PRIVATE_KEY_BYTES_LEN + 1 + 4);
        payload.push(prefix);
        payload.extend_from_slice(&self.to_bytes());
        payload.push(COMPRESS_MAGIC);

        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);
        bs58::encode(payload).into_string()
    }

    /// Serialize as a 32-byte big-endian scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes().into()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The public key for this private key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a 32-byte digest. See [`Signature::sign`].
    pub fn sign(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the scalar.
        write!(f, "PrivateKey(pub={})", self.pub_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_WIF: &str = "L4rK1yDtCWekvXuE6oXD9jCYfFNV2cWRpVuPLBcCU2z8TrisoyY1";

    #[test]
    fn test_from_wif_fixture() {
        let key = PrivateKey::from_wif(FIXTURE_WIF).unwrap();
        // The fixture key is SHA-256 of the empty string.
        assert_eq!(
            key.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            key.pub_key().to_hex(),
            "03a34b99f22c790c4e36b2b3c2c35a36db06226e41c692fc82b8b56ac1c540c5bd"
        );
        assert_eq!(key.to_wif(MAINNET_WIF_PREFIX), FIXTURE_WIF);
    }

    #[test]
    fn test_serialization_roundtrips() {
        let pk = PrivateKey::new();

        assert_eq!(PrivateKey::from_bytes(&pk.to_bytes()).unwrap(), pk);
        assert_eq!(PrivateKey::from_hex(&pk.to_hex()).unwrap(), pk);
        assert_eq!(PrivateKey::from_wif(&pk.to_wif(TESTNET_WIF_PREFIX)).unwrap(), pk);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(PrivateKey::from_hex("").is_err());
        assert!(PrivateKey::from_hex(FIXTURE_WIF).is_err());
        assert!(PrivateKey::from_bytes(&[0u8; 32]).is_err());
        assert!(matches!(
            PrivateKey::from_bytes(&[1u8; 31]),
            Err(PrimitivesError::InvalidKeyLength { expected: 32, got: 31 })
        ));

        // Truncated and corrupted WIF strings.
        assert!(PrivateKey::from_wif(&FIXTURE_WIF[..FIXTURE_WIF.len() - 1]).is_err());
        assert!(PrivateKey::from_wif("L4rK1yDtCWekvXuE6oXD9jCYfFNV2cWRpVuPLBcCU2z8TrisoyY2").is_err());
    }

    #[test]
    fn test_debug_hides_scalar() {
        let key = PrivateKey::from_wif(FIXTURE_WIF).unwrap();
        let printed = format!("{:?}", key);
        assert!(!printed.contains(&key.to_hex()));
    }
}
