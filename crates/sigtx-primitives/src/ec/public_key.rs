//! secp256k1 public key.
//!
//! Parses SEC1 compressed and uncompressed encodings and verifies ECDSA
//! signatures over 32-byte digests.

use std::fmt;

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::ec::signature::Signature;
use crate::hash::{hash160, sha256d};
use crate::PrimitivesError;

/// Length of a compressed public key in bytes.
pub const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed public key in bytes.
pub const UNCOMPRESSED_LEN: usize = 65;

/// Version byte of a mainnet P2PKH address.
const MAINNET_P2PKH_VERSION: u8 = 0x00;

/// A secp256k1 public key.
#[derive(Clone, Debug)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parse a SEC1-encoded public key.
    ///
    /// Accepts the 33-byte compressed form (`0x02`/`0x03` prefix) and the
    /// 65-byte uncompressed form (`0x04` prefix). Points that are not on the
    /// curve are rejected.
    ///
    /// # Arguments
    /// * `bytes` - SEC1-encoded public key bytes.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or `InvalidPublicKey` otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        match (bytes.len(), bytes.first().copied()) {
            (0, _) => {
                return Err(PrimitivesError::InvalidPublicKey(
                    "pubkey bytes are empty".to_string(),
                ))
            }
            (COMPRESSED_LEN, Some(0x02 | 0x03)) | (UNCOMPRESSED_LEN, Some(0x04)) => {}
            (COMPRESSED_LEN | UNCOMPRESSED_LEN, Some(prefix)) => {
                return Err(PrimitivesError::InvalidPublicKey(format!(
                    "invalid pubkey prefix 0x{:02x} for {} bytes",
                    prefix,
                    bytes.len()
                )))
            }
            (n, _) => {
                return Err(PrimitivesError::InvalidPublicKey(format!(
                    "invalid pubkey length {}",
                    n
                )))
            }
        }
        let inner = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))?;
        Ok(PublicKey { inner })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Compressed SEC1 encoding (33 bytes).
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(self.inner.to_encoded_point(true).as_bytes());
        out
    }

    /// Uncompressed SEC1 encoding (65 bytes).
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out.copy_from_slice(self.inner.to_encoded_point(false).as_bytes());
        out
    }

    /// Hex of the compressed encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// RIPEMD160(SHA256(compressed key)), the hash a P2PKH script locks to.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// Base58Check mainnet P2PKH address of the compressed key.
    pub fn to_address(&self) -> String {
        let mut payload = Vec::with_capacity(25);
        payload.push(MAINNET_P2PKH_VERSION);
        payload.extend_from_slice(&self.hash160());
        let checksum = sha256d(&payload);
        payload.extend_from_slice(&checksum[..4]);
        bs58::encode(payload).into_string()
    }

    /// Verify `sig` over the 32-byte digest `hash`.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }

    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: *vk }
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::PrivateKey;

    const UNCOMPRESSED_OK: &str = "0411db93e1dcdb8a016b49840f8c53bc1eb68a382e97b1482ecad7b148a6909a5c\
                                   b2e0eaddfb84ccf9744464f82e160bfa9b8b64f9d4c03f999b8643f656b412a3";

    #[test]
    fn test_parse_vectors() {
        let cases: Vec<(&str, String, bool)> = vec![
            ("uncompressed ok", UNCOMPRESSED_OK.to_string(), true),
            (
                "uncompressed x changed",
                format!("0415{}", &UNCOMPRESSED_OK[4..]),
                false,
            ),
            (
                "compressed even y",
                "02ce0b14fb842b1ba549fdd675c98075f12e9c510f8ef52bd021a9a1f4809d3b4d".to_string(),
                true,
            ),
            (
                "compressed odd y",
                "032689c7c2dab13309fb143e0e8fe396342521887e976690b6b47f5b2a4b7d448e".to_string(),
                true,
            ),
            (
                "compact prefix",
                "05ce0b14fb842b1ba549fdd675c98075f12e9c510f8ef52bd021a9a1f4809d3b4d".to_string(),
                false,
            ),
            (
                "compressed prefix on uncompressed length",
                format!("02{}", &UNCOMPRESSED_OK[2..]),
                false,
            ),
            (
                "hybrid prefix",
                format!("06{}", &UNCOMPRESSED_OK[2..]),
                false,
            ),
            ("single byte", "05".to_string(), false),
            ("empty", String::new(), false),
        ];

        for (name, key_hex, valid) in cases {
            let result = PublicKey::from_hex(&key_hex);
            assert_eq!(result.is_ok(), valid, "{}: {:?}", name, result.err());
        }
    }

    #[test]
    fn test_compressed_and_uncompressed_agree() {
        let key = PrivateKey::new().pub_key();
        let from_compressed = PublicKey::from_bytes(&key.to_compressed()).unwrap();
        let from_uncompressed = PublicKey::from_bytes(&key.to_uncompressed()).unwrap();
        assert_eq!(from_compressed, key);
        assert_eq!(from_uncompressed, key);
        assert_eq!(key.to_uncompressed()[0], 0x04);
    }

    #[test]
    fn test_hash160_and_address() {
        let key = PublicKey::from_hex(
            "03a34b99f22c790c4e36b2b3c2c35a36db06226e41c692fc82b8b56ac1c540c5bd",
        )
        .unwrap();
        assert_eq!(
            hex::encode(key.hash160()),
            "9a1c78a507689f6f54b847ad1cef1e614ee23f1e"
        );
        assert_eq!(key.to_address(), "1F3sAm6ZtwLAUnj7d38pGFxtP3RVEvtsbV");
        assert_eq!(
            key.to_string(),
            "03a34b99f22c790c4e36b2b3c2c35a36db06226e41c692fc82b8b56ac1c540c5bd"
        );
    }
}
