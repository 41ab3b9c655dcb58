//! Hash functions used by the ledger format.
//!
//! SHA-256 and its doubled form identify transactions and produce signature
//! digests; RIPEMD-160 over SHA-256 (Hash160) is what P2PKH scripts commit to.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256(SHA-256(data)).
///
/// This is the hash-of-hash used for transaction IDs and for the final step
/// of the signature hash algorithm.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute the RIPEMD-160 digest of `data`.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute RIPEMD-160(SHA-256(data)), the public key hash of P2PKH scripts.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}
