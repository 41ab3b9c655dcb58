//! Signature checking against transaction digests.

use sigtx_primitives::chainhash::Hash;
use sigtx_primitives::ec::{PublicKey, Signature};
use sigtx_script::Script;
use tracing::debug;

use crate::sighash::{signature_hash, SigHashType};
use crate::transaction::Tx;
use crate::TransactionError;

/// Verify a DER signature over `digest` with a SEC1-encoded public key.
///
/// High-S signatures are accepted; they are normalized before
/// verification.
///
/// # Returns
/// `Ok(true)` if the signature is valid, `Ok(false)` if it is well formed
/// but does not verify, `MalformedSignature` if `signature_der` is not
/// strict DER, or `MalformedPublicKey` if `public_key` is not a 33-byte
/// `0x02`/`0x03` or 65-byte `0x04` encoding of a point on the curve.
pub fn check_sig(
    digest: &Hash,
    signature_der: &[u8],
    public_key: &[u8],
) -> Result<bool, TransactionError> {
    let signature = Signature::from_der(signature_der).map_err(|e| {
        debug!(error = %e, "signature parse failed");
        TransactionError::MalformedSignature(e.to_string())
    })?;
    let public_key = PublicKey::from_bytes(public_key).map_err(|e| {
        debug!(error = %e, "public key parse failed");
        TransactionError::MalformedPublicKey(e.to_string())
    })?;
    Ok(public_key.verify(digest.as_bytes(), &signature))
}

/// Checks signatures taken from a script against the transaction they
/// authorize.
pub trait SignatureChecker {
    /// Verify `sig_with_hashtype` (DER signature followed by one hash type
    /// byte) for `public_key`, where `script_code` is the locking script
    /// being satisfied.
    fn check_script_sig(
        &self,
        sig_with_hashtype: &[u8],
        public_key: &[u8],
        script_code: &Script,
    ) -> Result<bool, TransactionError>;
}

/// A [`SignatureChecker`] bound to one input of a transaction.
#[derive(Clone, Copy, Debug)]
pub struct TxSignatureChecker<'a> {
    tx: &'a Tx,
    input_index: usize,
}

impl<'a> TxSignatureChecker<'a> {
    pub fn new(tx: &'a Tx, input_index: usize) -> Self {
        TxSignatureChecker { tx, input_index }
    }

    pub fn input_index(&self) -> usize {
        self.input_index
    }
}

impl SignatureChecker for TxSignatureChecker<'_> {
    fn check_script_sig(
        &self,
        sig_with_hashtype: &[u8],
        public_key: &[u8],
        script_code: &Script,
    ) -> Result<bool, TransactionError> {
        let (hash_type, der) = sig_with_hashtype
            .split_last()
            .ok_or_else(|| TransactionError::MalformedSignature("empty signature".into()))?;
        let sighash_type = SigHashType::from(*hash_type);
        let digest = signature_hash(self.tx, script_code, sighash_type, self.input_index)?;
        check_sig(&digest, der, public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtx_primitives::ec::PrivateKey;

    fn key() -> PrivateKey {
        PrivateKey::from_hex("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855").unwrap()
    }

    #[test]
    fn test_check_sig_accepts_and_rejects() {
        let digest = Hash::new([0x42; 32]);
        let private_key = key();
        let der = private_key.sign(digest.as_bytes()).unwrap().to_der();
        let pubkey = private_key.pub_key().to_compressed();

        assert!(check_sig(&digest, &der, &pubkey).unwrap());
        assert!(!check_sig(&Hash::new([0x43; 32]), &der, &pubkey).unwrap());

        let other = PrivateKey::from_hex(&"01".repeat(32)).unwrap().pub_key();
        assert!(!check_sig(&digest, &der, &other.to_compressed()).unwrap());
    }

    #[test]
    fn test_check_sig_uncompressed_key() {
        let digest = Hash::new([0x07; 32]);
        let private_key = key();
        let der = private_key.sign(digest.as_bytes()).unwrap().to_der();
        assert!(check_sig(&digest, &der, &private_key.pub_key().to_uncompressed()).unwrap());
    }

    #[test]
    fn test_check_sig_malformed_inputs() {
        let digest = Hash::new([0x42; 32]);
        let private_key = key();
        let der = private_key.sign(digest.as_bytes()).unwrap().to_der();
        let pubkey = private_key.pub_key().to_compressed();

        assert!(matches!(
            check_sig(&digest, &der[..der.len() - 1], &pubkey),
            Err(TransactionError::MalformedSignature(_))
        ));
        assert!(matches!(
            check_sig(&digest, &der, &pubkey[..32]),
            Err(TransactionError::MalformedPublicKey(_))
        ));
        // Right length, but neither a compressed nor an uncompressed prefix.
        for prefix in [0x00, 0x04, 0x05, 0x06, 0x07] {
            let mut bad_prefix = pubkey;
            bad_prefix[0] = prefix;
            assert!(
                matches!(
                    check_sig(&digest, &der, &bad_prefix),
                    Err(TransactionError::MalformedPublicKey(_))
                ),
                "prefix 0x{:02x}",
                prefix
            );
        }
    }

    #[test]
    fn test_empty_script_sig_is_malformed() {
        let tx = Tx::new();
        let checker = TxSignatureChecker::new(&tx, 0);
        assert!(matches!(
            checker.check_script_sig(&[], &[], &Script::new()),
            Err(TransactionError::MalformedSignature(_))
        ));
    }
}
