//! Pay-to-Public-Key-Hash template.
//!
//! Locking scripts are `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY
//! OP_CHECKSIG`; unlocking scripts are `<sig||hashtype> <pubkey>`.

use sigtx_primitives::ec::{PrivateKey, PublicKey};
use sigtx_script::opcodes::*;
use sigtx_script::script::P2PKH_SCRIPT_LEN;
use sigtx_script::Script;

use crate::sighash::{signature_hash, SigHashType};
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Tx;
use crate::TransactionError;

/// P2PKH locking script for a 20-byte public key hash.
pub fn lock(public_key_hash: &[u8; 20]) -> Script {
    let mut bytes = Vec::with_capacity(P2PKH_SCRIPT_LEN);
    bytes.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
    bytes.extend_from_slice(public_key_hash);
    bytes.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    Script::from(bytes)
}

/// P2PKH locking script paying to `public_key` in compressed form.
pub fn lock_public_key(public_key: &PublicKey) -> Script {
    lock(&public_key.hash160())
}

/// Create a P2PKH unlocker. `sighash_type` defaults to `ALL`.
pub fn unlock(private_key: PrivateKey, sighash_type: Option<SigHashType>) -> P2PKH {
    P2PKH {
        private_key,
        sighash_type: sighash_type.unwrap_or_default(),
    }
}

/// P2PKH signing template holding a private key and hash type.
pub struct P2PKH {
    private_key: PrivateKey,
    sighash_type: SigHashType,
}

impl P2PKH {
    pub fn sighash_type(&self) -> SigHashType {
        self.sighash_type
    }
}

impl UnlockingScriptTemplate for P2PKH {
    /// Sign with RFC6979 ECDSA and build `<DER sig || hashtype> <compressed pubkey>`.
    ///
    /// Fails with `SigningError` if `prev_locking_script` is not a P2PKH
    /// script for this key, or if the hash type does not fit in one byte.
    fn sign(
        &self,
        tx: &Tx,
        input_index: usize,
        prev_locking_script: &Script,
    ) -> Result<Script, TransactionError> {
        let hash_type_byte = u8::try_from(self.sighash_type.value()).map_err(|_| {
            TransactionError::SigningError(format!(
                "hash type {:#x} does not fit in one byte",
                self.sighash_type.value()
            ))
        })?;

        let public_key = self.private_key.pub_key();
        let expected = prev_locking_script
            .public_key_hash()
            .map_err(|e| TransactionError::SigningError(format!("previous output: {}", e)))?;
        if expected != public_key.hash160() {
            return Err(TransactionError::SigningError(
                "private key does not match previous output".to_string(),
            ));
        }

        let digest = signature_hash(tx, prev_locking_script, self.sighash_type, input_index)?;
        let signature = self.private_key.sign(digest.as_bytes())?;

        let der = signature.to_der();
        let mut sig_buf = Vec::with_capacity(der.len() + 1);
        sig_buf.extend_from_slice(&der);
        sig_buf.push(hash_type_byte);

        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        script.append_push_data(&public_key.to_compressed())?;
        Ok(script)
    }
}
