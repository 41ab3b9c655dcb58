//! ECDSA signature with strict DER parsing and RFC6979 signing.
//!
//! Signatures are always produced in low-S form. Verification accepts both
//! low-S and high-S inputs by normalizing S before handing the signature to
//! k256, which only accepts the lower half.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa;
use k256::elliptic_curve::PrimeField;
use k256::Scalar;

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// Length of a signature digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// secp256k1 group order N, big-endian.
const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// N / 2, big-endian.
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// DER sequence tag.
const DER_SEQUENCE: u8 = 0x30;

/// DER integer tag.
const DER_INTEGER: u8 = 0x02;

/// Smallest well-formed DER signature: two one-byte integers.
const MIN_DER_LEN: usize = 8;

/// An ECDSA signature as a pair of 32-byte big-endian scalars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Whether S lies in the lower half of the group order.
    pub fn is_low_s(&self) -> bool {
        self.s <= HALF_ORDER
    }

    /// Parse a DER-encoded signature.
    ///
    /// Layout: `0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>`. Bytes past
    /// the declared sequence length are ignored. R and S must be non-zero,
    /// fit in 32 bytes once leading zero padding is stripped, and be below
    /// the group order.
    ///
    /// # Arguments
    /// * `bytes` - DER-encoded signature bytes, without a sighash byte.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or `InvalidSignature` describing the
    /// first malformation found.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() < MIN_DER_LEN {
            return Err(malformed("too short"));
        }
        if bytes[0] != DER_SEQUENCE {
            return Err(malformed("no header magic"));
        }
        let seq_len = bytes[1] as usize;
        if seq_len + 2 > bytes.len() || seq_len + 2 < MIN_DER_LEN {
            return Err(malformed("bad length"));
        }

        let body = &bytes[2..seq_len + 2];
        let (r_bytes, rest) = read_der_integer(body, "R")?;
        let (s_bytes, _) = read_der_integer(rest, "S")?;

        let r = scalar_bytes(r_bytes, "R")?;
        let s = scalar_bytes(s_bytes, "S")?;
        Ok(Signature { r, s })
    }

    /// Serialize in DER form, normalizing S to the lower half first.
    pub fn to_der(&self) -> Vec<u8> {
        let s = low_s(&self.s);
        let rb = der_integer_bytes(&self.r);
        let sb = der_integer_bytes(&s);

        let body_len = 4 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(body_len + 2);
        out.push(DER_SEQUENCE);
        out.push(body_len as u8);
        out.push(DER_INTEGER);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(DER_INTEGER);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// Sign a 32-byte digest with RFC6979 deterministic nonces.
    ///
    /// # Returns
    /// A low-S signature, or `InvalidSignature` if the digest is not 32 bytes.
    pub fn sign(hash: &[u8], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        if hash.len() != DIGEST_LEN {
            return Err(PrimitivesError::InvalidSignature(format!(
                "digest must be {} bytes, got {}",
                DIGEST_LEN,
                hash.len()
            )));
        }
        let (sig, _recovery_id) = priv_key
            .signing_key()
            .sign_prehash_recoverable(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let (r_bytes, s_bytes) = sig.split_bytes();
        let r: [u8; 32] = r_bytes.into();
        let s: [u8; 32] = s_bytes.into();
        Ok(Signature { r, s: low_s(&s) })
    }

    /// Verify this signature over the 32-byte digest `hash`.
    ///
    /// High-S signatures are accepted. Returns `false` for a digest of the
    /// wrong length or for scalars k256 refuses.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        if hash.len() != DIGEST_LEN {
            return false;
        }
        let sig = match ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(low_s(&self.s)),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        pub_key.verifying_key().verify_prehash(hash, &sig).is_ok()
    }
}

fn malformed(reason: &str) -> PrimitivesError {
    PrimitivesError::InvalidSignature(format!("malformed signature: {}", reason))
}

/// Read one `0x02 <len> <bytes>` element from the front of `data`.
fn read_der_integer<'a>(
    data: &'a [u8],
    name: &str,
) -> Result<(&'a [u8], &'a [u8]), PrimitivesError> {
    match data {
        [DER_INTEGER, len, rest @ ..] => {
            let len = *len as usize;
            if len == 0 || len > rest.len() {
                return Err(malformed(&format!("bogus {} length", name)));
            }
            Ok(rest.split_at(len))
        }
        [_, ..] => Err(malformed(&format!("no {} integer marker", name))),
        [] => Err(malformed(&format!("missing {}", name))),
    }
}

/// Left-pad a DER integer to 32 bytes and range-check it against N.
fn scalar_bytes(bytes: &[u8], name: &str) -> Result<[u8; 32], PrimitivesError> {
    let first_non_zero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let trimmed = &bytes[first_non_zero..];
    if trimmed.is_empty() {
        return Err(PrimitivesError::InvalidSignature(format!(
            "signature {} is zero",
            name
        )));
    }
    if trimmed.len() > 32 {
        return Err(PrimitivesError::InvalidSignature(format!(
            "signature {} is wider than 32 bytes",
            name
        )));
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    if out >= CURVE_ORDER {
        return Err(PrimitivesError::InvalidSignature(format!(
            "signature {} is >= curve order",
            name
        )));
    }
    Ok(out)
}

/// Minimal big-endian DER integer: leading zeros stripped, then a 0x00 pad
/// if the high bit is set.
fn der_integer_bytes(val: &[u8; 32]) -> Vec<u8> {
    let start = val.iter().position(|&b| b != 0).unwrap_or(31);
    let trimmed = &val[start..];
    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}

/// Map S to N - S when it is in the upper half. Out-of-range values are
/// returned unchanged.
fn low_s(s: &[u8; 32]) -> [u8; 32] {
    if *s <= HALF_ORDER {
        return *s;
    }
    let scalar: Option<Scalar> = Scalar::from_repr((*s).into()).into();
    match scalar {
        Some(scalar) => (-scalar).to_bytes().into(),
        None => *s,
    }
}
