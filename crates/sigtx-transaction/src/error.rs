use sigtx_primitives::PrimitivesError;
use sigtx_script::ScriptError;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The input ended before a declared field, count or length was satisfied.
    #[error("truncated input reading {context}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        context: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// A signature hash was requested for an input the transaction lacks.
    #[error("input index {index} out of range (tx has {len} inputs)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The signature bytes are not a well-formed DER signature.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// The public key bytes are not a valid SEC1 point.
    #[error("malformed public key: {0}")]
    MalformedPublicKey(String),

    /// A decode limit from `DecodeConfig` was exceeded.
    #[error("{what} of {value} exceeds limit of {limit}")]
    LimitExceeded {
        what: &'static str,
        value: usize,
        limit: usize,
    },

    /// Bytes remained after a complete transaction was decoded.
    #[error("trailing {0} bytes after transaction")]
    TrailingBytes(usize),

    /// A CompactSize count or length used a longer form than its value needs.
    #[error("non-canonical encoding of {context}: value {value}")]
    NonCanonicalEncoding { context: &'static str, value: u64 },

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An underlying script error (forwarded from `sigtx-script`).
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// An underlying primitives error (forwarded from `sigtx-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}

impl TransactionError {
    /// Map a reader failure while decoding `context`.
    pub(crate) fn reading(context: &'static str, err: PrimitivesError) -> Self {
        match err {
            PrimitivesError::UnexpectedEof { needed, remaining } => TransactionError::TruncatedInput {
                context,
                needed,
                remaining,
            },
            PrimitivesError::NonCanonicalVarInt { value, .. } => {
                TransactionError::NonCanonicalEncoding { context, value }
            }
            other => TransactionError::SerializationError(format!("reading {}: {}", context, other)),
        }
    }

    /// Map a length-prefixed script failure while decoding `context`.
    pub(crate) fn reading_script(context: &'static str, err: ScriptError) -> Self {
        match err {
            ScriptError::TruncatedInput { needed, remaining } => TransactionError::TruncatedInput {
                context,
                needed,
                remaining,
            },
            ScriptError::ScriptTooLarge { len, max } => TransactionError::LimitExceeded {
                what: context,
                value: len,
                limit: max,
            },
            ScriptError::Primitives(err) => TransactionError::reading(context, err),
            other => TransactionError::Script(other),
        }
    }

    /// Whether this error means the input was cut short.
    pub fn is_truncated(&self) -> bool {
        matches!(self, TransactionError::TruncatedInput { .. })
    }
}
