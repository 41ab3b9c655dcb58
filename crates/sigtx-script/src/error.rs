/// Error type for script parsing, building and (de)serialization.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// A push opcode declares more data than the script holds.
    #[error("push at offset {offset} needs {needed} bytes, {remaining} remaining")]
    TruncatedPush {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// Push data larger than any PUSHDATA form can express.
    #[error("data too big: {0} bytes")]
    DataTooBig(usize),

    /// A push opcode was handed to `append_opcodes`.
    #[error("use append_push_data for push opcode 0x{0:02x}")]
    InvalidOpcodeType(u8),

    #[error("script is empty")]
    EmptyScript,

    #[error("not a P2PKH script")]
    NotP2PKH,

    /// A length-prefixed script declares more bytes than the input holds.
    #[error("script needs {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    /// A length-prefixed script exceeds the configured maximum.
    #[error("script too large: {len} bytes exceeds limit of {max}")]
    ScriptTooLarge { len: usize, max: usize },

    #[error("primitives error: {0}")]
    Primitives(#[from] sigtx_primitives::PrimitivesError),
}
