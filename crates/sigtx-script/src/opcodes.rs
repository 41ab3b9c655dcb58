//! Opcode byte values.
//!
//! Only the opcodes this workspace builds, classifies or scans for are
//! named here. Every other byte is treated as a one-byte opcode with no
//! operand.

pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = OP_0;

/// First direct-push opcode; the opcode value is the number of bytes pushed.
pub const OP_DATA_1: u8 = 0x01;
pub const OP_DATA_20: u8 = 0x14;
pub const OP_DATA_33: u8 = 0x21;
pub const OP_DATA_65: u8 = 0x41;
/// Last direct-push opcode.
pub const OP_DATA_75: u8 = 0x4b;

pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;

pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = OP_1;
pub const OP_16: u8 = 0x60;

pub const OP_RETURN: u8 = 0x6a;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;

/// Marks the start of the signed portion of a script.
pub const OP_CODESEPARATOR: u8 = 0xab;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// Whether `op` carries push data (a direct push or one of the PUSHDATA forms).
pub fn is_push_data_op(op: u8) -> bool {
    (OP_DATA_1..=OP_PUSHDATA4).contains(&op)
}
