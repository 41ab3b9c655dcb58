//! sigtx - Script byte sequences.
//!
//! Provides the `Script` type, the opcode constants this workspace needs,
//! op parsing, sub-script extraction for signature hashing, and the
//! length-prefixed wire form used inside transactions.

pub mod chunk;
pub mod opcodes;
pub mod script;

mod error;
pub use chunk::{Ops, ScriptChunk};
pub use error::ScriptError;
pub use script::Script;
