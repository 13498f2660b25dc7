//! Data-message opcodes as delivered by the frame layer.
//!
//! The engine consumes already-decoded message fragments. Control opcodes
//! (close, ping, pong) never reach it: the frame layer consumes them and
//! surfaces pong and close as session events instead.

use crate::error::{Error, Result};

/// Opcode of a data message.
///
/// Values match the RFC 6455 frame opcodes so the frame layer can pass its
/// decoded opcode byte straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[non_exhaustive]
pub enum OpCode {
    /// Text message (0x1). Payload must be valid UTF-8 once assembled.
    Text = 0x1,

    /// Binary message (0x2). Payload is arbitrary bytes.
    Binary = 0x2,
}

impl OpCode {
    /// Create an `OpCode` from the raw byte value.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOpcode` for anything outside the data
    /// vocabulary, including control opcodes.
    pub const fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x1 => Ok(OpCode::Text),
            0x2 => Ok(OpCode::Binary),
            other => Err(Error::InvalidOpcode(other)),
        }
    }

    /// Convert to the raw byte value.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` for the text opcode.
    #[inline]
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, OpCode::Text)
    }

    /// Get a human-readable name for this opcode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            OpCode::Text => "Text",
            OpCode::Binary => "Binary",
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
