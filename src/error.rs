//! Error types for the subprotocol session engine.
//!
//! Protocol violations are recoverable: they are surfaced to the subprotocol
//! implementation as message errors and the session stays active. Liveness
//! failures and peer closes end the session and are reported as structured
//! disconnect reasons, never as panics.

use thiserror::Error;

/// Result type alias for session engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A message is already being assembled for this session.
    #[error("Message already in progress")]
    MessageInProgress,

    /// A fragment or end-of-message arrived with no open message.
    #[error("No message in progress")]
    NoMessageInProgress,

    /// Invalid UTF-8 in an assembled text message.
    #[error("Invalid UTF-8 in text message")]
    InvalidUtf8,

    /// Assembled message size exceeds the configured maximum.
    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge {
        /// Actual message size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Too many fragments in a single message.
    #[error("Too many fragments: {count} (max: {max})")]
    TooManyFragments {
        /// Actual fragment count.
        count: usize,
        /// Maximum allowed fragments.
        max: usize,
    },

    /// Opcode value outside the engine's data vocabulary.
    #[error("Invalid opcode: {0:#x}")]
    InvalidOpcode(u8),

    /// No implementation registered under the requested subprotocol name.
    #[error("Unknown subprotocol: {0}")]
    UnknownSubProtocol(String),
}

impl Error {
    /// Wire-style error code delivered through `on_message_error`.
    ///
    /// Follows the RFC 6455 close-code numbering the frame layer uses for
    /// its own decode errors: 1002 protocol violation, 1007 invalid
    /// payload, 1009 message too big.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Error::MessageInProgress | Error::NoMessageInProgress | Error::InvalidOpcode(_) => 1002,
            Error::InvalidUtf8 => 1007,
            Error::MessageTooLarge { .. } | Error::TooManyFragments { .. } => 1009,
            Error::UnknownSubProtocol(_) => 1011,
        }
    }
}
