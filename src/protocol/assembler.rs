//! Fragment-to-message reassembly.
//!
//! One assembler per session. The frame layer guarantees that fragments of
//! one message arrive in order with no interleaving from other messages on
//! the same session, so the contract here is strictly sequential:
//! `begin(opcode)`, `append(..)*`, `end()`. Anything else is a protocol
//! violation reported to the caller, never silently merged.

use bytes::BytesMut;

use crate::config::Limits;
use crate::error::{Error, Result};
use crate::message::Message;
use crate::protocol::OpCode;

/// Reassembles message fragments into complete messages.
pub struct MessageAssembler {
    buffer: BytesMut,
    opcode: Option<OpCode>,
    fragment_count: usize,
    limits: Limits,
}

impl MessageAssembler {
    pub fn new(limits: Limits) -> Self {
        Self {
            buffer: BytesMut::new(),
            opcode: None,
            fragment_count: 0,
            limits,
        }
    }

    /// Open a new message buffer under the given opcode.
    ///
    /// # Errors
    ///
    /// Returns `Error::MessageInProgress` if a message is already open.
    pub fn begin(&mut self, opcode: OpCode) -> Result<()> {
        if self.opcode.is_some() {
            return Err(Error::MessageInProgress);
        }
        self.opcode = Some(opcode);
        Ok(())
    }

    /// Append a fragment, preserving arrival order.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoMessageInProgress` if no message is open, or a
    /// limit error if the configured bounds are exceeded.
    pub fn append(&mut self, fragment: &[u8]) -> Result<()> {
        if self.opcode.is_none() {
            return Err(Error::NoMessageInProgress);
        }

        self.limits.check_fragment_count(self.fragment_count + 1)?;
        self.limits
            .check_message_size(self.buffer.len() + fragment.len())?;

        self.buffer.extend_from_slice(fragment);
        self.fragment_count += 1;
        Ok(())
    }

    /// Close the open message and yield the assembled whole.
    ///
    /// Clears all buffer state; text payloads are UTF-8 validated here.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoMessageInProgress` if no message is open, or
    /// `Error::InvalidUtf8` for a text message with an invalid payload.
    pub fn end(&mut self) -> Result<Message> {
        let opcode = self.opcode.take().ok_or(Error::NoMessageInProgress)?;
        let payload = self.buffer.split().to_vec();
        self.fragment_count = 0;

        match opcode {
            OpCode::Text => {
                let text = String::from_utf8(payload).map_err(|_| Error::InvalidUtf8)?;
                Ok(Message::Text(text))
            }
            OpCode::Binary => Ok(Message::Binary(payload)),
        }
    }

    /// Returns `true` while a message is open.
    pub fn is_assembling(&self) -> bool {
        self.opcode.is_some()
    }

    /// Opcode of the message being assembled, if any.
    pub fn opcode(&self) -> Option<OpCode> {
        self.opcode
    }

    /// Bytes accumulated so far.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Discard any in-progress assembly state wholesale.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.opcode = None;
        self.fragment_count = 0;
    }
}
