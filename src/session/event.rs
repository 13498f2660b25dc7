//! Decoded events delivered into a session's ordered stream.

use bytes::Bytes;

use crate::protocol::OpCode;

/// One event in a session's ordered stream.
///
/// The transport layer guarantees that events for one session are never
/// concurrently in flight; fragments of one message arrive in order with
/// no interleaving from other messages on the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionEvent {
    /// Transport-level connection established.
    Connected,
    /// A new message begins under the given opcode.
    MessageStart(OpCode),
    /// One fragment of the in-flight message.
    MessageData(Bytes),
    /// End-of-message marker.
    MessageEnd,
    /// The frame layer failed to decode a message; carries its error code.
    MessageError(u16),
    /// Liveness acknowledgement, with no payload correlation.
    PongReceived,
    /// The peer closed the connection or the transport failed.
    PeerClosed,
    /// A process-level signal, injected by the process supervisor.
    Signal(i32),
}

impl SessionEvent {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            SessionEvent::Connected => "Connected",
            SessionEvent::MessageStart(_) => "MessageStart",
            SessionEvent::MessageData(_) => "MessageData",
            SessionEvent::MessageEnd => "MessageEnd",
            SessionEvent::MessageError(_) => "MessageError",
            SessionEvent::PongReceived => "PongReceived",
            SessionEvent::PeerClosed => "PeerClosed",
            SessionEvent::Signal(_) => "Signal",
        }
    }
}
