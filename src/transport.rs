//! The send seam between the engine and the excluded frame layer.

use crate::message::Message;

/// Outbound primitives provided by the transport, consumed by sessions and
/// subprotocol implementations.
///
/// All sends are non-blocking handoffs: the transport queues the payload
/// for framing and transmission. A return of `false` means the peer is
/// gone and the payload was dropped, never an error, since a session that
/// disconnects mid-send simply does not receive it.
pub trait Transport: Send + Sync {
    /// Hand off a complete message for delivery to this session's peer.
    fn send_message(&self, message: Message) -> bool;

    /// Hand off a liveness probe.
    fn send_ping(&self) -> bool;
}
