//! Tokio-backed session driver.
//!
//! Serializes the transport's event stream and the keepalive timer into
//! the single ordered stream each session requires. Across sessions,
//! execution is concurrent: each session runs as its own task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::trace;

use bytes::Bytes;

use crate::message::Message;
use crate::protocol::OpCode;
use crate::session::{Session, SessionEvent};
use crate::transport::Transport;

/// Payload queued for the frame layer to encode and transmit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Outbound {
    /// A complete data message.
    Message(Message),
    /// A liveness probe.
    Ping,
}

/// [`Transport`] backed by an unbounded channel to the frame layer.
///
/// Sends never block; they fail only once the receiving half is dropped,
/// which is how a disconnected peer looks to broadcast fan-out.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ChannelTransport {
    /// Create a transport plus the receiver the frame layer drains.
    #[must_use]
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl Transport for ChannelTransport {
    fn send_message(&self, message: Message) -> bool {
        self.tx.send(Outbound::Message(message)).is_ok()
    }

    fn send_ping(&self) -> bool {
        self.tx.send(Outbound::Ping).is_ok()
    }
}

/// Clonable sender of events into one session's ordered stream.
///
/// Held by the frame layer for decoded events and by the process
/// supervisor for signal injection. All methods return `false` once the
/// session's event loop has ended.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Create a handle plus the receiver to hand to [`Session::run`].
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver an arbitrary event.
    pub fn send(&self, event: SessionEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Transport-level connection established.
    pub fn connected(&self) -> bool {
        self.send(SessionEvent::Connected)
    }

    /// A new message begins under the given opcode.
    pub fn message_start(&self, opcode: OpCode) -> bool {
        self.send(SessionEvent::MessageStart(opcode))
    }

    /// One fragment of the in-flight message.
    pub fn message_data(&self, fragment: impl Into<Bytes>) -> bool {
        self.send(SessionEvent::MessageData(fragment.into()))
    }

    /// End-of-message marker.
    pub fn message_end(&self) -> bool {
        self.send(SessionEvent::MessageEnd)
    }

    /// Frame-layer decode error.
    pub fn message_error(&self, code: u16) -> bool {
        self.send(SessionEvent::MessageError(code))
    }

    /// Liveness acknowledgement.
    pub fn pong(&self) -> bool {
        self.send(SessionEvent::PongReceived)
    }

    /// Peer closed or transport failed.
    pub fn peer_closed(&self) -> bool {
        self.send(SessionEvent::PeerClosed)
    }

    /// Process-level signal, injected by the supervisor.
    pub fn signal(&self, signal: i32) -> bool {
        self.send(SessionEvent::Signal(signal))
    }
}

impl Session {
    /// Drive this session until it closes.
    ///
    /// Events from `events` and keepalive ticks are processed strictly one
    /// at a time; a probe tick never races an in-progress message
    /// callback. Closure of the event channel is treated as a peer close.
    /// Returns the closed session so callers can inspect its final state
    /// and disconnect reason.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<SessionEvent>) -> Session {
        let interval = self.keepalive_interval();
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        trace!(session = %self.id(), event = event.name(), "event");
                        self.handle_event(event);
                    }
                    None => self.handle_event(SessionEvent::PeerClosed),
                },
                _ = ticker.tick() => self.handle_tick(),
            }

            if self.state().is_closed() {
                break;
            }
        }

        self
    }

    /// Spawn this session onto the current runtime.
    ///
    /// Returns the handle the frame layer and supervisor feed, and the
    /// join handle resolving to the closed session.
    #[must_use]
    pub fn spawn(self) -> (SessionHandle, tokio::task::JoinHandle<Session>) {
        let (handle, events) = SessionHandle::channel();
        let join = tokio::spawn(self.run(events));
        (handle, join)
    }
}
