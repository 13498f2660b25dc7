use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::broadcast::BroadcastRegistry;
use crate::config::Config;
use crate::message::Message;
use crate::protocol::{MessageAssembler, OpCode};
use crate::session::keepalive::{KeepaliveMonitor, ProbeAction};
use crate::session::{DisconnectReason, Endpoints, SessionEvent, SessionId, SessionState};
use crate::subprotocol::SubProtocol;
use crate::transport::Transport;

/// Capabilities handed to subprotocol hooks.
///
/// Everything here is a non-blocking handoff; hooks must not block, and no
/// cross-session locks are held while a hook runs.
pub struct SessionContext {
    id: SessionId,
    subprotocol: String,
    endpoints: Endpoints,
    transport: Arc<dyn Transport>,
    registry: Arc<BroadcastRegistry>,
    pending_close: Option<DisconnectReason>,
}

impl SessionContext {
    /// This session's unique identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The subprotocol name this session is bound to.
    #[must_use]
    pub fn subprotocol(&self) -> &str {
        &self.subprotocol
    }

    /// Local and peer address descriptors.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Hand off a message to this session's own peer.
    ///
    /// Returns `false` if the peer is already gone.
    pub fn send(&self, message: Message) -> bool {
        self.transport.send_message(message)
    }

    /// Hand off a text message to this session's own peer.
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.send(Message::text(text))
    }

    /// Hand off a binary message to this session's own peer.
    pub fn send_binary(&self, data: impl Into<Vec<u8>>) -> bool {
        self.send(Message::binary(data))
    }

    /// Deliver a message to every live session of this subprotocol name,
    /// this session included. Returns the number of accepted deliveries.
    pub fn broadcast(&self, message: Message) -> usize {
        self.registry.broadcast(&self.subprotocol, &message)
    }

    /// Deliver a message to every live session of this subprotocol name
    /// except this one.
    pub fn broadcast_others(&self, message: Message) -> usize {
        self.registry
            .broadcast_except(&self.subprotocol, self.id, &message)
    }

    /// Ask the engine to close this session once the current hook returns.
    ///
    /// A later request overrides an earlier one within the same hook.
    pub fn request_close(&mut self, reason: DisconnectReason) {
        self.pending_close = Some(reason);
    }
}

/// One live WebSocket conversation bound to one subprotocol.
///
/// The session owns its assembler, keepalive monitor, and subprotocol
/// implementation exclusively for its lifetime. Events must be delivered
/// through one ordered stream per session; the state machine holds no
/// locks of its own. A session, once closed, is never reused: a new
/// connection creates a new session.
pub struct Session {
    state: SessionState,
    assembler: MessageAssembler,
    keepalive: KeepaliveMonitor,
    protocol: Box<dyn SubProtocol>,
    ctx: SessionContext,
    disconnect_reason: Option<DisconnectReason>,
}

impl Session {
    /// Create a session in the `Connecting` state.
    ///
    /// The session becomes active (and visible to broadcast) only when the
    /// transport delivers [`SessionEvent::Connected`].
    pub fn new(
        subprotocol: impl Into<String>,
        protocol: Box<dyn SubProtocol>,
        config: &Config,
        transport: Arc<dyn Transport>,
        registry: Arc<BroadcastRegistry>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            state: SessionState::Connecting,
            assembler: MessageAssembler::new(config.limits),
            keepalive: KeepaliveMonitor::new(config.keepalive),
            protocol,
            ctx: SessionContext {
                id: SessionId::new(),
                subprotocol: subprotocol.into(),
                endpoints,
                transport,
                registry,
                pending_close: None,
            },
            disconnect_reason: None,
        }
    }

    /// This session's unique identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.ctx.id
    }

    /// The subprotocol name this session is bound to.
    #[must_use]
    pub fn subprotocol(&self) -> &str {
        &self.ctx.subprotocol
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Local and peer address descriptors.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.ctx.endpoints
    }

    /// Why the session closed, once it has.
    #[must_use]
    pub const fn disconnect_reason(&self) -> Option<DisconnectReason> {
        self.disconnect_reason
    }

    /// Number of liveness probes currently unanswered.
    #[must_use]
    pub fn outstanding_probes(&self) -> u32 {
        self.keepalive.outstanding()
    }

    /// Configured probe interval, for the driver's timer.
    #[must_use]
    pub fn keepalive_interval(&self) -> std::time::Duration {
        self.keepalive.interval()
    }

    /// Dispatch one decoded event from the transport.
    ///
    /// Events delivered while the session is not in a state that accepts
    /// them are discarded, which makes close idempotent.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected => self.handle_connected(),
            // A transport disconnect ends the session from any state,
            // including a handshake that never completed.
            SessionEvent::PeerClosed => self.disconnect(DisconnectReason::PeerClosed),
            _ if !self.state.is_active() => {
                trace!(
                    session = %self.ctx.id,
                    state = %self.state,
                    event = event.name(),
                    "event discarded"
                );
            }
            SessionEvent::MessageStart(opcode) => self.handle_message_start(opcode),
            SessionEvent::MessageData(fragment) => self.handle_message_data(&fragment),
            SessionEvent::MessageEnd => self.handle_message_end(),
            SessionEvent::MessageError(code) => self.message_error(code),
            SessionEvent::PongReceived => self.handle_pong(),
            SessionEvent::Signal(signal) => self.handle_signal(signal),
        }
    }

    /// Account for one keepalive probe interval elapsing.
    ///
    /// The driver serializes ticks into the same ordered stream as events;
    /// a tick never races an in-progress hook for the same session.
    pub fn handle_tick(&mut self) {
        if !self.state.is_active() {
            return;
        }

        match self.keepalive.on_tick() {
            ProbeAction::SendProbe => {
                trace!(
                    session = %self.ctx.id,
                    outstanding = self.keepalive.outstanding(),
                    "sending liveness probe"
                );
                self.ctx.transport.send_ping();
            }
            ProbeAction::TimedOut => {
                warn!(
                    session = %self.ctx.id,
                    outstanding = self.keepalive.outstanding(),
                    "keepalive probes unanswered"
                );
                self.disconnect(DisconnectReason::KeepaliveTimeout);
            }
        }
    }

    fn handle_connected(&mut self) {
        if self.state != SessionState::Connecting {
            trace!(session = %self.ctx.id, state = %self.state, "duplicate connect discarded");
            return;
        }

        self.state = SessionState::Active;
        self.ctx.registry.register(
            &self.ctx.subprotocol,
            self.ctx.id,
            Arc::clone(&self.ctx.transport),
        );
        info!(
            session = %self.ctx.id,
            subprotocol = %self.ctx.subprotocol,
            peer = %self.ctx.endpoints.peer,
            local = %self.ctx.endpoints.local,
            "session active"
        );

        self.protocol.on_connected(&mut self.ctx);
        self.apply_pending_close();
    }

    fn handle_message_start(&mut self, opcode: OpCode) {
        match self.assembler.begin(opcode) {
            Ok(()) => {
                self.protocol.on_message_start(&mut self.ctx, opcode);
                self.apply_pending_close();
            }
            Err(err) => self.message_error(err.code()),
        }
    }

    fn handle_message_data(&mut self, fragment: &[u8]) {
        match self.assembler.append(fragment) {
            Ok(()) => {
                self.protocol.on_message_data(&mut self.ctx, fragment);
                self.apply_pending_close();
            }
            Err(err) => self.message_error(err.code()),
        }
    }

    fn handle_message_end(&mut self) {
        match self.assembler.end() {
            Ok(message) => {
                self.protocol.on_message_end(&mut self.ctx, &message);
                self.apply_pending_close();
            }
            Err(err) => self.message_error(err.code()),
        }
    }

    fn handle_pong(&mut self) {
        self.keepalive.on_pong();
        self.protocol.on_pong_received(&mut self.ctx);
        self.apply_pending_close();
    }

    fn handle_signal(&mut self, signal: i32) {
        let terminate = self.protocol.on_signal(&mut self.ctx, signal);
        if terminate {
            self.disconnect(DisconnectReason::Signal(signal));
        } else {
            debug!(session = %self.ctx.id, signal, "signal ignored by subprotocol");
            self.apply_pending_close();
        }
    }

    /// A message-level error does not close the session by itself: the
    /// buffer is reset and the implementation decides.
    fn message_error(&mut self, code: u16) {
        warn!(session = %self.ctx.id, code, "message error");
        self.assembler.reset();
        self.protocol.on_message_error(&mut self.ctx, code);
        self.apply_pending_close();
    }

    fn apply_pending_close(&mut self) {
        if let Some(reason) = self.ctx.pending_close.take() {
            self.disconnect(reason);
        }
    }

    fn disconnect(&mut self, reason: DisconnectReason) {
        if matches!(
            self.state,
            SessionState::Disconnecting | SessionState::Closed
        ) {
            return;
        }

        let was_active = self.state.is_active();
        self.state = SessionState::Disconnecting;
        info!(
            session = %self.ctx.id,
            subprotocol = %self.ctx.subprotocol,
            peer = %self.ctx.endpoints.peer,
            %reason,
            "session disconnecting"
        );

        // Leave the registry first: a concurrent broadcast must never
        // target a session past Active.
        self.ctx
            .registry
            .unregister(&self.ctx.subprotocol, self.ctx.id);

        // Assembly state is discarded wholesale, not finished.
        self.assembler.reset();

        // The disconnect hook balances the connect hook; a session that
        // never activated gets neither.
        if was_active {
            self.protocol.on_disconnected(&mut self.ctx);
        }
        self.ctx.pending_close = None;

        self.state = SessionState::Closed;
        self.disconnect_reason = Some(reason);
    }
}
