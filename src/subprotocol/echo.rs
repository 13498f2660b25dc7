//! The reference "echo" subprotocol: a minimal chat room.
//!
//! Greets every new session with a two-line banner and broadcasts each
//! completed message to every session of its name, the sender included.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::config::KeepaliveConfig;
use crate::message::Message;
use crate::protocol::OpCode;
use crate::session::SessionContext;
use crate::subprotocol::{SubProtocol, SubProtocolRegistry};

/// Name this implementation registers under.
pub const NAME: &str = "echo";

const PING_INTERVAL: Duration = Duration::from_secs(5);
const MAX_FLYING_PINGS: u32 = 3;

/// The echo subprotocol implementation.
#[derive(Debug, Default)]
pub struct Echo;

impl Echo {
    pub fn new() -> Self {
        Self
    }

    /// Keepalive configuration echo sessions run with.
    #[must_use]
    pub const fn keepalive() -> KeepaliveConfig {
        KeepaliveConfig::new(PING_INTERVAL, MAX_FLYING_PINGS)
    }

    /// Register echo in a subprotocol registry under [`NAME`].
    pub fn register(registry: &mut SubProtocolRegistry) {
        registry.register(NAME, Self::keepalive(), || Box::new(Echo::new()));
    }
}

impl SubProtocol for Echo {
    fn on_connected(&mut self, ctx: &mut SessionContext) {
        info!(session = %ctx.id(), peer = %ctx.endpoints().peer, "echo connected");

        ctx.send_text("Welcome to SimpleChat");
        ctx.send_text("=====================");
    }

    fn on_message_start(&mut self, ctx: &mut SessionContext, opcode: OpCode) {
        debug!(session = %ctx.id(), %opcode, "message start");
    }

    fn on_message_data(&mut self, ctx: &mut SessionContext, fragment: &[u8]) {
        trace!(session = %ctx.id(), len = fragment.len(), "message fragment");
    }

    fn on_message_end(&mut self, ctx: &mut SessionContext, message: &Message) {
        debug!(session = %ctx.id(), len = message.len(), "message end");

        ctx.broadcast(message.clone());
    }

    fn on_message_error(&mut self, ctx: &mut SessionContext, code: u16) {
        warn!(session = %ctx.id(), code, "message error");
    }

    fn on_pong_received(&mut self, ctx: &mut SessionContext) {
        trace!(session = %ctx.id(), "pong received");
    }

    fn on_disconnected(&mut self, ctx: &mut SessionContext) {
        info!(session = %ctx.id(), peer = %ctx.endpoints().peer, "echo disconnected");
    }

    fn on_signal(&mut self, ctx: &mut SessionContext, signal: i32) -> bool {
        info!(session = %ctx.id(), signal, "echo exiting on signal");
        true
    }
}
