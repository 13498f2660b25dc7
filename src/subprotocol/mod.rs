//! The pluggable subprotocol contract and its name registry.
//!
//! A subprotocol implementation is the application-level policy layered on
//! top of one session. The engine owns the lifecycle, reassembly, and
//! keepalive mechanics; the implementation reacts to the resulting events
//! and drives sends through the [`SessionContext`] handed to every hook.
//!
//! Implementations are resolved by name through a [`SubProtocolRegistry`]
//! populated by explicit registration calls at process startup.

pub mod echo;

use std::collections::HashMap;

use crate::config::KeepaliveConfig;
use crate::error::{Error, Result};
use crate::message::Message;
use crate::protocol::OpCode;
use crate::session::SessionContext;

pub use echo::Echo;

/// Hooks a subprotocol implementation may react to.
///
/// Every hook has a default no-op body, so implementations only write the
/// reactions they care about. Hooks must not block: all sends available on
/// the context are non-blocking handoffs to the transport.
///
/// Implementations may hold session-scoped state; each session gets a
/// fresh instance from the registered factory, never shared across
/// sessions of the same name.
#[allow(unused_variables)]
pub trait SubProtocol: Send {
    /// The session became active. Sends are possible from here on.
    fn on_connected(&mut self, ctx: &mut SessionContext) {}

    /// A new message begins under the given opcode.
    fn on_message_start(&mut self, ctx: &mut SessionContext, opcode: OpCode) {}

    /// One in-order fragment of the in-flight message.
    fn on_message_data(&mut self, ctx: &mut SessionContext, fragment: &[u8]) {}

    /// The message completed; `message` is the assembled whole.
    fn on_message_end(&mut self, ctx: &mut SessionContext, message: &Message) {}

    /// A decoding or assembly error, carrying its error code. The session
    /// stays active unless the implementation requests closure through the
    /// context.
    fn on_message_error(&mut self, ctx: &mut SessionContext, code: u16) {}

    /// A liveness acknowledgement arrived; the probe counter has already
    /// been reset.
    fn on_pong_received(&mut self, ctx: &mut SessionContext) {}

    /// The session is disconnecting; no further sends will be delivered.
    fn on_disconnected(&mut self, ctx: &mut SessionContext) {}

    /// A process-level signal was delivered. Return `true` to terminate
    /// the session. The default terminates, so a session cannot wedge a
    /// shutdown by not deciding.
    fn on_signal(&mut self, ctx: &mut SessionContext, signal: i32) -> bool {
        true
    }
}

/// Factory producing one fresh implementation per session.
pub type SubProtocolFactory = Box<dyn Fn() -> Box<dyn SubProtocol> + Send + Sync>;

struct Registration {
    factory: SubProtocolFactory,
    keepalive: KeepaliveConfig,
}

/// Maps subprotocol names to implementation factories.
///
/// Populated by explicit [`register`](Self::register) calls at startup;
/// the upgrade layer resolves a name with
/// [`instantiate`](Self::instantiate) once negotiation picks one.
#[derive(Default)]
pub struct SubProtocolRegistry {
    entries: HashMap<String, Registration>,
}

impl SubProtocolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name` with the keepalive configuration
    /// every session of this subprotocol will run with.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<F>(&mut self, name: &str, keepalive: KeepaliveConfig, factory: F)
    where
        F: Fn() -> Box<dyn SubProtocol> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.to_owned(),
            Registration {
                factory: Box::new(factory),
                keepalive,
            },
        );
    }

    /// Returns `true` if an implementation is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Pick the first offered candidate that is registered.
    ///
    /// This is the negotiation seam for the upgrade handshake: the peer
    /// lists candidate names (`Sec-WebSocket-Protocol`), the engine picks
    /// the first it can serve.
    #[must_use]
    pub fn select<'a>(&self, offered: &[&'a str]) -> Option<&'a str> {
        offered.iter().copied().find(|name| self.contains(name))
    }

    /// Instantiate a fresh implementation for one session.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSubProtocol` if nothing is registered under
    /// `name`.
    pub fn instantiate(&self, name: &str) -> Result<(Box<dyn SubProtocol>, KeepaliveConfig)> {
        let registration = self
            .entries
            .get(name)
            .ok_or_else(|| Error::UnknownSubProtocol(name.to_owned()))?;
        Ok(((registration.factory)(), registration.keepalive))
    }
}
