//! Session lifecycle: state machine, event dispatch, and keepalive.
//!
//! One `Session` owns one logical WebSocket conversation bound to one
//! subprotocol name. The transport layer delivers decoded events through a
//! single ordered stream per session; keepalive timer ticks are serialized
//! into that same stream by the driver, so the state machine itself is
//! free of locks and never races with its own callbacks.
//!
//! ## Lifecycle
//!
//! 1. **Connecting** - created, waiting for the transport's connect notification
//! 2. **Active** - the only state in which message and probe events are accepted
//! 3. **Disconnecting** - disconnect hook running, registry entry already removed
//! 4. **Closed** - terminal; the disconnect reason is recorded

mod event;
mod id;
mod keepalive;
mod state;

#[allow(clippy::module_inception)]
mod session;

pub use event::SessionEvent;
pub use id::{Endpoints, SessionId};
pub use keepalive::{KeepaliveMonitor, ProbeAction};
pub use session::{Session, SessionContext};
pub use state::{DisconnectReason, SessionState};
