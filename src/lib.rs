//! # subws - WebSocket Subprotocol Session Engine
//!
//! `subws` owns the logical conversation that begins once an HTTP
//! connection has been upgraded to WebSocket and its frames have been
//! decoded: fragment reassembly, ping/pong liveness, broadcast fan-out to
//! sibling sessions, and orderly or abrupt termination including
//! process-signal delivery.
//!
//! ## Features
//!
//! - **Single ordered event stream per session** with a lock-free state machine
//! - **Keepalive liveness** with a configurable probe interval and threshold
//! - **Broadcast fan-out** keyed by subprotocol name, snapshot-safe under churn
//! - **Pluggable subprotocols** behind an eight-hook trait with an explicit
//!   name registry ("echo" ships as the reference implementation)
//! - **Async-first design** with a runtime-free core
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use subws::{BroadcastRegistry, ChannelTransport, Config, Echo, Session, SubProtocolRegistry};
//!
//! let mut protocols = SubProtocolRegistry::new();
//! Echo::register(&mut protocols);
//!
//! let (implementation, keepalive) = protocols.instantiate("echo")?;
//! let config = Config::new().with_keepalive(keepalive);
//! let (transport, outbound) = ChannelTransport::new();
//! let session = Session::new("echo", implementation, &config, transport, registry, endpoints);
//! let (handle, join) = session.spawn();
//! handle.connected();
//! ```

pub mod broadcast;
pub mod config;
pub mod error;
pub mod message;
pub mod protocol;
pub mod session;
pub mod subprotocol;
pub mod transport;

#[cfg(feature = "async-tokio")]
pub mod runtime;

pub use broadcast::BroadcastRegistry;
pub use config::{Config, KeepaliveConfig, Limits};
pub use error::{Error, Result};
pub use message::Message;
pub use protocol::{MessageAssembler, OpCode};
pub use session::{
    DisconnectReason, Endpoints, Session, SessionContext, SessionEvent, SessionId, SessionState,
};
pub use subprotocol::{Echo, SubProtocol, SubProtocolRegistry};
pub use transport::Transport;

#[cfg(feature = "async-tokio")]
pub use runtime::{ChannelTransport, Outbound, SessionHandle};
