//! Message fan-out to every live session of a subprotocol name.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::message::Message;
use crate::session::SessionId;
use crate::transport::Transport;

/// Registry of live sessions keyed by subprotocol name.
///
/// Sessions register on activation and unregister at the start of their
/// disconnect sequence, so a broadcast can never target a session past
/// `Active`. Fan-out snapshots the recipient set under the lock and sends
/// after releasing it; registration and iteration therefore never deadlock
/// against each other, and a recipient removed mid-broadcast simply misses
/// the pending send.
#[derive(Default)]
pub struct BroadcastRegistry {
    inner: Mutex<HashMap<String, HashMap<SessionId, Arc<dyn Transport>>>>,
}

impl BroadcastRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session under the given subprotocol name.
    pub fn register(&self, name: &str, id: SessionId, transport: Arc<dyn Transport>) {
        let mut inner = self.inner.lock().unwrap();
        inner.entry(name.to_owned()).or_default().insert(id, transport);
        trace!(session = %id, subprotocol = name, "registered for broadcast");
    }

    /// Remove a session. Returns `true` if it was registered.
    pub fn unregister(&self, name: &str, id: SessionId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(sessions) = inner.get_mut(name) else {
            return false;
        };
        let removed = sessions.remove(&id).is_some();
        if sessions.is_empty() {
            inner.remove(name);
        }
        if removed {
            trace!(session = %id, subprotocol = name, "unregistered from broadcast");
        }
        removed
    }

    /// Returns `true` if the session is currently registered.
    pub fn contains(&self, name: &str, id: SessionId) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.get(name).is_some_and(|sessions| sessions.contains_key(&id))
    }

    /// Number of live sessions under the given name.
    pub fn session_count(&self, name: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.get(name).map_or(0, HashMap::len)
    }

    /// Deliver a message to every session registered under `name`.
    ///
    /// Returns the number of accepted deliveries. Delivery order across
    /// recipients is unspecified; each recipient receives the whole
    /// message atomically.
    pub fn broadcast(&self, name: &str, message: &Message) -> usize {
        self.fan_out(name, None, message)
    }

    /// Deliver a message to every session under `name` except `excluded`.
    ///
    /// Self-exclusion policy is left to subprotocol implementations.
    pub fn broadcast_except(&self, name: &str, excluded: SessionId, message: &Message) -> usize {
        self.fan_out(name, Some(excluded), message)
    }

    fn fan_out(&self, name: &str, excluded: Option<SessionId>, message: &Message) -> usize {
        let recipients: Vec<Arc<dyn Transport>> = {
            let inner = self.inner.lock().unwrap();
            match inner.get(name) {
                Some(sessions) => sessions
                    .iter()
                    .filter(|&(id, _)| Some(*id) != excluded)
                    .map(|(_, transport)| Arc::clone(transport))
                    .collect(),
                None => Vec::new(),
            }
        };

        let mut delivered = 0;
        for transport in &recipients {
            if transport.send_message(message.clone()) {
                delivered += 1;
            }
        }

        debug!(
            subprotocol = name,
            recipients = recipients.len(),
            delivered,
            "broadcast"
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct SinkTransport {
        sent: Mutex<Vec<Message>>,
        alive: AtomicBool,
    }

    impl SinkTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                alive: AtomicBool::new(true),
            })
        }

        fn kill(&self) {
            self.alive.store(false, Ordering::SeqCst);
        }

        fn sent(&self) -> Vec<Message> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for SinkTransport {
        fn send_message(&self, message: Message) -> bool {
            if !self.alive.load(Ordering::SeqCst) {
                return false;
            }
            self.sent.lock().unwrap().push(message);
            true
        }

        fn send_ping(&self) -> bool {
            self.alive.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn test_register_and_count() {
        let registry = BroadcastRegistry::new();
        let id = SessionId::new();

        assert_eq!(registry.session_count("echo"), 0);
        registry.register("echo", id, SinkTransport::new());
        assert_eq!(registry.session_count("echo"), 1);
        assert!(registry.contains("echo", id));
    }

    #[test]
    fn test_unregister() {
        let registry = BroadcastRegistry::new();
        let id = SessionId::new();
        registry.register("echo", id, SinkTransport::new());

        assert!(registry.unregister("echo", id));
        assert!(!registry.contains("echo", id));
        assert_eq!(registry.session_count("echo"), 0);

        // Second removal is a no-op.
        assert!(!registry.unregister("echo", id));
    }

    #[test]
    fn test_unregister_unknown_name() {
        let registry = BroadcastRegistry::new();
        assert!(!registry.unregister("nope", SessionId::new()));
    }

    #[test]
    fn test_broadcast_reaches_all_sessions_of_name() {
        let registry = BroadcastRegistry::new();
        let (a, b, c) = (SinkTransport::new(), SinkTransport::new(), SinkTransport::new());

        registry.register("echo", SessionId::new(), a.clone());
        registry.register("echo", SessionId::new(), b.clone());
        registry.register("chat", SessionId::new(), c.clone());

        let delivered = registry.broadcast("echo", &Message::text("hello"));

        assert_eq!(delivered, 2);
        assert_eq!(a.sent(), vec![Message::text("hello")]);
        assert_eq!(b.sent(), vec![Message::text("hello")]);
        assert!(c.sent().is_empty());
    }

    #[test]
    fn test_broadcast_unknown_name_delivers_nothing() {
        let registry = BroadcastRegistry::new();
        assert_eq!(registry.broadcast("ghost", &Message::text("x")), 0);
    }

    #[test]
    fn test_broadcast_except_skips_excluded() {
        let registry = BroadcastRegistry::new();
        let (a, b) = (SinkTransport::new(), SinkTransport::new());
        let id_a = SessionId::new();

        registry.register("echo", id_a, a.clone());
        registry.register("echo", SessionId::new(), b.clone());

        let delivered = registry.broadcast_except("echo", id_a, &Message::text("hi"));

        assert_eq!(delivered, 1);
        assert!(a.sent().is_empty());
        assert_eq!(b.sent(), vec![Message::text("hi")]);
    }

    #[test]
    fn test_dead_recipient_does_not_fail_broadcast() {
        let registry = BroadcastRegistry::new();
        let (alive, dead) = (SinkTransport::new(), SinkTransport::new());
        dead.kill();

        registry.register("echo", SessionId::new(), alive.clone());
        registry.register("echo", SessionId::new(), dead.clone());

        let delivered = registry.broadcast("echo", &Message::text("still here"));

        assert_eq!(delivered, 1);
        assert_eq!(alive.sent(), vec![Message::text("still here")]);
        assert!(dead.sent().is_empty());
    }

    #[test]
    fn test_each_recipient_gets_whole_message() {
        let registry = BroadcastRegistry::new();
        let (a, b) = (SinkTransport::new(), SinkTransport::new());
        registry.register("echo", SessionId::new(), a.clone());
        registry.register("echo", SessionId::new(), b.clone());

        let message = Message::binary(vec![0u8; 4096]);
        registry.broadcast("echo", &message);

        assert_eq!(a.sent(), vec![message.clone()]);
        assert_eq!(b.sent(), vec![message]);
    }
}
