//! Session lifecycle states and disconnect reasons.

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum SessionState {
    /// Session created, transport connect notification not yet delivered.
    #[default]
    Connecting,
    /// Session is live: message, pong, and probe events are accepted.
    Active,
    /// Disconnect sequence in progress; the disconnect hook is running.
    Disconnecting,
    /// Session is fully closed and will never be reused.
    Closed,
}

impl SessionState {
    /// Check if the session accepts message and probe events.
    ///
    /// Returns `true` only for `Active`; events delivered in any other
    /// state are discarded.
    #[must_use]
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, SessionState::Active)
    }

    /// Check if the session has reached its terminal state.
    #[must_use]
    #[inline]
    pub const fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Connecting => write!(f, "Connecting"),
            SessionState::Active => write!(f, "Active"),
            SessionState::Disconnecting => write!(f, "Disconnecting"),
            SessionState::Closed => write!(f, "Closed"),
        }
    }
}

/// Why a session left the active state.
///
/// Surfaced as structured state once the session is `Closed`; the engine
/// never turns a disconnect into a panic or process abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DisconnectReason {
    /// The peer closed the connection or the transport failed.
    PeerClosed,
    /// The probe threshold was exceeded with no acknowledgement.
    KeepaliveTimeout,
    /// The subprotocol implementation requested closure after a protocol
    /// violation.
    ProtocolError,
    /// A process-level signal was delivered and the implementation elected
    /// to terminate.
    Signal(i32),
}

impl std::fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisconnectReason::PeerClosed => write!(f, "peer closed"),
            DisconnectReason::KeepaliveTimeout => write!(f, "keepalive timeout"),
            DisconnectReason::ProtocolError => write!(f, "protocol error"),
            DisconnectReason::Signal(sig) => write!(f, "signal {sig}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SessionState::default();
        assert_eq!(state, SessionState::Connecting);
    }

    #[test]
    fn test_is_active_in_each_state() {
        assert!(!SessionState::Connecting.is_active());
        assert!(SessionState::Active.is_active());
        assert!(!SessionState::Disconnecting.is_active());
        assert!(!SessionState::Closed.is_active());
    }

    #[test]
    fn test_is_closed_in_each_state() {
        assert!(!SessionState::Connecting.is_closed());
        assert!(!SessionState::Active.is_closed());
        assert!(!SessionState::Disconnecting.is_closed());
        assert!(SessionState::Closed.is_closed());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Connecting.to_string(), "Connecting");
        assert_eq!(SessionState::Active.to_string(), "Active");
        assert_eq!(SessionState::Disconnecting.to_string(), "Disconnecting");
        assert_eq!(SessionState::Closed.to_string(), "Closed");
    }

    #[test]
    fn test_disconnect_reason_display() {
        assert_eq!(DisconnectReason::PeerClosed.to_string(), "peer closed");
        assert_eq!(
            DisconnectReason::KeepaliveTimeout.to_string(),
            "keepalive timeout"
        );
        assert_eq!(DisconnectReason::ProtocolError.to_string(), "protocol error");
        assert_eq!(DisconnectReason::Signal(15).to_string(), "signal 15");
    }

    #[test]
    fn test_state_clone_and_copy() {
        let state = SessionState::Active;
        let copied = state;
        assert_eq!(state, copied);
    }
}
