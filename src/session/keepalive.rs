//! Keepalive probe accounting.
//!
//! Pure counter logic; the driver owns the timer and serializes ticks into
//! the session's event stream. No probe-to-acknowledgement correlation is
//! attempted: an acknowledgement is assumed to answer the oldest
//! outstanding probe, so any pong clears the whole backlog.

use std::time::Duration;

use crate::config::KeepaliveConfig;

/// What the session must do on a timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeAction {
    /// Below the threshold: send a liveness probe.
    SendProbe,
    /// Threshold reached with no acknowledgement: close the session.
    TimedOut,
}

/// Tracks outstanding liveness probes for one session.
#[derive(Debug, Clone)]
pub struct KeepaliveMonitor {
    config: KeepaliveConfig,
    flying: u32,
}

impl KeepaliveMonitor {
    pub fn new(config: KeepaliveConfig) -> Self {
        Self { config, flying: 0 }
    }

    /// Account for one probe interval elapsing.
    ///
    /// Probes are sent on ticks `1..=max`; the tick after that reports
    /// `TimedOut`, i.e. closure happens after exactly `max` unanswered
    /// probe intervals. The counter never exceeds the configured maximum.
    pub fn on_tick(&mut self) -> ProbeAction {
        if self.flying >= self.config.max_flying_probes {
            ProbeAction::TimedOut
        } else {
            self.flying += 1;
            ProbeAction::SendProbe
        }
    }

    /// Account for a received acknowledgement.
    ///
    /// Resets the counter from any prior value; a late pong that arrives
    /// before a pending timeout tick cancels the closure.
    pub fn on_pong(&mut self) {
        self.flying = 0;
    }

    /// Number of probes currently unanswered.
    pub fn outstanding(&self) -> u32 {
        self.flying
    }

    /// Configured probe interval.
    pub fn interval(&self) -> Duration {
        self.config.interval
    }
}
