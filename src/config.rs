//! Configuration for sessions: keepalive cadence and assembly limits.

use std::time::Duration;

/// Keepalive probe configuration, fixed per subprotocol at session creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepaliveConfig {
    /// Interval between liveness probes.
    ///
    /// Default: 5 seconds
    pub interval: Duration,

    /// Maximum number of unanswered probes before the session is closed
    /// with a keepalive-timeout reason.
    ///
    /// Default: 3
    pub max_flying_probes: u32,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_flying_probes: 3,
        }
    }
}

impl KeepaliveConfig {
    /// Create a keepalive configuration with custom values.
    #[must_use]
    pub const fn new(interval: Duration, max_flying_probes: u32) -> Self {
        Self {
            interval,
            max_flying_probes,
        }
    }
}

/// Resource limits for message assembly.
///
/// The assembler itself imposes no policy; it enforces whatever limits the
/// caller hands it. Violations are reported as message errors, not
/// disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum size of a complete assembled message in bytes.
    ///
    /// Default: 64 MB (64 * 1024 * 1024)
    pub max_message_size: usize,

    /// Maximum number of fragments in a single message.
    ///
    /// Default: 128
    pub max_fragment_count: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_message_size: 64 * 1024 * 1024, // 64 MB
            max_fragment_count: 128,
        }
    }
}

impl Limits {
    /// Create new limits with custom values.
    #[must_use]
    pub const fn new(max_message_size: usize, max_fragment_count: usize) -> Self {
        Self {
            max_message_size,
            max_fragment_count,
        }
    }

    /// Validate that message size is within limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MessageTooLarge`](crate::Error::MessageTooLarge) if `size` exceeds the configured maximum.
    pub const fn check_message_size(&self, size: usize) -> Result<(), crate::Error> {
        if size > self.max_message_size {
            Err(crate::Error::MessageTooLarge {
                size,
                max: self.max_message_size,
            })
        } else {
            Ok(())
        }
    }

    /// Validate that fragment count is within limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyFragments`](crate::Error::TooManyFragments) if `count` exceeds the configured maximum.
    pub const fn check_fragment_count(&self, count: usize) -> Result<(), crate::Error> {
        if count > self.max_fragment_count {
            Err(crate::Error::TooManyFragments {
                count,
                max: self.max_fragment_count,
            })
        } else {
            Ok(())
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Keepalive probe cadence and threshold.
    pub keepalive: KeepaliveConfig,

    /// Assembly resource limits.
    pub limits: Limits,
}

impl Config {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keepalive configuration.
    #[must_use]
    pub const fn with_keepalive(mut self, keepalive: KeepaliveConfig) -> Self {
        self.keepalive = keepalive;
        self
    }

    /// Set custom assembly limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}
