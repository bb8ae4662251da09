//! WebSocket types and configuration

use std::time::Duration;
use thiserror::Error;

/// When and how often to retry a lost connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Consecutive failures tolerated before giving up (0 = never give up)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for the doubled delay
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
        }
    }

    /// Fresh backoff state for this policy
    pub fn backoff(&self) -> Backoff {
        Backoff {
            policy: *self,
            attempts: 0,
            delay: self.initial_delay,
        }
    }
}

/// Exponential backoff state for one connection loop
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: ReconnectPolicy,
    attempts: u32,
    delay: Duration,
}

impl Backoff {
    /// Record a failure. Returns the delay before the next attempt, or `None`
    /// once the policy's attempt budget is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.attempts += 1;
        if self.policy.max_attempts > 0 && self.attempts >= self.policy.max_attempts {
            return None;
        }
        let delay = self.delay;
        self.delay = (self.delay * 2).min(self.policy.max_delay);
        Some(delay)
    }

    /// Forget past failures after a successful connect
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.delay = self.policy.initial_delay;
    }

    /// Consecutive failures so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// WebSocket client configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    pub url: String,
    pub reconnect: ReconnectPolicy,
    /// Keepalive ping period; a missing pong by the next ping drops the link
    pub ping_interval: Duration,
}

impl WsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect: ReconnectPolicy::default(),
            ping_interval: Duration::from_secs(30),
        }
    }

    pub fn reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    pub fn ping_interval(mut self, d: Duration) -> Self {
        self.ping_interval = d;
        self
    }
}

/// Events emitted by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsMessage {
    /// Text frame from the server
    Text(String),
    /// Connection established
    Connected,
    /// Client gave up; no further messages follow
    Disconnected,
    /// Waiting to retry after a failure
    Reconnecting { attempt: u32 },
}

/// WebSocket errors
#[derive(Debug, Clone, Error)]
pub enum WsError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Connection closed by server")]
    ClosedByServer,
    #[error("Maximum reconnection attempts exceeded")]
    MaxReconnectsExceeded,
    #[error("Send failed: {0}")]
    SendFailed(String),
}
