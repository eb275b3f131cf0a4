// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-interval reconnection policy.
//!
//! The policy samples the accepted state stream: entering `Disconnected`
//! arms a single timer, and any transition away from `Disconnected` before it
//! fires cancels it. Only the state seen at the sampling boundary matters, so
//! flapping between observations is coalesced into at most one `start`.
//!
//! There is no backoff growth and no attempt ceiling; the policy retries at
//! the same interval for as long as the supervisor lives.

use std::time::Duration;

use hl_core::{ConnectionState, StateChange};
use tokio::time::Instant;

/// Default delay between a disconnect and the next `start`.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(10);

/// Debounced single-timer reconnection policy.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    interval: Duration,
    deadline: Option<Instant>,
}

impl ReconnectPolicy {
    /// Creates a policy with no pending timer.
    pub fn new(interval: Duration) -> Self {
        ReconnectPolicy {
            interval,
            deadline: None,
        }
    }

    /// Delay between a `Disconnected` observation and the retry.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the pending timer fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if a retry is scheduled.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Observes the current state.
    ///
    /// `Disconnected` (re)starts the timer from `now`; any other state cancels
    /// it. The initial state is observed the same way as later ones.
    pub fn observe(&mut self, state: ConnectionState, now: Instant) {
        self.deadline = match state {
            ConnectionState::Disconnected => Some(now + self.interval),
            _ => None,
        };
    }

    /// Observes an accepted transition.
    pub fn observe_change(&mut self, change: &StateChange, now: Instant) {
        self.observe(change.next(), now);
    }

    /// Drops the pending timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Consumes the timer if it is due at `now`.
    ///
    /// Returns true exactly once per armed timer.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_INTERVAL)
    }
}

#[cfg(test)]
#[path = "reconnect_tests.rs"]
mod tests;
