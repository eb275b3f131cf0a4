// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection states and the records describing transitions between them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle phase of the logical connection to the hub.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No session is established and no attempt is running.
    #[default]
    Disconnected,
    /// A `start` attempt is in flight.
    Connecting,
    /// The hub session is established.
    Connected,
    /// The transport is re-establishing a dropped session on its own.
    Reconnecting,
}

impl ConnectionState {
    /// All states, in lifecycle order.
    pub const ALL: [ConnectionState; 4] = [
        ConnectionState::Disconnected,
        ConnectionState::Connecting,
        ConnectionState::Connected,
        ConnectionState::Reconnecting,
    ];

    /// Returns the name used in logs and status lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "Disconnected",
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Connected => "Connected",
            ConnectionState::Reconnecting => "Reconnecting",
        }
    }

    /// Returns true if invocations may be sent in this state.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted connection-state transition.
///
/// Records are created once by the state machine and never mutated; every
/// subscriber receives the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    previous: ConnectionState,
    next: ConnectionState,
    timestamp: DateTime<Utc>,
}

impl StateChange {
    /// Creates a transition record stamped with the current time.
    pub fn new(previous: ConnectionState, next: ConnectionState) -> Self {
        Self::at(previous, next, Utc::now())
    }

    /// Creates a transition record with an explicit timestamp.
    pub fn at(previous: ConnectionState, next: ConnectionState, timestamp: DateTime<Utc>) -> Self {
        StateChange {
            previous,
            next,
            timestamp,
        }
    }

    /// The `Disconnected -> Connecting` record replayed to new subscribers.
    pub fn cold_start() -> Self {
        Self::new(ConnectionState::Disconnected, ConnectionState::Connecting)
    }

    /// State before the transition.
    pub fn previous(&self) -> ConnectionState {
        self.previous
    }

    /// State after the transition.
    pub fn next(&self) -> ConnectionState {
        self.next
    }

    /// When the transition was accepted.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Went from {} to {}", self.previous, self.next)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
