// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection state machine.
//!
//! Owns the current [`ConnectionState`] and turns supervisor commands and raw
//! transport notifications into validated [`StateChange`] records.
//!
//! ```text
//! Disconnected  --Start-------->  Connecting
//! Connecting    --Connected---->  Connected
//! Connecting    --Disconnected->  Disconnected
//! Connected     --Disconnected->  Disconnected
//! Connected     --Reconnecting->  Reconnecting
//! Reconnecting  --Connected---->  Connected
//! Reconnecting  --Disconnected->  Disconnected
//! ```
//!
//! Inputs with no edge from the current state are ignored, which absorbs
//! duplicate and out-of-order transport notifications.

use hl_core::{ConnectionState, StateChange};
use tracing::debug;

/// Something that may move the connection to a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// The supervisor issues `start` on the transport.
    Start,
    /// The transport completed its handshake or recovered a session.
    Connected,
    /// The transport is re-establishing a dropped session on its own.
    Reconnecting,
    /// The transport failed to start, timed out, or lost the session.
    Disconnected,
}

/// Validates and applies connection-state transitions.
#[derive(Debug, Default)]
pub struct StateMachine {
    state: ConnectionState,
}

impl StateMachine {
    /// Creates a machine in the initial `Disconnected` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns the state `input` leads to from `from`, if the edge exists.
    pub fn target(from: ConnectionState, input: Input) -> Option<ConnectionState> {
        use ConnectionState as S;

        match (from, input) {
            (S::Disconnected, Input::Start) => Some(S::Connecting),
            (S::Connecting, Input::Connected) => Some(S::Connected),
            (S::Connecting, Input::Disconnected) => Some(S::Disconnected),
            (S::Connected, Input::Disconnected) => Some(S::Disconnected),
            (S::Connected, Input::Reconnecting) => Some(S::Reconnecting),
            (S::Reconnecting, Input::Connected) => Some(S::Connected),
            (S::Reconnecting, Input::Disconnected) => Some(S::Disconnected),
            _ => None,
        }
    }

    /// Applies `input`, returning the accepted transition.
    ///
    /// Returns `None` (and leaves the state untouched) when the input has no
    /// edge from the current state.
    pub fn apply(&mut self, input: Input) -> Option<StateChange> {
        let Some(next) = Self::target(self.state, input) else {
            debug!("ignoring {:?} while {}", input, self.state);
            return None;
        };

        let change = StateChange::new(self.state, next);
        self.state = next;
        Some(change)
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
