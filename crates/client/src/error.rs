// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types surfaced to callers of the supervisor.
//!
//! Start failures and unexpected drops never reach callers: the supervisor
//! logs them and recovers through the reconnection policy.

use hl_core::ConnectionState;
use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// All possible errors returned by hublink operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not connected to hub (currently {state})")]
    NotConnected { state: ConnectionState },

    #[error("supervisor has been disposed")]
    Disposed,

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for hublink operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
