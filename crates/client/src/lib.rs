// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! hublink: self-healing client connection to a message hub.
//!
//! A [`Supervisor`] owns one [`Transport`] session, detects drops and
//! re-establishes the session on a fixed interval, and fans out state
//! changes and inbound messages to subscribers in order.
//!
//! ```text
//! Transport events ──► StateMachine ──► EventBus ──► subscribers
//!                                          │
//!                                          ▼
//!                                   ReconnectPolicy ──► Supervisor::connect
//! ```

pub mod auth;
pub mod bus;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod machine;
pub mod reconnect;
pub mod supervisor;
pub mod transport;

pub use bus::Subscription;
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use hl_core::{ConnectionState, InboundMessage, StateChange};
pub use reconnect::ReconnectPolicy;
pub use supervisor::{Supervisor, SupervisorConfig};
pub use transport::{EventSink, Transport, TransportError, TransportEvent, WebSocketTransport};
