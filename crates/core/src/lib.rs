// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! hl-core: Shared data model for the hublink connection supervisor.
//!
//! This crate provides the connection states, transition records, inbound
//! message values and hub wire frames used by the hublink client and any
//! alternative front end built on top of it.

pub mod error;
pub mod message;
pub mod protocol;
pub mod state;

pub use error::{Error, Result};
pub use message::InboundMessage;
pub use protocol::{ClientFrame, HubFrame};
pub use state::{ConnectionState, StateChange};
