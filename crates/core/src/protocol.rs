// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON frames exchanged with the hub over WebSocket.
//!
//! The protocol is small:
//! - Client invokes hub methods with positional arguments
//! - Hub pushes method calls to the client and reports errors

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::message::InboundMessage;

/// Frames sent from client to hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Invoke a hub method.
    Invoke {
        /// Hub method name (e.g. `HandleMessageFromCaller`).
        method: String,
        /// Positional arguments.
        #[serde(default)]
        args: Vec<Value>,
    },
}

/// Frames sent from hub to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubFrame {
    /// The hub calls a client method.
    Message {
        /// Client method name.
        method: String,
        /// Opaque payload.
        #[serde(default)]
        payload: Value,
    },

    /// Error reported by the hub.
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientFrame {
    /// Creates an Invoke frame.
    pub fn invoke(method: impl Into<String>, args: Vec<Value>) -> Self {
        ClientFrame::Invoke {
            method: method.into(),
            args,
        }
    }

    /// Serializes the frame to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes the frame from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl HubFrame {
    /// Creates a Message frame.
    pub fn message(method: impl Into<String>, payload: Value) -> Self {
        HubFrame::Message {
            method: method.into(),
            payload,
        }
    }

    /// Creates an Error frame.
    pub fn error(message: impl Into<String>) -> Self {
        HubFrame::Error {
            message: message.into(),
        }
    }

    /// Serializes the frame to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes the frame from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Converts the frame into an inbound message.
    ///
    /// Hub errors have no client method to dispatch to and are returned as
    /// [`Error::Hub`].
    pub fn into_message(self) -> Result<InboundMessage> {
        match self {
            HubFrame::Message { method, payload } => {
                if method.is_empty() {
                    return Err(Error::InvalidFrame("empty method name".into()));
                }
                Ok(InboundMessage::new(method, payload))
            }
            HubFrame::Error { message } => Err(Error::Hub(message)),
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
