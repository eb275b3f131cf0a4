// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound hub messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message pushed by the hub, forwarded to subscribers verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Client method the hub is calling (e.g. `HandleMessageFromServer`).
    pub method: String,
    /// Opaque payload; the supervisor never inspects it.
    pub payload: Value,
}

impl InboundMessage {
    /// Creates an inbound message.
    pub fn new(method: impl Into<String>, payload: Value) -> Self {
        InboundMessage {
            method: method.into(),
            payload,
        }
    }

    /// Returns the payload as text when it is a JSON string.
    pub fn as_text(&self) -> Option<&str> {
        self.payload.as_str()
    }
}
