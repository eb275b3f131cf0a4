// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line formatting for the console front end.

use chrono::{DateTime, Local, TimeZone};
use hl_core::{InboundMessage, StateChange};

/// Formats a transition as a status-log line.
///
/// Input is only accepted while connected, so the line says whether typing
/// will reach the hub.
pub fn status_line<Tz: TimeZone>(change: &StateChange, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let at: DateTime<Tz> = change.timestamp().with_timezone(tz);
    let input = if change.next().is_connected() {
        "input enabled"
    } else {
        "input disabled"
    };
    format!("[{}] {} ({})", at.format("%H:%M:%S"), change, input)
}

/// Formats a status-log line in local time.
pub fn local_status_line(change: &StateChange) -> String {
    status_line(change, &Local)
}

/// Formats an inbound message for display.
///
/// Text payloads are shown as-is, anything else as compact JSON.
pub fn message_line(message: &InboundMessage) -> String {
    match message.as_text() {
        Some(text) => format!("< {}", text),
        None => format!("< {}", message.payload),
    }
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
