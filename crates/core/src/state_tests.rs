// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

#[parameterized(
    disconnected = { ConnectionState::Disconnected, "Disconnected" },
    connecting = { ConnectionState::Connecting, "Connecting" },
    connected = { ConnectionState::Connected, "Connected" },
    reconnecting = { ConnectionState::Reconnecting, "Reconnecting" },
)]
fn state_display(state: ConnectionState, expected: &str) {
    assert_eq!(state.to_string(), expected);
}

#[test]
fn only_connected_is_connected() {
    let connected: Vec<_> = ConnectionState::ALL
        .into_iter()
        .filter(ConnectionState::is_connected)
        .collect();
    assert_eq!(connected, vec![ConnectionState::Connected]);
}

#[test]
fn default_state_is_disconnected() {
    assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
}

#[test]
fn cold_start_record() {
    let change = StateChange::cold_start();
    assert_eq!(change.previous(), ConnectionState::Disconnected);
    assert_eq!(change.next(), ConnectionState::Connecting);
}

#[test]
fn state_change_display_matches_status_log() {
    let change = StateChange::new(ConnectionState::Connected, ConnectionState::Disconnected);
    assert_eq!(change.to_string(), "Went from Connected to Disconnected");
}

#[test]
fn state_change_keeps_explicit_timestamp() {
    let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    let change = StateChange::at(ConnectionState::Connecting, ConnectionState::Connected, ts);
    assert_eq!(change.timestamp(), ts);
}

#[test]
fn state_serializes_snake_case() {
    let json = serde_json::to_string(&ConnectionState::Reconnecting).unwrap();
    assert_eq!(json, "\"reconnecting\"");
}
