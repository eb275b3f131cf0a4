// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hl_core::ConnectionState as S;
use yare::parameterized;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn default_interval_is_ten_seconds() {
    let policy = ReconnectPolicy::default();
    assert_eq!(policy.interval(), secs(10));
    assert!(!policy.is_pending());
}

#[test]
fn disconnected_arms_timer() {
    let t0 = Instant::now();
    let mut policy = ReconnectPolicy::default();
    policy.observe(S::Disconnected, t0);
    assert_eq!(policy.deadline(), Some(t0 + secs(10)));
}

#[parameterized(
    connecting = { S::Connecting },
    connected = { S::Connected },
    reconnecting = { S::Reconnecting },
)]
fn leaving_disconnected_cancels_timer(state: S) {
    let t0 = Instant::now();
    let mut policy = ReconnectPolicy::default();
    policy.observe(S::Disconnected, t0);
    policy.observe(state, t0 + secs(3));
    assert!(!policy.is_pending());
    assert!(!policy.fire(t0 + secs(10)));
}

#[test]
fn does_not_fire_early() {
    let t0 = Instant::now();
    let mut policy = ReconnectPolicy::default();
    policy.observe(S::Disconnected, t0);
    assert!(!policy.fire(t0 + secs(9)));
    assert!(policy.is_pending());
}

#[test]
fn fires_once_at_interval() {
    let t0 = Instant::now();
    let mut policy = ReconnectPolicy::default();
    policy.observe(S::Disconnected, t0);
    assert!(policy.fire(t0 + secs(10)));
    assert!(!policy.fire(t0 + secs(20)));
}

#[test]
fn later_disconnect_restarts_timer() {
    let t0 = Instant::now();
    let mut policy = ReconnectPolicy::default();
    policy.observe(S::Disconnected, t0);
    policy.observe(S::Connecting, t0 + secs(2));
    policy.observe(S::Disconnected, t0 + secs(4));
    assert!(!policy.fire(t0 + secs(10)));
    assert!(policy.fire(t0 + secs(14)));
}

#[test]
fn observe_change_uses_next_state() {
    let t0 = Instant::now();
    let mut policy = ReconnectPolicy::new(secs(1));
    let dropped = StateChange::new(S::Connected, S::Disconnected);
    policy.observe_change(&dropped, t0);
    assert_eq!(policy.deadline(), Some(t0 + secs(1)));

    let start = StateChange::new(S::Disconnected, S::Connecting);
    policy.observe_change(&start, t0);
    assert!(!policy.is_pending());
}

#[test]
fn cancel_clears_timer() {
    let t0 = Instant::now();
    let mut policy = ReconnectPolicy::default();
    policy.observe(S::Disconnected, t0);
    policy.cancel();
    assert!(!policy.fire(t0 + secs(60)));
}
