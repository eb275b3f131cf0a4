// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use hl_core::ConnectionState as S;
use yare::parameterized;

const INPUTS: [Input; 4] = [
    Input::Start,
    Input::Connected,
    Input::Reconnecting,
    Input::Disconnected,
];

fn machine_in(state: S) -> StateMachine {
    StateMachine { state }
}

#[test]
fn starts_disconnected() {
    assert_eq!(StateMachine::new().state(), S::Disconnected);
}

#[parameterized(
    start = { S::Disconnected, Input::Start, S::Connecting },
    handshake = { S::Connecting, Input::Connected, S::Connected },
    start_failure = { S::Connecting, Input::Disconnected, S::Disconnected },
    drop = { S::Connected, Input::Disconnected, S::Disconnected },
    transport_reconnecting = { S::Connected, Input::Reconnecting, S::Reconnecting },
    recovered = { S::Reconnecting, Input::Connected, S::Connected },
    gave_up = { S::Reconnecting, Input::Disconnected, S::Disconnected },
)]
fn accepted_edge(from: S, input: Input, to: S) {
    let mut machine = machine_in(from);
    let change = machine.apply(input).unwrap();
    assert_eq!(change.previous(), from);
    assert_eq!(change.next(), to);
    assert_eq!(machine.state(), to);
}

#[parameterized(
    connected_while_disconnected = { S::Disconnected, Input::Connected },
    drop_while_disconnected = { S::Disconnected, Input::Disconnected },
    reconnecting_while_disconnected = { S::Disconnected, Input::Reconnecting },
    start_while_connecting = { S::Connecting, Input::Start },
    reconnecting_while_connecting = { S::Connecting, Input::Reconnecting },
    start_while_connected = { S::Connected, Input::Start },
    duplicate_connected = { S::Connected, Input::Connected },
    start_while_reconnecting = { S::Reconnecting, Input::Start },
    duplicate_reconnecting = { S::Reconnecting, Input::Reconnecting },
)]
fn ignored_input(from: S, input: Input) {
    let mut machine = machine_in(from);
    assert!(machine.apply(input).is_none());
    assert_eq!(machine.state(), from);
}

/// Walks every input sequence up to `depth` and checks the emitted records
/// chain together without self-transitions.
fn check_sequences(machine: &StateMachine, depth: usize) {
    if depth == 0 {
        return;
    }
    for input in INPUTS {
        let mut next = machine_in(machine.state());
        match next.apply(input) {
            Some(change) => {
                assert_ne!(change.previous(), change.next());
                assert_eq!(change.previous(), machine.state());
                assert_eq!(change.next(), next.state());
            }
            None => assert_eq!(next.state(), machine.state()),
        }
        check_sequences(&next, depth - 1);
    }
}

#[test]
fn no_sequence_emits_a_self_transition() {
    check_sequences(&StateMachine::new(), 6);
}

#[test]
fn full_cycle() {
    let mut machine = StateMachine::new();
    let states: Vec<_> = [
        Input::Start,
        Input::Connected,
        Input::Disconnected,
        Input::Start,
        Input::Connected,
    ]
    .into_iter()
    .map(|input| machine.apply(input).unwrap().next())
    .collect();

    assert_eq!(
        states,
        vec![S::Connecting, S::Connected, S::Disconnected, S::Connecting, S::Connected]
    );
}
