// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;

#[test]
fn invoke_frame_wire_format() {
    let frame = ClientFrame::invoke("HandleMessageFromCaller", vec![json!("hello")]);
    let value: Value = serde_json::from_str(&frame.to_json().unwrap()).unwrap();
    assert_eq!(
        value,
        json!({"type": "invoke", "method": "HandleMessageFromCaller", "args": ["hello"]})
    );
}

#[test]
fn invoke_frame_args_default_to_empty() {
    let frame = ClientFrame::from_json(r#"{"type":"invoke","method":"Ping"}"#).unwrap();
    assert_eq!(frame, ClientFrame::invoke("Ping", vec![]));
}

#[test]
fn hub_message_frame_parses() {
    let frame = HubFrame::from_json(
        r#"{"type":"message","method":"HandleMessageFromServer","payload":"hi"}"#,
    )
    .unwrap();
    assert_eq!(frame, HubFrame::message("HandleMessageFromServer", json!("hi")));
}

#[test]
fn hub_message_converts_to_inbound() {
    let msg = HubFrame::message("HandleMessageFromServer", json!({"text": "hi"}))
        .into_message()
        .unwrap();
    assert_eq!(msg.method, "HandleMessageFromServer");
    assert_eq!(msg.payload, json!({"text": "hi"}));
}

#[test]
fn hub_error_frame_is_not_a_message() {
    let err = HubFrame::error("unknown method").into_message().unwrap_err();
    assert!(matches!(err, Error::Hub(ref m) if m == "unknown method"));
}

#[test]
fn hub_message_with_empty_method_is_rejected() {
    let err = HubFrame::message("", Value::Null).into_message().unwrap_err();
    assert!(matches!(err, Error::InvalidFrame(_)));
}

#[test]
fn unknown_frame_type_is_json_error() {
    let err = HubFrame::from_json(r#"{"type":"bogus"}"#).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn inbound_text_payload() {
    let msg = InboundMessage::new("HandleMessageFromServer", json!("hello"));
    assert_eq!(msg.as_text(), Some("hello"));
    let msg = InboundMessage::new("HandleMessageFromServer", json!(42));
    assert_eq!(msg.as_text(), None);
}
