// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered fan-out of state changes and inbound messages.
//!
//! The bus is owned by the supervisor's dispatch task, so every live
//! delivery runs on that one task and handlers never race each other.
//! Registrations arrive from other tasks as [`Registration`] values; the
//! caller keeps the matching [`Subscription`] to cancel delivery later.
//!
//! Cancellation only flips a shared flag. The bus checks the flag before
//! every delivery and prunes cancelled entries before each publish, so a
//! handler may cancel itself (or another subscriber) mid-delivery without
//! locking anything.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hl_core::{InboundMessage, StateChange};
use tracing::warn;

/// Handler invoked for every accepted state change.
pub type StateHandler = Box<dyn FnMut(&StateChange) + Send + 'static>;

/// Handler invoked for every inbound hub message.
pub type MessageHandler = Box<dyn FnMut(&InboundMessage) + Send + 'static>;

/// Token for one observer's registration.
///
/// Dropping the token does not unsubscribe; call [`Subscription::unsubscribe`]
/// or dispose the supervisor.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
}

impl Subscription {
    /// Creates an active subscription token.
    pub fn new(id: u64) -> Self {
        Subscription {
            id,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Identifier unique within one supervisor.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns true until the subscription is cancelled.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stops further deliveries to this observer.
    ///
    /// Idempotent, and safe to call from inside the observer's own handler.
    pub fn unsubscribe(&self) {
        self.active.store(false, Ordering::Release);
    }
}

/// A handler paired with the cancellation flag of its [`Subscription`].
pub struct Registration<H> {
    id: u64,
    active: Arc<AtomicBool>,
    handler: H,
}

impl<H> Registration<H> {
    /// Binds `handler` to `subscription`.
    pub fn new(subscription: &Subscription, handler: H) -> Self {
        Registration {
            id: subscription.id,
            active: Arc::clone(&subscription.active),
            handler,
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl<H> std::fmt::Debug for Registration<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Subscriber lists for state changes and inbound messages.
///
/// A panicking handler is logged and skipped so the rest still receive the
/// notification. This only holds when panics unwind: a binary built with
/// `panic = "abort"` (this workspace's release profile) aborts on the first
/// handler panic.
#[derive(Default)]
pub struct EventBus {
    states: Vec<Registration<StateHandler>>,
    messages: Vec<Registration<MessageHandler>>,
}

impl EventBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a state-change handler.
    ///
    /// The handler first receives a synthetic `Disconnected -> Connecting`
    /// record, before any live transition.
    pub fn add_state(&mut self, mut registration: Registration<StateHandler>) {
        if !registration.is_active() {
            return;
        }
        deliver(&mut registration, &StateChange::cold_start(), "state");
        if registration.is_active() {
            self.states.push(registration);
        }
    }

    /// Registers an inbound-message handler.
    pub fn add_message(&mut self, registration: Registration<MessageHandler>) {
        if registration.is_active() {
            self.messages.push(registration);
        }
    }

    /// Delivers `change` to every active state subscriber, in registration order.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish_state(&mut self, change: &StateChange) -> usize {
        publish(&mut self.states, change, "state")
    }

    /// Delivers `message` to every active message subscriber, in registration order.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish_message(&mut self, message: &InboundMessage) -> usize {
        publish(&mut self.messages, message, "message")
    }

    /// Number of active state subscribers.
    pub fn state_subscribers(&self) -> usize {
        self.states.iter().filter(|r| r.is_active()).count()
    }

    /// Number of active message subscribers.
    pub fn message_subscribers(&self) -> usize {
        self.messages.iter().filter(|r| r.is_active()).count()
    }

    /// Cancels and drops every registration.
    pub fn clear(&mut self) {
        for registration in &self.states {
            registration.deactivate();
        }
        for registration in &self.messages {
            registration.deactivate();
        }
        self.states.clear();
        self.messages.clear();
    }
}

fn publish<T>(
    registrations: &mut Vec<Registration<Box<dyn FnMut(&T) + Send + 'static>>>,
    value: &T,
    kind: &str,
) -> usize {
    registrations.retain(Registration::is_active);

    let mut delivered = 0;
    for registration in registrations.iter_mut() {
        // A handler earlier in this pass may have cancelled this one.
        if !registration.is_active() {
            continue;
        }
        deliver(registration, value, kind);
        delivered += 1;
    }
    delivered
}

fn deliver<T>(
    registration: &mut Registration<Box<dyn FnMut(&T) + Send + 'static>>,
    value: &T,
    kind: &str,
) {
    let handler = &mut registration.handler;
    if catch_unwind(AssertUnwindSafe(|| handler(value))).is_err() {
        warn!(
            "{} subscriber {} panicked; continuing delivery",
            kind, registration.id
        );
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
