// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection supervisor.
//!
//! The supervisor owns the transport and a single dispatch task. Commands
//! from callers, raw transport events and `start` completions are all
//! drained by that task, which is the only writer of the connection state
//! and the only context handlers run on.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐ commands  ┌──────────────────────────────────┐
//! │ Supervisor │──────────►│          dispatch task           │
//! └────────────┘           │                                  │
//!       │ invoke           │  StateMachine ──► EventBus ──►  handlers
//!       ▼                  │       │                          │
//! ┌────────────┐  events   │       ▼                          │
//! │ Transport  │──────────►│  ReconnectPolicy (one timer)     │
//! └────────────┘           └──────────────────────────────────┘
//! ```
//!
//! `send` bypasses the task: it checks the last published state and calls
//! the transport directly, failing fast when not connected.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hl_core::{ConnectionState, InboundMessage, StateChange};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bus::{EventBus, MessageHandler, Registration, StateHandler, Subscription};
use crate::error::{Error, Result};
use crate::machine::{Input, StateMachine};
use crate::reconnect::{ReconnectPolicy, DEFAULT_RECONNECT_INTERVAL};
use crate::transport::{
    EventSink, Transport, TransportError, TransportEvent, TransportResult, WebSocketTransport,
};

/// Default bound on a single `start` attempt.
pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Delay between entering `Disconnected` and the next `start`.
    pub reconnect_interval: Duration,
    /// A `start` still pending after this long counts as failed.
    pub start_timeout: Duration,
    /// Issue `connect()` as soon as the supervisor is spawned.
    pub connect_immediately: bool,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig {
            reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
            start_timeout: DEFAULT_START_TIMEOUT,
            connect_immediately: true,
        }
    }
}

enum Command {
    Connect,
    SubscribeState(Registration<StateHandler>),
    SubscribeMessages(Registration<MessageHandler>),
    Dispose(Option<oneshot::Sender<()>>),
}

/// Outcome of one `start` attempt, tagged with its attempt number.
type StartOutcome = (u64, TransportResult<()>);

/// Long-lived, self-healing connection to the hub.
pub struct Supervisor<T: Transport = WebSocketTransport> {
    transport: Arc<T>,
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
    next_subscription: AtomicU64,
    disposed: AtomicBool,
}

impl<T: Transport> Supervisor<T> {
    /// Spawns the dispatch task and returns the supervisor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(transport: Arc<T>, config: SupervisorConfig) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (starts_tx, starts_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        let connect_immediately = config.connect_immediately;
        let dispatcher = Dispatcher {
            transport: Arc::clone(&transport),
            policy: ReconnectPolicy::new(config.reconnect_interval),
            config,
            machine: StateMachine::new(),
            bus: EventBus::new(),
            state_tx,
            events_tx,
            starts_tx,
            attempt: 0,
            in_flight: None,
        };
        tokio::spawn(dispatcher.run(commands_rx, events_rx, starts_rx));

        let supervisor = Supervisor {
            transport,
            commands: commands_tx,
            state: state_rx,
            next_subscription: AtomicU64::new(1),
            disposed: AtomicBool::new(false),
        };

        if connect_immediately {
            supervisor.connect();
        }
        supervisor
    }

    /// Last state published by the dispatch task.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Receiver that observes every published state.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Returns true once `dispose` has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// The transport this supervisor drives.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Requests a connection.
    ///
    /// No-op unless the connection is `Disconnected`. Start failures are
    /// logged and retried by the reconnection policy, never returned.
    pub fn connect(&self) {
        if self.is_disposed() {
            return;
        }
        let _ = self.commands.send(Command::Connect);
    }

    /// Invokes a hub method.
    ///
    /// Fails immediately with [`Error::NotConnected`] unless the connection is
    /// `Connected`; nothing is queued for later.
    pub async fn send(&self, method: &str, args: Vec<Value>) -> Result<()> {
        if self.is_disposed() {
            return Err(Error::Disposed);
        }

        let state = self.state();
        if !state.is_connected() {
            return Err(Error::NotConnected { state });
        }

        self.transport.invoke(method, args).await?;
        Ok(())
    }

    /// Registers a state-change handler.
    ///
    /// The handler first receives a synthetic `Disconnected -> Connecting`
    /// record, then every live transition in order.
    pub fn subscribe_state_changes<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        let subscription = self.new_subscription();
        let registration = Registration::new(&subscription, Box::new(handler) as StateHandler);
        self.register(&subscription, Command::SubscribeState(registration));
        subscription
    }

    /// Registers an inbound-message handler.
    pub fn subscribe_messages<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&InboundMessage) + Send + 'static,
    {
        let subscription = self.new_subscription();
        let registration = Registration::new(&subscription, Box::new(handler) as MessageHandler);
        self.register(&subscription, Command::SubscribeMessages(registration));
        subscription
    }

    /// Stops the transport, cancels any pending retry and drops every
    /// subscription.
    ///
    /// Release happens once; later calls return immediately. No handler runs
    /// after the first call returns.
    pub async fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        let (ack_tx, ack_rx) = oneshot::channel();
        if self.commands.send(Command::Dispose(Some(ack_tx))).is_ok() {
            let _ = ack_rx.await;
        }
    }

    fn new_subscription(&self) -> Subscription {
        Subscription::new(self.next_subscription.fetch_add(1, Ordering::Relaxed))
    }

    fn register(&self, subscription: &Subscription, command: Command) {
        if self.is_disposed() || self.commands.send(command).is_err() {
            subscription.unsubscribe();
        }
    }
}

impl<T: Transport> Drop for Supervisor<T> {
    fn drop(&mut self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            let _ = self.commands.send(Command::Dispose(None));
        }
    }
}

/// State owned by the dispatch task.
struct Dispatcher<T: Transport> {
    transport: Arc<T>,
    config: SupervisorConfig,
    machine: StateMachine,
    policy: ReconnectPolicy,
    bus: EventBus,
    state_tx: watch::Sender<ConnectionState>,
    events_tx: mpsc::UnboundedSender<TransportEvent>,
    starts_tx: mpsc::UnboundedSender<StartOutcome>,
    attempt: u64,
    in_flight: Option<CancellationToken>,
}

impl<T: Transport> Dispatcher<T> {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<TransportEvent>,
        mut starts: mpsc::UnboundedReceiver<StartOutcome>,
    ) {
        // The initial state counts as a Disconnected observation.
        self.policy.observe(self.machine.state(), Instant::now());

        loop {
            let deadline = self.policy.deadline();

            // Commands first, so a subscription queued before an event sees it.
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::Connect) => self.connect(),
                    Some(Command::SubscribeState(registration)) => self.bus.add_state(registration),
                    Some(Command::SubscribeMessages(registration)) => {
                        self.bus.add_message(registration)
                    }
                    Some(Command::Dispose(ack)) => {
                        self.shutdown().await;
                        if let Some(ack) = ack {
                            let _ = ack.send(());
                        }
                        return;
                    }
                    None => {
                        self.shutdown().await;
                        return;
                    }
                },
                Some(event) = events.recv() => self.handle_event(event),
                Some((attempt, result)) = starts.recv() => self.handle_start_outcome(attempt, result),
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if self.policy.fire(Instant::now()) {
                        info!(
                            "no recovery within {:?}, reconnecting",
                            self.policy.interval()
                        );
                        self.connect();
                    }
                }
            }
        }
    }

    /// Applies `input` and publishes the resulting transition, if any.
    fn transition(&mut self, input: Input) -> Option<StateChange> {
        let change = self.machine.apply(input)?;
        info!("{}", change);

        self.state_tx.send_replace(change.next());
        self.policy.observe_change(&change, Instant::now());

        // Leaving Connecting for Disconnected abandons the pending attempt.
        if change.next() == ConnectionState::Disconnected {
            if let Some(token) = self.in_flight.take() {
                token.cancel();
            }
        }

        self.bus.publish_state(&change);
        Some(change)
    }

    fn connect(&mut self) {
        if self.transition(Input::Start).is_some() {
            self.spawn_start();
        } else {
            debug!("connect ignored while {}", self.machine.state());
        }
    }

    fn spawn_start(&mut self) {
        self.attempt += 1;
        let attempt = self.attempt;

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let transport = Arc::clone(&self.transport);
        let sink = EventSink::from_sender(self.events_tx.clone());
        let starts = self.starts_tx.clone();
        let timeout = self.config.start_timeout;

        debug!("starting transport (attempt {})", attempt);
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;

                _ = token.cancelled() => return,
                result = tokio::time::timeout(timeout, transport.start(sink)) => {
                    result.unwrap_or(Err(TransportError::Timeout(timeout)))
                }
            };
            if token.is_cancelled() {
                // Abandoned after the handshake finished: close what it opened.
                if result.is_ok() {
                    transport.stop().await;
                }
                return;
            }
            let _ = starts.send((attempt, result));
        });
    }

    fn handle_start_outcome(&mut self, attempt: u64, result: TransportResult<()>) {
        if attempt != self.attempt {
            debug!("discarding outcome of superseded attempt {}", attempt);
            return;
        }
        self.in_flight = None;

        match result {
            Ok(()) => {
                self.transition(Input::Connected);
            }
            Err(e) => {
                warn!("transport start failed (attempt {}): {}", attempt, e);
                self.transition(Input::Disconnected);
            }
        }
    }

    fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => {
                self.transition(Input::Connected);
            }
            TransportEvent::Reconnecting => {
                self.transition(Input::Reconnecting);
            }
            TransportEvent::Disconnected { reason } => {
                let previous = self.machine.state();
                if self.transition(Input::Disconnected).is_some() {
                    warn!(
                        "connection lost while {}: {}",
                        previous,
                        reason.as_deref().unwrap_or("no reason given")
                    );
                }
            }
            TransportEvent::Message(message) => {
                debug!("inbound message: {}", message.method);
                self.bus.publish_message(&message);
            }
        }
    }

    async fn shutdown(&mut self) {
        self.policy.cancel();
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.bus.clear();
        self.transport.stop().await;
        // Silent: subscribers are gone and no transition is published.
        self.state_tx.send_replace(ConnectionState::Disconnected);
        info!("supervisor disposed");
    }
}
