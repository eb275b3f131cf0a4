// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the hub session.
//!
//! Provides a trait-based transport layer that enables:
//! - Real WebSocket sessions for production
//! - Mock transports for unit testing
//!
//! Transports report lifecycle changes and inbound messages through the
//! [`EventSink`] handed to [`Transport::start`]. The sink may be used from
//! any task; once the supervisor is gone, emitted events are dropped.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use hl_core::{ClientFrame, HubFrame, InboundMessage};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// `start` did not finish in time.
    #[error("start timed out after {0:?}")]
    Timeout(Duration),

    /// No session is open.
    #[error("connection closed")]
    ConnectionClosed,

    /// Invocation failed.
    #[error("invoke failed: {0}")]
    InvokeFailed(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`Transport`] methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Raw notification raised by a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Handshake completed, or a dropped session was recovered.
    Connected,
    /// The session dropped and the transport is re-establishing it.
    Reconnecting,
    /// The session failed or ended.
    Disconnected {
        /// Why the session ended, when known.
        reason: Option<String>,
    },
    /// The hub called a client method.
    Message(InboundMessage),
}

/// Sending half of the supervisor's raw event queue.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<TransportEvent>,
}

impl EventSink {
    /// Creates a sink and the receiver draining it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventSink { tx }, rx)
    }

    pub(crate) fn from_sender(tx: mpsc::UnboundedSender<TransportEvent>) -> Self {
        EventSink { tx }
    }

    /// Queues an event for the supervisor.
    ///
    /// Returns false if the supervisor has been disposed.
    pub fn emit(&self, event: TransportEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Returns true once nobody is listening.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// One logical session with the remote hub.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync + 'static {
    /// Opens the session, reporting later lifecycle changes to `events`.
    fn start(&self, events: EventSink) -> TransportFuture<'_, TransportResult<()>>;

    /// Closes the session. Must not report a `Disconnected` event.
    fn stop(&self) -> TransportFuture<'_, ()>;

    /// Invokes a hub method with positional arguments.
    fn invoke(&self, method: &str, args: Vec<Value>) -> TransportFuture<'_, TransportResult<()>>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
pub struct WebSocketTransport {
    url: String,
    session: Mutex<Option<Session>>,
}

/// Internal WebSocket session wrapper.
pub(crate) struct Session {
    sink: SplitSink<WsStream, Message>,
    reader: JoinHandle<()>,
}

impl WebSocketTransport {
    /// Create a new WebSocket transport for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        WebSocketTransport {
            url: url.into(),
            session: Mutex::new(None),
        }
    }

    /// Hub URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    #[cfg(test)]
    pub(crate) async fn lock_session(&self) -> tokio::sync::MutexGuard<'_, Option<Session>> {
        self.session.lock().await
    }
}

impl Transport for WebSocketTransport {
    fn start(&self, events: EventSink) -> TransportFuture<'_, TransportResult<()>> {
        Box::pin(async move {
            let (ws_stream, _) = tokio_tungstenite::connect_async(self.url.as_str())
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let (sink, stream) = ws_stream.split();

            // No await between spawning the reader and storing it, so a
            // dropped start never leaves a reader that stop() cannot reach.
            let mut session = self.session.lock().await;
            let reader = tokio::spawn(read_loop(stream, events));
            if let Some(previous) = session.replace(Session { sink, reader }) {
                previous.reader.abort();
            }
            Ok(())
        })
    }

    fn stop(&self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let session = self.session.lock().await.take();
            if let Some(mut session) = session {
                // Abort first so an intentional close is not reported as a drop.
                session.reader.abort();
                if let Err(e) = session.sink.close().await {
                    debug!("error closing websocket: {}", e);
                }
            }
        })
    }

    fn invoke(&self, method: &str, args: Vec<Value>) -> TransportFuture<'_, TransportResult<()>> {
        let frame = ClientFrame::invoke(method, args);
        Box::pin(async move {
            let json = frame
                .to_json()
                .map_err(|e| TransportError::Serialization(e.to_string()))?;

            let mut guard = self.session.lock().await;
            let session = guard.as_mut().ok_or(TransportError::ConnectionClosed)?;

            let result = session.sink.send(Message::Text(json.into())).await;
            if let Err(e) = result {
                // Session is broken, clear it
                if let Some(session) = guard.take() {
                    session.reader.abort();
                }
                return Err(TransportError::InvokeFailed(e.to_string()));
            }
            Ok(())
        })
    }
}

/// Forwards hub frames to `events` until the stream ends.
async fn read_loop(mut stream: SplitStream<WsStream>, events: EventSink) {
    let reason = loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => match HubFrame::from_json(&text) {
                Ok(frame) => match frame.into_message() {
                    Ok(msg) => {
                        if !events.emit(TransportEvent::Message(msg)) {
                            return;
                        }
                    }
                    Err(e) => warn!("hub frame not dispatched: {}", e),
                },
                Err(e) => warn!("malformed hub frame: {}", e),
            },
            Some(Ok(Message::Close(frame))) => {
                break frame.map(|f| f.reason.as_str().to_owned());
            }
            Some(Ok(_)) => {
                // Ignore ping/pong and binary frames
                continue;
            }
            Some(Err(e)) => break Some(e.to_string()),
            None => break None,
        }
    };

    events.emit(TransportEvent::Disconnected { reason });
}
