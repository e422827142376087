//! WebSocket transport for the client.
//!
//! Provides [`ConnectedTransport`] which handles WebSocket I/O for a single
//! room. This is a thin layer that just moves text frames and reports link
//! signals; session logic stays in the Sans-IO `Session`.
//!
//! # Signals
//!
//! The transport task emits, in order:
//!
//! ```text
//! Errored                       handshake failed
//! Opened, Message*, Closed      server closed or stream ended
//! Opened, Message*, Errored     read or write failed
//! ```
//!
//! Nothing follows `Closed` or `Errored`. Dropping or stopping the handle
//! aborts the task without emitting anything.

use futures::{SinkExt, StreamExt};
use roomchat_core::TransportEvent;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::error::TransportError;

const CHANNEL_CAPACITY: usize = 64;

/// Handle to a WebSocket connection task.
///
/// Frames are sent through [`send`](Self::send) and signals are received
/// through [`recv`](Self::recv). An internal task handles the socket I/O.
pub struct ConnectedTransport {
    to_server: mpsc::Sender<String>,
    events: mpsc::Receiver<TransportEvent>,
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedTransport {
    /// Queue a text frame for the server.
    ///
    /// # Errors
    ///
    /// `TransportError::Closed` if the connection task has stopped.
    pub async fn send(&self, frame: String) -> Result<(), TransportError> {
        self.to_server.send(frame).await.map_err(|_| TransportError::Closed)
    }

    /// Wait for the next link signal. `None` once the task is gone and all
    /// signals have been drained.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    /// Take a link signal if one is ready.
    pub fn try_recv(&mut self) -> Option<TransportEvent> {
        self.events.try_recv().ok()
    }

    /// Stop the connection task.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for ConnectedTransport {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

/// Open a WebSocket connection to `url`.
///
/// Returns immediately; the handshake runs on a spawned task and its outcome
/// arrives as the first signal. Must be called within a Tokio runtime.
pub fn open(url: &Url) -> ConnectedTransport {
    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
    let (events_tx, events_rx) = mpsc::channel::<TransportEvent>(CHANNEL_CAPACITY);

    let handle = tokio::spawn(run_connection(url.clone(), to_server_rx, events_tx));

    ConnectedTransport {
        to_server: to_server_tx,
        events: events_rx,
        abort_handle: handle.abort_handle(),
    }
}

/// Run the connection, bridging between channels and the socket.
async fn run_connection(
    url: Url,
    mut to_server: mpsc::Receiver<String>,
    events: mpsc::Sender<TransportEvent>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            tracing::warn!(%url, error = %e, "transport handshake failed");
            let _ = events.send(TransportEvent::Errored { detail: e.to_string() }).await;
            return;
        },
    };

    tracing::info!(%url, "transport open");
    if events.send(TransportEvent::Opened).await.is_err() {
        return;
    }

    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            outgoing = to_server.recv() => match outgoing {
                Some(frame) => {
                    if let Err(e) = sink.send(Message::Text(frame.into())).await {
                        tracing::warn!(error = %e, "transport write failed");
                        let _ = events.send(TransportEvent::Errored { detail: e.to_string() }).await;
                        return;
                    }
                },
                None => {
                    // Handle dropped; nobody is listening for signals.
                    let _ = sink.close().await;
                    return;
                },
            },
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let signal = TransportEvent::Message(text.as_str().to_owned());
                    if events.send(signal).await.is_err() {
                        return;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "transport closed by server");
                    let _ = events.send(TransportEvent::Closed).await;
                    return;
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "transport read failed");
                    let _ = events.send(TransportEvent::Errored { detail: e.to_string() }).await;
                    return;
                },
                None => {
                    tracing::info!("transport stream ended");
                    let _ = events.send(TransportEvent::Closed).await;
                    return;
                },
            },
        }
    }
}
