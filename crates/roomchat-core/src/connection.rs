//! Connection lifecycle state machine.
//!
//! Owns the single realtime transport of a room session. Uses the action
//! pattern: operations return [`ConnectionAction`]s for the driver to execute,
//! and transport lifecycle signals come back in as [`TransportEvent`]s. The
//! manager never touches a socket itself.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐  start   ┌────────────┐   opened   ┌───────────┐
//! │ Idle │─────────>│ Connecting │───────────>│ Connected │
//! └──────┘          └────────────┘            └───────────┘
//!                     │        │                │       │
//!                     │ closed │ error    error │       │ closed
//!                     ↓        ↓                ↓       ↓
//!           ┌──────────────┐ ┌─────────┐ ┌─────────┐ ┌──────────────┐
//!           │ Disconnected │ │ Errored │ │ Errored │ │ Disconnected │
//!           └──────────────┘ └─────────┘ └─────────┘ └──────────────┘
//! ```
//!
//! Disconnected and Errored are terminal until the caller invokes
//! [`ConnectionManager::start`] again. There is no automatic reconnect.

use crate::{error::ConnectionError, room::RoomId};

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No transport has been requested yet.
    Idle,
    /// Transport requested, waiting for the open signal.
    Connecting,
    /// Transport open; sends are accepted.
    Connected,
    /// Transport closed (cleanly or by the server).
    Disconnected,
    /// Transport failed.
    Errored,
}

impl ConnectionState {
    /// Whether a transport is opening or open.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }
}

/// User-visible connection status.
///
/// Errors are shown as a disconnection, not as a distinct status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    /// Transport is open.
    Connected,
    /// Transport is closed or failed.
    Disconnected,
}

/// Transport lifecycle signals observed by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed.
    Opened,
    /// A text frame arrived.
    Message(String),
    /// Transport closed, by either side.
    Closed,
    /// Transport failed.
    Errored {
        /// Diagnostic detail; logged, never shown as a distinct state.
        detail: String,
    },
}

/// Actions returned by the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Open a transport scoped to this room.
    Open {
        /// Room the transport is bound to.
        room_id: RoomId,
    },
    /// Transmit this frame on the open transport.
    Send(String),
    /// Tear down the transport.
    Close,
}

/// Receiver of connection notifications.
///
/// Exactly one handler is passed to each [`ConnectionManager::handle`] call,
/// so message and status notifications always reach the same single owner.
pub trait ConnectionHandler {
    /// A raw inbound frame arrived while connected.
    fn on_message(&mut self, raw: String);

    /// The user-visible status changed.
    fn on_status_change(&mut self, status: LinkStatus);
}

/// Connection manager state machine.
///
/// Single writer of [`ConnectionState`]. At most one transport exists per
/// manager: `start` fails fast while one is opening or open.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    /// Current state
    state: ConnectionState,
    /// Room of the current or most recent transport
    room_id: Option<RoomId>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    /// Create a manager in [`ConnectionState::Idle`].
    pub fn new() -> Self {
        Self { state: ConnectionState::Idle, room_id: None }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Room of the current or most recent transport. `None` before `start`.
    #[must_use]
    pub fn room_id(&self) -> Option<&RoomId> {
        self.room_id.as_ref()
    }

    /// Open a transport for `room_id`.
    ///
    /// Valid from Idle, Disconnected and Errored. Transitions to Connecting
    /// and returns a single `Open` action.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::AlreadyActive` if Connecting or Connected
    pub fn start(&mut self, room_id: RoomId) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if self.state.is_active() {
            return Err(ConnectionError::AlreadyActive { state: self.state });
        }

        tracing::info!(room = %room_id, "opening transport");
        self.state = ConnectionState::Connecting;
        self.room_id = Some(room_id.clone());

        Ok(vec![ConnectionAction::Open { room_id }])
    }

    /// Transmit an already-encoded frame.
    ///
    /// The state check happens before any action is produced.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::NotConnected` unless Connected
    pub fn send(&mut self, frame: String) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if self.state != ConnectionState::Connected {
            return Err(ConnectionError::NotConnected { state: self.state });
        }

        Ok(vec![ConnectionAction::Send(frame)])
    }

    /// Apply a transport signal, notifying `handler`.
    ///
    /// Signals that do not apply to the current state are ignored. A close
    /// that follows an error leaves the manager in Errored without a second
    /// status notification.
    pub fn handle<H: ConnectionHandler + ?Sized>(
        &mut self,
        event: TransportEvent,
        handler: &mut H,
    ) {
        match (self.state, event) {
            (ConnectionState::Connecting, TransportEvent::Opened) => {
                tracing::info!(room = ?self.room_id, "transport open");
                self.state = ConnectionState::Connected;
                handler.on_status_change(LinkStatus::Connected);
            },

            (ConnectionState::Connected, TransportEvent::Message(raw)) => {
                handler.on_message(raw);
            },

            (ConnectionState::Connecting | ConnectionState::Connected, TransportEvent::Closed) => {
                tracing::info!(room = ?self.room_id, "transport closed");
                self.state = ConnectionState::Disconnected;
                handler.on_status_change(LinkStatus::Disconnected);
            },

            (
                ConnectionState::Connecting | ConnectionState::Connected,
                TransportEvent::Errored { detail },
            ) => {
                tracing::warn!(room = ?self.room_id, %detail, "transport error");
                self.state = ConnectionState::Errored;
                handler.on_status_change(LinkStatus::Disconnected);
            },

            (state, event) => {
                tracing::debug!(?state, ?event, "ignoring transport signal");
            },
        }
    }

    /// Tear down the transport (session teardown).
    ///
    /// Returns a `Close` action if a transport was opening or open. No status
    /// notification is produced; in-flight sends are not guaranteed.
    pub fn close(&mut self) -> Vec<ConnectionAction> {
        if !self.state.is_active() {
            return vec![];
        }

        tracing::info!(room = ?self.room_id, "closing transport");
        self.state = ConnectionState::Disconnected;
        vec![ConnectionAction::Close]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        messages: Vec<String>,
        statuses: Vec<LinkStatus>,
    }

    impl ConnectionHandler for Recorder {
        fn on_message(&mut self, raw: String) {
            self.messages.push(raw);
        }

        fn on_status_change(&mut self, status: LinkStatus) {
            self.statuses.push(status);
        }
    }

    fn room() -> RoomId {
        RoomId::new("a3f9c1").unwrap()
    }

    fn connected() -> (ConnectionManager, Recorder) {
        let mut conn = ConnectionManager::new();
        let mut rec = Recorder::default();
        conn.start(room()).unwrap();
        conn.handle(TransportEvent::Opened, &mut rec);
        (conn, rec)
    }

    #[test]
    fn connection_lifecycle() {
        let mut conn = ConnectionManager::new();
        let mut rec = Recorder::default();
        assert_eq!(conn.state(), ConnectionState::Idle);
        assert_eq!(conn.room_id(), None);

        let actions = conn.start(room()).unwrap();
        assert_eq!(actions, vec![ConnectionAction::Open { room_id: room() }]);
        assert_eq!(conn.state(), ConnectionState::Connecting);

        conn.handle(TransportEvent::Opened, &mut rec);
        conn.handle(TransportEvent::Message("hi".into()), &mut rec);
        conn.handle(TransportEvent::Closed, &mut rec);

        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert_eq!(rec.statuses, vec![LinkStatus::Connected, LinkStatus::Disconnected]);
        assert_eq!(rec.messages, vec!["hi".to_string()]);
    }

    #[test]
    fn start_while_connecting_fails_fast() {
        let mut conn = ConnectionManager::new();
        conn.start(room()).unwrap();

        let result = conn.start(room());
        assert_eq!(
            result,
            Err(ConnectionError::AlreadyActive { state: ConnectionState::Connecting })
        );
        assert_eq!(conn.state(), ConnectionState::Connecting);
    }

    #[test]
    fn start_while_connected_fails_fast() {
        let (mut conn, _) = connected();
        assert!(matches!(conn.start(room()), Err(ConnectionError::AlreadyActive { .. })));
        assert_eq!(conn.state(), ConnectionState::Connected);
    }

    #[test]
    fn restart_after_disconnect_is_allowed() {
        let (mut conn, mut rec) = connected();
        conn.handle(TransportEvent::Closed, &mut rec);

        let other = RoomId::new("other").unwrap();
        let actions = conn.start(other.clone()).unwrap();
        assert_eq!(actions, vec![ConnectionAction::Open { room_id: other.clone() }]);
        assert_eq!(conn.room_id(), Some(&other));
    }

    #[test]
    fn send_requires_connected() {
        let mut conn = ConnectionManager::new();
        assert_eq!(
            conn.send("hello".into()),
            Err(ConnectionError::NotConnected { state: ConnectionState::Idle })
        );

        conn.start(room()).unwrap();
        assert!(matches!(conn.send("hello".into()), Err(ConnectionError::NotConnected { .. })));
    }

    #[test]
    fn send_when_connected_produces_frame() {
        let (mut conn, _) = connected();
        assert_eq!(conn.send("hello".into()), Ok(vec![ConnectionAction::Send("hello".into())]));
    }

    #[test]
    fn error_surfaces_as_disconnected() {
        let (mut conn, mut rec) = connected();
        conn.handle(TransportEvent::Errored { detail: "reset by peer".into() }, &mut rec);

        assert_eq!(conn.state(), ConnectionState::Errored);
        assert_eq!(rec.statuses, vec![LinkStatus::Connected, LinkStatus::Disconnected]);
    }

    #[test]
    fn close_after_error_is_absorbed() {
        let (mut conn, mut rec) = connected();
        conn.handle(TransportEvent::Errored { detail: "reset".into() }, &mut rec);
        conn.handle(TransportEvent::Closed, &mut rec);

        assert_eq!(conn.state(), ConnectionState::Errored);
        assert_eq!(rec.statuses.len(), 2);
    }

    #[test]
    fn error_while_connecting() {
        let mut conn = ConnectionManager::new();
        let mut rec = Recorder::default();
        conn.start(room()).unwrap();
        conn.handle(TransportEvent::Errored { detail: "refused".into() }, &mut rec);

        assert_eq!(conn.state(), ConnectionState::Errored);
        assert_eq!(rec.statuses, vec![LinkStatus::Disconnected]);
    }

    #[test]
    fn signals_before_start_are_ignored() {
        let mut conn = ConnectionManager::new();
        let mut rec = Recorder::default();

        conn.handle(TransportEvent::Opened, &mut rec);
        conn.handle(TransportEvent::Message("early".into()), &mut rec);
        conn.handle(TransportEvent::Closed, &mut rec);

        assert_eq!(conn.state(), ConnectionState::Idle);
        assert!(rec.statuses.is_empty());
        assert!(rec.messages.is_empty());
    }

    #[test]
    fn message_while_connecting_is_dropped() {
        let mut conn = ConnectionManager::new();
        let mut rec = Recorder::default();
        conn.start(room()).unwrap();
        conn.handle(TransportEvent::Message("early".into()), &mut rec);

        assert!(rec.messages.is_empty());
        assert_eq!(conn.state(), ConnectionState::Connecting);
    }

    #[test]
    fn close_tears_down_without_status() {
        let (mut conn, rec) = connected();
        assert_eq!(conn.close(), vec![ConnectionAction::Close]);
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert_eq!(rec.statuses, vec![LinkStatus::Connected]);

        assert!(conn.close().is_empty());
    }
}
