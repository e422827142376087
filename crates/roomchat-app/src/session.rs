//! Room session.
//!
//! A [`Session`] binds one [`RoomId`], one [`ConnectionManager`] and one
//! [`Transcript`]. It is created when the room page opens and dropped when the
//! user leaves. Inbound frames are decoded here and appended in arrival order;
//! outbound text is validated, appended, then handed to the connection as a
//! `Send` action.

use roomchat_core::{
    ConnectionAction, ConnectionError, ConnectionHandler, ConnectionManager, ConnectionState,
    LinkStatus, RoomId, TransportEvent,
};
use roomchat_proto::{ControlEvent, Inbound, decode, encode_chat};
use thiserror::Error;

use crate::transcript::Transcript;

/// Errors from session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Input was empty after trimming. Callers ignore this silently.
    #[error("message is empty")]
    EmptyMessage,

    /// Send attempted while the connection is not established.
    ///
    /// Nothing was appended or transmitted.
    #[error("not connected: cannot send while {state:?}")]
    NotConnected {
        /// Connection state at the time of the attempt.
        state: ConnectionState,
    },

    /// Any other connection failure.
    #[error(transparent)]
    Connection(ConnectionError),
}

impl From<ConnectionError> for SessionError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::NotConnected { state } => Self::NotConnected { state },
            other => Self::Connection(other),
        }
    }
}

/// One room's live session.
#[derive(Debug, Clone)]
pub struct Session {
    room_id: RoomId,
    connection: ConnectionManager,
    transcript: Transcript,
    /// Last status reported by the connection manager.
    status: LinkStatus,
    /// Identifier assigned by the relay in its welcome frame.
    client_id: Option<String>,
    /// Frames handed to the transport, in order.
    sent_frames: u64,
}

impl Session {
    /// Create an idle session for `room_id`. Call [`Session::start`] to
    /// connect.
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            connection: ConnectionManager::new(),
            transcript: Transcript::new(),
            status: LinkStatus::Disconnected,
            client_id: None,
            sent_frames: 0,
        }
    }

    /// Open the transport for this session's room.
    ///
    /// # Errors
    ///
    /// - `SessionError::Connection` if a transport is already opening or open
    pub fn start(&mut self) -> Result<Vec<ConnectionAction>, SessionError> {
        Ok(self.connection.start(self.room_id.clone())?)
    }

    /// Submit text typed by the user.
    ///
    /// The text is trimmed. On success the trimmed text is appended as a local
    /// entry and a `Send` action carrying the encoded frame is returned. The
    /// entry is in the transcript before the frame leaves the client.
    ///
    /// # Errors
    ///
    /// - `SessionError::EmptyMessage` if nothing is left after trimming
    /// - `SessionError::NotConnected` unless Connected; transcript untouched
    pub fn append_local(&mut self, text: &str) -> Result<Vec<ConnectionAction>, SessionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let actions = self.connection.send(encode_chat(trimmed))?;
        self.transcript.push_local(trimmed.to_owned());
        self.sent_frames += 1;

        Ok(actions)
    }

    /// Append a message relayed from a peer.
    pub fn append_remote(&mut self, text: String) -> u64 {
        self.transcript.push_remote(text)
    }

    /// Apply a control event. Returns the new entry's sequence, if any.
    pub fn append_system(&mut self, event: &ControlEvent) -> Option<u64> {
        apply_control(&self.room_id, &mut self.transcript, &mut self.client_id, event)
    }

    /// Feed a transport signal through the connection manager.
    pub fn handle_transport(&mut self, event: TransportEvent) {
        let Self { connection, transcript, status, client_id, room_id, .. } = self;
        let mut inbox = Inbox { room_id, transcript, status, client_id };
        connection.handle(event, &mut inbox);
    }

    /// Tear down the transport. No status notification is produced.
    pub fn close(&mut self) -> Vec<ConnectionAction> {
        self.connection.close()
    }

    /// Room of this session.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Last user-visible status.
    pub fn status(&self) -> LinkStatus {
        self.status
    }

    /// Transcript in render order.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Client id from the relay's welcome frame, for diagnostics.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Number of frames handed to the transport.
    pub fn sent_frames(&self) -> u64 {
        self.sent_frames
    }
}

/// Single receiver of connection notifications for a session.
struct Inbox<'a> {
    room_id: &'a RoomId,
    transcript: &'a mut Transcript,
    status: &'a mut LinkStatus,
    client_id: &'a mut Option<String>,
}

impl ConnectionHandler for Inbox<'_> {
    fn on_message(&mut self, raw: String) {
        match decode(&raw) {
            Inbound::Chat(text) => {
                self.transcript.push_remote(text);
            },
            Inbound::Control(event) => {
                apply_control(self.room_id, self.transcript, self.client_id, &event);
            },
            Inbound::Ignored(reason) => {
                tracing::debug!(room = %self.room_id, ?reason, "dropping inbound frame");
            },
        }
    }

    fn on_status_change(&mut self, status: LinkStatus) {
        *self.status = status;
    }
}

fn apply_control(
    room_id: &RoomId,
    transcript: &mut Transcript,
    client_id: &mut Option<String>,
    event: &ControlEvent,
) -> Option<u64> {
    if let ControlEvent::Welcome { client_id: assigned } = event {
        tracing::debug!(room = %room_id, client_id = ?assigned, "welcome received");
        if let Some(assigned) = assigned {
            *client_id = Some(assigned.clone());
        }
    }

    transcript.push_system(event)
}
