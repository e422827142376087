//! What the invariant checks see of each client's session.

use roomchat_app::{App, Entry, Origin};
use roomchat_core::{ConnectionState, LinkStatus, RoomId};

/// Session state of every simulated client at one instant.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-client state snapshots.
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Create a snapshot with a single client.
    pub fn single(client: ClientSnapshot) -> Self {
        Self { clients: vec![client] }
    }

    /// Create a snapshot from multiple clients.
    pub fn from_clients(clients: Vec<ClientSnapshot>) -> Self {
        Self { clients }
    }
}

/// Snapshot of a single client's observable state.
#[derive(Debug, Clone, Default)]
pub struct ClientSnapshot {
    /// Client identifier.
    pub id: u64,
    /// Room of the active session. `None` if not on a room page.
    pub room_id: Option<RoomId>,
    /// Connection state of the active session.
    pub state: Option<ConnectionState>,
    /// Status shown for the active session.
    pub status: Option<LinkStatus>,
    /// Transcript sequence numbers in render order.
    pub sequences: Vec<u64>,
    /// Number of local chat entries.
    pub local_entries: usize,
    /// Frames the session handed to its transport.
    pub sent_frames: u64,
}

impl ClientSnapshot {
    /// Create an empty client snapshot.
    pub fn new(id: u64) -> Self {
        Self { id, ..Default::default() }
    }

    /// Capture the observable state of `app`.
    pub fn from_app(id: u64, app: &App) -> Self {
        let Some(session) = app.session() else {
            return Self::new(id);
        };

        let transcript = session.transcript();
        Self {
            id,
            room_id: Some(session.room_id().clone()),
            state: Some(session.connection_state()),
            status: Some(session.status()),
            sequences: transcript.iter().map(Entry::sequence).collect(),
            local_entries: transcript.chat_entries().filter(|e| e.origin == Origin::Local).count(),
            sent_frames: session.sent_frames(),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    #[test]
    fn landing_page_has_no_session_state() {
        let app = App::new(Url::parse("http://localhost:8000/room.html").unwrap());
        let snapshot = ClientSnapshot::from_app(3, &app);

        assert_eq!(snapshot.id, 3);
        assert!(snapshot.room_id.is_none());
        assert!(snapshot.sequences.is_empty());
    }

    #[test]
    fn room_page_captures_session() {
        let mut app = App::new(Url::parse("http://localhost:8000/room.html").unwrap());
        app.open_room(&Url::parse("http://localhost:8000/room.html?room=abc").unwrap());
        let snapshot = ClientSnapshot::from_app(0, &app);

        assert_eq!(snapshot.room_id.unwrap().as_str(), "abc");
        assert_eq!(snapshot.state, Some(ConnectionState::Connecting));
        assert_eq!(snapshot.status, Some(LinkStatus::Disconnected));
    }
}
