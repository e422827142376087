//! HTTP room API bodies.

use serde::{Deserialize, Serialize};

/// Response of `POST /api/rooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    /// Identifier of the newly allocated room.
    pub room_id: String,
}

/// Response of `GET /api/rooms/{room_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Identifier that was looked up.
    pub room_id: String,
    /// Whether the server currently tracks the room.
    pub exists: bool,
    /// Number of connected participants.
    #[serde(default)]
    pub num_clients: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_room_response_decodes() {
        let body: CreateRoomResponse = serde_json::from_str(r#"{"room_id":"a3f9c1"}"#).unwrap();
        assert_eq!(body.room_id, "a3f9c1");
    }

    #[test]
    fn room_info_decodes() {
        let body: RoomInfo =
            serde_json::from_str(r#"{"room_id":"a3f9c1","exists":true,"num_clients":2}"#)
                .unwrap();
        assert!(body.exists);
        assert_eq!(body.num_clients, 2);
    }
}
