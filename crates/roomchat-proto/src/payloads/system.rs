//! Server-injected control frames.
//!
//! ```text
//! {"type":"system","event":"join"}
//! {"type":"system","event":"leave"}
//! {"type":"system","event":"welcome","client_id":"<string>"}
//! ```

use serde::{Deserialize, Serialize};

/// Outer envelope of a structured frame.
///
/// Only the `type` discriminator is read here; the remaining fields are
/// interpreted by the payload type it selects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope {
    /// Frame discriminator.
    #[serde(rename = "type")]
    pub kind: FrameKind,
}

/// Value of the `type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// Server-generated room event.
    System,
    /// Any discriminator this client does not understand.
    #[serde(other)]
    Unrecognized,
}

/// Body of a `"type":"system"` frame, tagged by `event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum SystemEvent {
    /// Another participant connected to the room.
    Join,
    /// Another participant disconnected from the room.
    Leave,
    /// Greeting sent to this client right after it connects.
    Welcome {
        /// Identifier the server assigned to this connection.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        client_id: Option<String>,
    },
    /// Event kind unknown to this client.
    #[serde(other)]
    Unknown,
}
