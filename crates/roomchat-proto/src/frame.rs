//! Inbound frame classification and outbound encoding.
//!
//! # Classification
//!
//! ```text
//!  raw frame ──> JSON object? ──no──> Chat(raw)
//!                    │
//!                   yes
//!                    ↓
//!               "type" field ──absent/unknown──> Ignored(UnrecognizedType)
//!                    │
//!                 "system"
//!                    ↓
//!               "event" field ──join──> Control(PeerJoined)
//!                              ──leave─> Control(PeerLeft)
//!                              ──welcome> Control(Welcome { client_id })
//!                              ──other─> Ignored(UnknownSystemEvent)
//! ```
//!
//! # Invariants
//!
//! - `decode` is total: every input maps to exactly one [`Inbound`] and no
//!   input panics or returns an error.
//! - Outbound chat is never wrapped: `encode_chat(text) == text`.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::payloads::{Envelope, FrameKind, SystemEvent};

/// Structured room event produced by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// Greeting carrying the identifier the server assigned to this client.
    Welcome {
        /// Server-assigned client identifier, if the server sent one.
        client_id: Option<String>,
    },
    /// Another participant joined the room.
    PeerJoined,
    /// Another participant left the room.
    PeerLeft,
}

/// Why a structured frame produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The `type` discriminator was missing or not one this client knows.
    UnrecognizedType,
    /// A `system` frame whose `event` kind is unknown or malformed.
    UnknownSystemEvent,
}

/// Classification of one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Plain chat text from another participant. Holds the entire raw frame.
    Chat(String),
    /// Server control event.
    Control(ControlEvent),
    /// Well-formed structured data this client does not act on.
    Ignored(IgnoreReason),
}

/// Classify a raw inbound frame.
///
/// Only JSON objects count as structured data. Bare JSON scalars and arrays
/// (`42`, `"hi"`, `[1]`) are ordinary chat text that happens to parse.
pub fn decode(raw: &str) -> Inbound {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        _ => return Inbound::Chat(raw.to_owned()),
    };

    let kind = match Envelope::deserialize(&value) {
        Ok(envelope) => envelope.kind,
        Err(e) => {
            tracing::debug!(error = %e, "structured frame without discriminator");
            return Inbound::Ignored(IgnoreReason::UnrecognizedType);
        },
    };

    match kind {
        FrameKind::System => decode_system(&value),
        FrameKind::Unrecognized => Inbound::Ignored(IgnoreReason::UnrecognizedType),
    }
}

fn decode_system(value: &Value) -> Inbound {
    match SystemEvent::deserialize(value) {
        Ok(SystemEvent::Join) => Inbound::Control(ControlEvent::PeerJoined),
        Ok(SystemEvent::Leave) => Inbound::Control(ControlEvent::PeerLeft),
        Ok(SystemEvent::Welcome { client_id }) => {
            Inbound::Control(ControlEvent::Welcome { client_id })
        },
        Ok(SystemEvent::Unknown) => Inbound::Ignored(IgnoreReason::UnknownSystemEvent),
        Err(e) => {
            tracing::debug!(error = %e, "malformed system frame");
            Inbound::Ignored(IgnoreReason::UnknownSystemEvent)
        },
    }
}

/// Encode outbound chat text. The protocol sends chat as raw text.
pub fn encode_chat(text: &str) -> String {
    text.to_owned()
}

/// Encode a control event the way the relay server emits it.
///
/// Clients never send control frames; this exists for relays and tests.
pub fn encode_control(event: &ControlEvent) -> String {
    let value = match event {
        ControlEvent::PeerJoined => json!({ "type": "system", "event": "join" }),
        ControlEvent::PeerLeft => json!({ "type": "system", "event": "leave" }),
        ControlEvent::Welcome { client_id: Some(id) } => {
            json!({ "type": "system", "event": "welcome", "client_id": id })
        },
        ControlEvent::Welcome { client_id: None } => {
            json!({ "type": "system", "event": "welcome" })
        },
    };
    value.to_string()
}
