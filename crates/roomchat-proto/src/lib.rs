//! Roomchat wire protocol
//!
//! The realtime channel is asymmetric: the server injects structured JSON
//! control frames (peer joined, peer left, welcome), while chat text travels
//! in both directions as raw UTF-8 with no envelope. This crate owns that
//! asymmetry so nothing above it has to probe JSON fields by hand.
//!
//! # Components
//!
//! - [`decode`]: Classifies an inbound frame as chat, control, or ignored
//! - [`encode_chat`]: Produces the outbound frame for chat text
//! - [`payloads`]: Control-frame envelopes and HTTP room API bodies

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod frame;
pub mod payloads;

pub use frame::{ControlEvent, IgnoreReason, Inbound, decode, encode_chat, encode_control};
pub use payloads::{CreateRoomResponse, RoomInfo};
