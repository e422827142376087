//! JSON payloads.
//!
//! Control frames use closed serde enums so that the set of recognised kinds
//! is enforced by match exhaustiveness. Every enum carries a
//! `#[serde(other)]` catch-all: a kind added on the server later decodes to
//! the catch-all and is ignored instead of failing the decode.

pub mod rooms;
pub mod system;

pub use rooms::{CreateRoomResponse, RoomInfo};
pub use system::{Envelope, FrameKind, SystemEvent};
