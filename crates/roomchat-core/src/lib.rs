//! Roomchat core
//!
//! Sans-IO building blocks of a room chat client: room identity and the
//! connection lifecycle state machine. Nothing in this crate performs I/O;
//! the connection manager returns [`ConnectionAction`]s for a driver to
//! execute and consumes [`TransportEvent`]s the driver observes.
//!
//! # Components
//!
//! - [`RoomId`]: Validated, URL-safe room identifier
//! - [`resolve_active_room`]: Extracts the room from a room page URL
//! - [`ConnectionManager`]: One transport per session, five-state lifecycle
//! - [`env::Environment`]: Randomness seam for deterministic tests

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod connection;
pub mod env;
pub mod error;
pub mod room;

pub use connection::{
    ConnectionAction, ConnectionHandler, ConnectionManager, ConnectionState, LinkStatus,
    TransportEvent,
};
pub use error::{AllocationError, ConnectionError, RoomError};
pub use room::{ROOM_QUERY_PARAM, RoomId, resolve_active_room, room_page_url};
