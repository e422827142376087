//! Client I/O
//!
//! Network edges of the Roomchat client. Everything here performs real I/O;
//! the state machines in `roomchat-app` and `roomchat-core` never do.
//!
//! # Components
//!
//! - [`ClientConfig`]: Server URL and the endpoints derived from it
//! - [`HttpRoomAllocator`]: Room allocation over the room service API
//! - [`transport::ConnectedTransport`]: WebSocket link to one room
//! - [`SystemEnv`]: OS entropy for locally generated room tokens

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod allocator;
mod config;
mod error;
mod system_env;

pub mod transport;

pub use allocator::{HttpRoomAllocator, RoomAllocator};
pub use config::{ClientConfig, DEFAULT_SERVER, ROOM_PAGE};
pub use error::{ConfigError, TransportError};
pub use system_env::SystemEnv;
pub use transport::ConnectedTransport;
