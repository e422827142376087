//! Application layer for Roomchat
//!
//! Pure state machines and a generic runtime for the chat client, so that
//! simulation tests run the same orchestration code as the terminal client.
//!
//! # Components
//!
//! - [`Transcript`]: Ordered, append-only view model of one room
//! - [`Session`]: One room, one connection manager, one transcript
//! - [`App`]: Page state machine (landing, room, blocked)
//! - [`Command`]: User intents applied to the App
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod command;
mod driver;
mod event;
mod runtime;
mod session;
mod transcript;

pub use action::AppAction;
pub use app::{App, COPY_ACK_TICKS, Page};
pub use command::Command;
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::Runtime;
pub use session::{Session, SessionError};
pub use transcript::{
    ChatEntry, Entry, Origin, PEER_JOINED_TEXT, PEER_LEFT_TEXT, SystemEntry, SystemKind,
    Transcript,
};
