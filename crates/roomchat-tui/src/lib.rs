//! Terminal UI for Roomchat
//!
//! A thin shell over [`roomchat_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`roomchat_app::Runtime`].
//!
//! This crate only handles terminal input, rendering, and wiring the network
//! clients from `roomchat-client` into the driver.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod clipboard;
pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;

pub use input::{InputState, KeyInput};
pub use roomchat_app::{App, AppAction, AppEvent, Driver, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
