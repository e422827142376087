//! User commands.
//!
//! A [`Command`] is one user intent, independent of how it was entered. The
//! terminal front-end parses typed lines into commands; simulation scripts
//! them directly.

use roomchat_core::env::Environment;
use url::Url;

use crate::{App, AppAction};

/// One user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Allocate a room from the room service.
    CreateRoom,
    /// Create a room with a locally generated token.
    CreateLocalRoom,
    /// Join a room by code.
    JoinRoom(String),
    /// Open a room page URL directly.
    OpenRoom(Url),
    /// Send a chat message.
    SendMessage(String),
    /// Copy the room link.
    CopyRoomLink,
    /// Reconnect after a disconnect.
    Reconnect,
    /// Leave the room.
    LeaveRoom,
    /// Dismiss the alert.
    DismissAlert,
    /// Quit.
    Quit,
}

impl App {
    /// Apply a user command.
    ///
    /// `env` supplies randomness for locally generated rooms.
    pub fn execute<E: Environment>(&mut self, command: Command, env: &E) -> Vec<AppAction> {
        match command {
            Command::CreateRoom => self.create_room(),
            Command::CreateLocalRoom => self.create_local_room(env),
            Command::JoinRoom(code) => self.join_room(&code),
            Command::OpenRoom(url) => self.open_room(&url),
            Command::SendMessage(text) => self.send_message(&text),
            Command::CopyRoomLink => self.copy_room_link(),
            Command::Reconnect => self.reconnect(),
            Command::LeaveRoom => self.leave_room(),
            Command::DismissAlert => self.dismiss_alert(),
            Command::Quit => self.quit(),
        }
    }
}
