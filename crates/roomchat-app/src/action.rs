//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use roomchat_core::ConnectionAction;
use url::Url;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Ask the room service for a new room.
    ///
    /// The outcome comes back as `RoomAllocated` or `AllocationFailed`.
    AllocateRoom,

    /// Move to the room page at this URL.
    Navigate {
        /// Room page URL carrying the `room` query parameter.
        url: Url,
    },

    /// Transport operation from the active session's connection manager.
    Transport(ConnectionAction),

    /// Put the room link on the clipboard.
    CopyRoomLink {
        /// Shareable room page URL.
        url: Url,
    },
}

impl From<ConnectionAction> for AppAction {
    fn from(action: ConnectionAction) -> Self {
        Self::Transport(action)
    }
}
