//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state machine besides direct user commands.
//!
//! Events originate from:
//! - System ticks and terminal resizes.
//! - Completion of driver work (room allocation, clipboard).
//! - Transport lifecycle signals for the active session.

use roomchat_core::{AllocationError, RoomId, TransportEvent};
use url::Url;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// The room service allocated a room.
    RoomAllocated {
        /// Identifier returned by the service.
        room_id: RoomId,
    },

    /// The room service could not allocate a room.
    AllocationFailed {
        /// Why the allocation failed.
        error: AllocationError,
    },

    /// Transport signal for the active session.
    Transport(TransportEvent),

    /// Room link is on the clipboard.
    LinkCopied,

    /// Clipboard write failed.
    CopyFailed {
        /// Link the user should copy by hand.
        url: Url,
        /// Error description.
        reason: String,
    },
}
