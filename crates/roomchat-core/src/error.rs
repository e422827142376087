//! Error types for the Roomchat core.
//!
//! One enum per concern: room identity, connection lifecycle, and room
//! allocation. None of these is fatal to the process; each names the recovery
//! the caller is expected to perform.

use thiserror::Error;

use crate::connection::ConnectionState;

/// Errors resolving or validating a room identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// No room identifier in the current context, or it was blank.
    ///
    /// Prevents session start.
    #[error("no room specified")]
    Missing,

    /// Identifier contains a character outside the URL-safe alphabet.
    #[error("invalid character {found:?} in room id {room_id:?}")]
    InvalidCharacter {
        /// Offending identifier (trimmed).
        room_id: String,
        /// First character outside the allowed alphabet.
        found: char,
    },
}

/// Errors from connection manager operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Send attempted while the connection is not established.
    ///
    /// The send is discarded; session state is unaffected.
    #[error("not connected: cannot send while {state:?}")]
    NotConnected {
        /// State at the time of the attempt.
        state: ConnectionState,
    },

    /// `start` called while a transport is already opening or open.
    #[error("transport already active in state {state:?}")]
    AlreadyActive {
        /// State at the time of the attempt.
        state: ConnectionState,
    },
}

/// Errors allocating a room from the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Room service could not be reached.
    #[error("room service unreachable: {0}")]
    Unreachable(String),

    /// Room service answered with a non-success status.
    #[error("room service returned status {0}")]
    Status(u16),

    /// Response body did not carry a usable room identifier.
    #[error("invalid room service response: {0}")]
    InvalidResponse(String),

    /// Another allocation is still pending.
    #[error("room allocation already in progress")]
    InFlight,
}

impl AllocationError {
    /// Returns true if retrying the same request may succeed.
    ///
    /// Unreachable services and server-side failures are transient. Client
    /// errors (4xx) and malformed responses are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::InFlight => true,
            Self::Status(code) => *code >= 500,
            Self::InvalidResponse(_) => false,
        }
    }
}

impl From<RoomError> for AllocationError {
    fn from(err: RoomError) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_failures_are_transient() {
        assert!(AllocationError::Unreachable("connection refused".into()).is_transient());
        assert!(AllocationError::Status(503).is_transient());
        assert!(AllocationError::InFlight.is_transient());
    }

    #[test]
    fn client_failures_are_not_transient() {
        assert!(!AllocationError::Status(404).is_transient());
        assert!(!AllocationError::InvalidResponse("missing room_id".into()).is_transient());
    }

    #[test]
    fn invalid_room_becomes_invalid_response() {
        let err: AllocationError = RoomError::Missing.into();
        assert!(matches!(err, AllocationError::InvalidResponse(_)));
    }
}
