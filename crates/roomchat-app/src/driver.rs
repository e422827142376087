//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use roomchat_core::{RoomId, TransportEvent};

use crate::{App, AppAction};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in production TUI and simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, tokio-tungstenite for the room
///   transport, reqwest for room allocation
/// - **Simulation**: in-memory relay with scripted input
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next input.
    ///
    /// User input and completed background work (room allocation) are applied
    /// to `app` here; the resulting actions are returned for execution.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Next pending transport signal, without waiting.
    ///
    /// Returns `None` when nothing is queued or no transport exists.
    fn recv_transport(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;

    /// Open the realtime transport for `room_id`.
    ///
    /// Completion is reported later as [`TransportEvent::Opened`] through
    /// [`Driver::recv_transport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be started at all.
    fn open_transport(
        &mut self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send a text frame on the open transport.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport is open or the send fails.
    fn send_frame(&mut self, frame: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Tear down the transport, if any. Queued signals are discarded.
    fn close_transport(&mut self);

    /// Start allocating a room in the background.
    ///
    /// The outcome is delivered to the App from [`Driver::poll_event`] as
    /// `RoomAllocated` or `AllocationFailed`.
    fn request_room(&mut self);

    /// Put `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable.
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop the driver and clean up resources.
    fn stop(&mut self);
}
