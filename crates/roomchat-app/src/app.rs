//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the
//! interactive state of the client completely decoupled from I/O.
//!
//! This is a pure state machine: user commands and [`crate::AppEvent`] inputs
//! produce [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Pages
//!
//! ```text
//! ┌─────────┐ create / join ┌──────────┐ open_room ┌────────────┐
//! │ Landing │──────────────>│ Navigate │──────────>│ Room       │
//! └─────────┘               └──────────┘     │     └────────────┘
//!      ↑                                     │ no room
//!      │ leave_room                          ↓
//!      │                               ┌────────────┐
//!      └───────────────────────────────│ Blocked    │
//!                                      └────────────┘
//! ```

use roomchat_core::{
    ConnectionError, ConnectionState, RoomError, RoomId, env::Environment, resolve_active_room,
    room_page_url,
};
use url::Url;

use crate::{AppAction, AppEvent, Session, SessionError};

/// Ticks a transient status message stays visible (about two seconds).
pub const COPY_ACK_TICKS: u32 = 20;

/// Current page.
#[derive(Debug, Clone)]
pub enum Page {
    /// Create or join a room.
    Landing,
    /// Inside a room.
    Room(Session),
    /// Room page opened without a usable room. No session exists.
    Blocked {
        /// Why the room could not be resolved.
        reason: RoomError,
    },
}

/// Application state machine.
///
/// Pure state machine that processes commands and events and produces
/// actions. No I/O dependencies, fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Current page.
    page: Page,
    /// Room page URL without query; room links are built on top of it.
    page_base: Url,
    /// A room allocation is pending.
    allocating: bool,
    /// Blocking alert. `None` if no alert.
    alert: Option<String>,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Ticks until the status message clears. Zero keeps it until replaced.
    status_ttl: u32,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
}

impl App {
    /// Create an App on the landing page.
    pub fn new(page_base: Url) -> Self {
        Self {
            page: Page::Landing,
            page_base,
            allocating: false,
            alert: None,
            status_message: None,
            status_ttl: 0,
            terminal_size: (80, 24),
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => {
                if self.status_ttl == 0 {
                    return vec![];
                }
                self.status_ttl -= 1;
                if self.status_ttl == 0 {
                    self.status_message = None;
                    return vec![AppAction::Render];
                }
                vec![]
            },
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::RoomAllocated { room_id } => {
                if !self.allocating || matches!(self.page, Page::Room(_)) {
                    tracing::debug!(room = %room_id, "discarding stale room allocation");
                    return vec![];
                }
                self.allocating = false;
                self.status_message = None;
                vec![self.navigate_to(&room_id)]
            },
            AppEvent::AllocationFailed { error } => {
                if !self.allocating {
                    tracing::debug!(%error, "discarding stale allocation failure");
                    return vec![];
                }
                tracing::warn!(%error, transient = error.is_transient(), "room allocation failed");
                self.allocating = false;
                self.status_message = None;
                self.alert = Some(format!("Could not create a room: {error}"));
                vec![AppAction::Render]
            },
            AppEvent::Transport(event) => {
                let Page::Room(session) = &mut self.page else {
                    tracing::debug!(?event, "transport signal without a session");
                    return vec![];
                };
                session.handle_transport(event);
                vec![AppAction::Render]
            },
            AppEvent::LinkCopied => {
                self.set_transient_status("Room link copied");
                vec![AppAction::Render]
            },
            AppEvent::CopyFailed { url, reason } => {
                tracing::debug!(%reason, "clipboard write failed");
                self.alert = Some(format!("Copy this link to share the room: {url}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Ask the room service for a new room.
    ///
    /// Does nothing while a previous allocation is pending.
    pub fn create_room(&mut self) -> Vec<AppAction> {
        if self.allocating {
            tracing::debug!("room allocation already pending");
            return vec![];
        }

        self.allocating = true;
        self.status_message = Some("Creating room...".to_owned());
        self.status_ttl = 0;
        vec![AppAction::AllocateRoom, AppAction::Render]
    }

    /// Create a room locally with a random token, skipping the room service.
    pub fn create_local_room<E: Environment>(&mut self, env: &E) -> Vec<AppAction> {
        let room_id = RoomId::generate(env);
        vec![self.navigate_to(&room_id)]
    }

    /// Join a room by its code.
    ///
    /// Blank input is ignored. An invalid code raises an alert.
    pub fn join_room(&mut self, code: &str) -> Vec<AppAction> {
        match RoomId::new(code) {
            Ok(room_id) => vec![self.navigate_to(&room_id)],
            Err(RoomError::Missing) => vec![],
            Err(err) => {
                self.alert = Some(format!("Invalid room code: {err}"));
                vec![AppAction::Render]
            },
        }
    }

    /// Open the room page at `url`.
    ///
    /// Any current session is torn down first and a pending allocation is
    /// abandoned. If the URL names no usable room the page is blocked and no
    /// connection is attempted.
    pub fn open_room(&mut self, url: &Url) -> Vec<AppAction> {
        let mut actions = self.teardown();
        if self.allocating {
            tracing::debug!("abandoning pending room allocation");
            self.allocating = false;
            self.status_message = None;
        }

        match resolve_active_room(url) {
            Ok(room_id) => {
                tracing::info!(room = %room_id, "entering room");
                let mut session = Session::new(room_id);
                match session.start() {
                    Ok(started) => actions.extend(started.into_iter().map(AppAction::from)),
                    Err(err) => tracing::warn!(%err, "fresh session refused to start"),
                }
                self.page = Page::Room(session);
            },
            Err(reason) => {
                tracing::info!(%url, %reason, "room page opened without a room");
                self.alert = Some(format!("Cannot open room: {reason}"));
                self.page = Page::Blocked { reason };
            },
        }

        actions.push(AppAction::Render);
        actions
    }

    /// Send a chat message in the active room.
    ///
    /// Blank input is ignored. When not connected the message is discarded
    /// and a status message says so.
    pub fn send_message(&mut self, text: &str) -> Vec<AppAction> {
        let Page::Room(session) = &mut self.page else {
            return vec![];
        };

        match session.append_local(text) {
            Ok(sent) => {
                let mut actions: Vec<AppAction> = sent.into_iter().map(AppAction::from).collect();
                actions.push(AppAction::Render);
                actions
            },
            Err(SessionError::EmptyMessage) => vec![],
            Err(err @ (SessionError::NotConnected { .. } | SessionError::Connection(_))) => {
                tracing::debug!(%err, "message discarded");
                self.status_message = Some("Not connected; message not sent".to_owned());
                self.status_ttl = 0;
                vec![AppAction::Render]
            },
        }
    }

    /// Reconnect the active session after a disconnect or error.
    pub fn reconnect(&mut self) -> Vec<AppAction> {
        let Page::Room(session) = &mut self.page else {
            return vec![];
        };

        match session.start() {
            Ok(started) => {
                self.status_message = None;
                let mut actions: Vec<AppAction> =
                    started.into_iter().map(AppAction::from).collect();
                actions.push(AppAction::Render);
                actions
            },
            Err(err) => {
                tracing::debug!(%err, "reconnect refused");
                let message = match err {
                    SessionError::Connection(ConnectionError::AlreadyActive {
                        state: ConnectionState::Connecting,
                    }) => "Already connecting",
                    _ => "Already connected",
                };
                self.set_transient_status(message);
                vec![AppAction::Render]
            },
        }
    }

    /// Leave the current room and return to the landing page.
    pub fn leave_room(&mut self) -> Vec<AppAction> {
        if matches!(self.page, Page::Landing) {
            return vec![];
        }

        let mut actions = self.teardown();
        self.page = Page::Landing;
        self.status_message = None;
        actions.push(AppAction::Render);
        actions
    }

    /// Copy the active room's link to the clipboard.
    pub fn copy_room_link(&self) -> Vec<AppAction> {
        match self.room_link() {
            Some(url) => vec![AppAction::CopyRoomLink { url }],
            None => vec![],
        }
    }

    /// Dismiss the blocking alert.
    pub fn dismiss_alert(&mut self) -> Vec<AppAction> {
        if self.alert.take().is_some() { vec![AppAction::Render] } else { vec![] }
    }

    /// Quit the application, closing any open transport.
    pub fn quit(&mut self) -> Vec<AppAction> {
        let mut actions = self.teardown();
        actions.push(AppAction::Quit);
        actions
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_ttl = 0;
    }

    fn set_transient_status(&mut self, message: &str) {
        self.status_message = Some(message.to_owned());
        self.status_ttl = COPY_ACK_TICKS;
    }

    fn navigate_to(&self, room_id: &RoomId) -> AppAction {
        AppAction::Navigate { url: room_page_url(&self.page_base, room_id) }
    }

    fn teardown(&mut self) -> Vec<AppAction> {
        match &mut self.page {
            Page::Room(session) => {
                tracing::info!(room = %session.room_id(), "leaving room");
                session.close().into_iter().map(AppAction::from).collect()
            },
            Page::Landing | Page::Blocked { .. } => vec![],
        }
    }

    /// Current page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Active session. `None` unless on a room page.
    pub fn session(&self) -> Option<&Session> {
        match &self.page {
            Page::Room(session) => Some(session),
            Page::Landing | Page::Blocked { .. } => None,
        }
    }

    /// Shareable link of the active room. `None` unless on a room page.
    pub fn room_link(&self) -> Option<Url> {
        self.session().map(|session| room_page_url(&self.page_base, session.room_id()))
    }

    /// Room page base URL.
    pub fn page_base(&self) -> &Url {
        &self.page_base
    }

    /// Whether a room allocation is pending.
    pub fn is_allocating(&self) -> bool {
        self.allocating
    }

    /// Blocking alert text. `None` if no alert.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }
}
