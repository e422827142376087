//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`roomchat_app::Runtime`] orchestration code runs in both production and
//! simulation. User input is scripted as [`Command`]s; the transport and the
//! room service are backed by a [`SharedRelay`].

use std::collections::VecDeque;

use roomchat_app::{App, AppAction, AppEvent, Command, Driver};
use roomchat_core::{AllocationError, RoomId, TransportEvent};

use crate::{
    SimEnv,
    invariants::{InvariantRegistry, SystemSnapshot},
    sim_relay::{ClientId, SharedRelay, lock_relay},
};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Scripted input step.
#[derive(Debug, Clone)]
pub enum SimInput {
    /// A user command.
    Command(Command),
    /// A raw App event.
    Event(AppEvent),
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`roomchat_app::Runtime`]
/// orchestration code runs in both production TUI and simulation tests.
pub struct SimDriver {
    relay: SharedRelay,
    env: SimEnv,
    /// Relay connection of the open transport.
    link: Option<ClientId>,
    inputs: VecDeque<SimInput>,
    /// Allocation result waiting to be delivered on the next poll.
    pending_allocation: Option<Result<RoomId, AllocationError>>,
    /// Frames handed to the transport, in order.
    sent: Vec<String>,
    /// Whether clipboard writes succeed.
    clipboard_available: bool,
    clipboard: Option<String>,
    /// Refuse to open transports, as if the server were down.
    refuse_open: bool,
    renders: usize,
    invariants: Option<InvariantRegistry>,
}

impl SimDriver {
    /// Create a driver attached to `relay`.
    pub fn new(relay: SharedRelay, env: SimEnv) -> Self {
        Self {
            relay,
            env,
            link: None,
            inputs: VecDeque::new(),
            pending_allocation: None,
            sent: Vec::new(),
            clipboard_available: true,
            clipboard: None,
            refuse_open: false,
            renders: 0,
            invariants: None,
        }
    }

    /// Enable invariant checking after every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Queue a user command.
    pub fn push_command(&mut self, command: Command) {
        self.inputs.push_back(SimInput::Command(command));
    }

    /// Queue an App event.
    pub fn push_event(&mut self, event: AppEvent) {
        self.inputs.push_back(SimInput::Event(event));
    }

    /// Make clipboard writes fail (or succeed again).
    pub fn set_clipboard_available(&mut self, available: bool) {
        self.clipboard_available = available;
    }

    /// Make transport opens fail (or succeed again).
    pub fn set_refuse_open(&mut self, refuse: bool) {
        self.refuse_open = refuse;
    }

    /// Whether scripted input or a delivery is still pending.
    pub fn has_pending(&self) -> bool {
        if !self.inputs.is_empty() || self.pending_allocation.is_some() {
            return true;
        }
        self.link.is_some_and(|link| lock_relay(&self.relay).has_queued(link))
    }

    /// Relay connection of the open transport.
    pub fn link(&self) -> Option<ClientId> {
        self.link
    }

    /// Frames handed to the transport, in order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Last text put on the clipboard.
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Number of render calls.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Check invariants against App state.
    pub fn check_invariants(&self, app: &App, context: &str) {
        if let Some(ref registry) = self.invariants {
            let snapshot = SystemSnapshot::single(crate::ClientSnapshot::from_app(0, app));
            registry.assert_all(&snapshot, context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        if let Some(result) = self.pending_allocation.take() {
            let event = match result {
                Ok(room_id) => AppEvent::RoomAllocated { room_id },
                Err(error) => AppEvent::AllocationFailed { error },
            };
            return Ok(app.handle(event));
        }

        match self.inputs.pop_front() {
            Some(SimInput::Command(command)) => Ok(app.execute(command, &self.env)),
            Some(SimInput::Event(event)) => Ok(app.handle(event)),
            None => Ok(vec![]),
        }
    }

    async fn recv_transport(&mut self) -> Option<TransportEvent> {
        let link = self.link?;
        lock_relay(&self.relay).poll(link)
    }

    async fn open_transport(&mut self, room_id: &RoomId) -> Result<(), Self::Error> {
        if self.refuse_open {
            return Err(SimDriverError("connection refused".into()));
        }

        let mut relay = lock_relay(&self.relay);
        if let Some(old) = self.link.take() {
            relay.disconnect(old);
        }
        self.link = Some(relay.connect(room_id));
        Ok(())
    }

    async fn send_frame(&mut self, frame: String) -> Result<(), Self::Error> {
        let link = self.link.ok_or_else(|| SimDriverError("no transport".into()))?;
        self.sent.push(frame.clone());

        if lock_relay(&self.relay).send(link, &frame) {
            Ok(())
        } else {
            Err(SimDriverError("transport closed".into()))
        }
    }

    fn close_transport(&mut self) {
        if let Some(link) = self.link.take() {
            lock_relay(&self.relay).disconnect(link);
        }
    }

    fn request_room(&mut self) {
        self.pending_allocation = Some(lock_relay(&self.relay).allocate_room());
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), Self::Error> {
        if !self.clipboard_available {
            return Err(SimDriverError("clipboard unavailable".into()));
        }
        self.clipboard = Some(text.to_owned());
        Ok(())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.renders += 1;
        self.check_invariants(app, "after render");
        Ok(())
    }

    fn stop(&mut self) {
        self.close_transport();
    }
}
