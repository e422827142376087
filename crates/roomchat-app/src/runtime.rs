//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: Page and session state machine
//! - [`Driver`]: Platform-specific I/O
//!
//! Each cycle polls the driver for input, drains queued transport signals
//! into the active session, and executes the resulting actions until none
//! remain.

use roomchat_core::{ConnectionAction, TransportEvent};

use crate::{App, AppAction, AppEvent, Driver};

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
}

impl<D: Driver> Runtime<D> {
    /// Create a new runtime.
    pub fn new(driver: D, app: App) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop until the App quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(self) -> Result<(), D::Error> {
        self.run_with(Vec::new()).await
    }

    /// Run the main event loop, executing `initial_actions` first.
    ///
    /// Used to start directly on a room page or with a pending allocation.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run_with(mut self, initial_actions: Vec<AppAction>) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let mut should_quit = self.process_actions(initial_actions).await?;
        while !should_quit {
            should_quit = self.step().await?;
        }

        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        let actions = self.driver.poll_event(&mut self.app).await?;
        if self.process_actions(actions).await? {
            return Ok(true);
        }

        while let Some(event) = self.driver.recv_transport().await {
            let actions = self.app.handle(AppEvent::Transport(event));
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Execute actions returned by the App, including any they cause.
    ///
    /// Returns `true` if should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn process_actions(
        &mut self,
        initial_actions: Vec<AppAction>,
    ) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::AllocateRoom => self.driver.request_room(),
                    AppAction::Navigate { url } => {
                        pending_actions.extend(self.app.open_room(&url));
                    },
                    AppAction::CopyRoomLink { url } => {
                        let event = match self.driver.copy_to_clipboard(url.as_str()) {
                            Ok(()) => AppEvent::LinkCopied,
                            Err(e) => AppEvent::CopyFailed { url, reason: e.to_string() },
                        };
                        pending_actions.extend(self.app.handle(event));
                    },
                    AppAction::Transport(action) => {
                        pending_actions.extend(self.execute_transport(action).await);
                    },
                }
            }
        }
        Ok(false)
    }

    /// Execute a connection action.
    ///
    /// Transport failures are reported back to the App as transport errors
    /// rather than aborting the loop.
    async fn execute_transport(&mut self, action: ConnectionAction) -> Vec<AppAction> {
        match action {
            ConnectionAction::Open { room_id } => {
                match self.driver.open_transport(&room_id).await {
                    Ok(()) => vec![],
                    Err(e) => {
                        tracing::warn!(room = %room_id, "failed to open transport: {e}");
                        let detail = e.to_string();
                        self.app.handle(AppEvent::Transport(TransportEvent::Errored { detail }))
                    },
                }
            },
            ConnectionAction::Send(frame) => {
                if let Err(e) = self.driver.send_frame(frame).await {
                    tracing::warn!("failed to send frame: {e}");
                }
                vec![]
            },
            ConnectionAction::Close => {
                self.driver.close_transport();
                vec![]
            },
        }
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
