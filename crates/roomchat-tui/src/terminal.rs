//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The room transport is a
//! WebSocket; rooms are allocated over HTTP on a background task.

use std::{
    future,
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use roomchat_app::{App, AppAction, AppEvent, Driver};
use roomchat_client::{
    ClientConfig, ConnectedTransport, HttpRoomAllocator, RoomAllocator, SystemEnv,
    TransportError, transport,
};
use roomchat_core::{AllocationError, RoomId, TransportEvent};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    InputState, KeyInput,
    clipboard::{self, ClipboardError},
    ui,
};

const TICK: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The system clipboard refused the room link.
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), the room transport
/// (tokio-tungstenite) and room allocation (reqwest). Owns the input state
/// for text editing.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input_state: InputState,
    env: SystemEnv,
    config: ClientConfig,
    allocator: HttpRoomAllocator,
    allocations_tx: mpsc::UnboundedSender<Result<RoomId, AllocationError>>,
    allocations_rx: mpsc::UnboundedReceiver<Result<RoomId, AllocationError>>,
    transport: Option<ConnectedTransport>,
}

impl TerminalDriver {
    /// Create a new terminal driver and switch the terminal to raw mode.
    pub fn new(config: ClientConfig) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let (allocations_tx, allocations_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            input_state: InputState::new(),
            env: SystemEnv::new(),
            allocator: HttpRoomAllocator::new(config.clone()),
            config,
            allocations_tx,
            allocations_rx,
            transport: None,
        })
    }

    /// Convert a crossterm key event to `KeyInput`.
    fn convert_key(key: KeyEvent) -> Option<KeyInput> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(KeyInput::Interrupt);
        }

        match key.code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

/// Next signal from the open transport; pending forever without one.
async fn next_signal(transport: &mut Option<ConnectedTransport>) -> Option<TransportEvent> {
    match transport {
        Some(link) => link.recv().await,
        None => future::pending().await,
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        match Self::convert_key(key_event) {
                            Some(key_input) => {
                                Ok(self.input_state.handle_key(key_input, app, &self.env))
                            },
                            None => Ok(vec![]),
                        }
                    },
                    Some(Ok(Event::Resize(cols, rows))) => {
                        Ok(app.handle(AppEvent::Resize(cols, rows)))
                    },
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(vec![]),
                }
            }

            // Completed room allocations
            Some(result) = self.allocations_rx.recv() => {
                let event = match result {
                    Ok(room_id) => AppEvent::RoomAllocated { room_id },
                    Err(error) => AppEvent::AllocationFailed { error },
                };
                Ok(app.handle(event))
            }

            // Transport signals
            Some(signal) = next_signal(&mut self.transport) => {
                Ok(app.handle(AppEvent::Transport(signal)))
            }

            // Tick timeout
            () = tokio::time::sleep(TICK) => {
                Ok(app.handle(AppEvent::Tick))
            }
        }
    }

    async fn recv_transport(&mut self) -> Option<TransportEvent> {
        self.transport.as_mut().and_then(ConnectedTransport::try_recv)
    }

    async fn open_transport(&mut self, room_id: &RoomId) -> Result<(), Self::Error> {
        self.close_transport();
        let url = self.config.websocket_url(room_id);
        tracing::info!(%url, "opening transport");
        self.transport = Some(transport::open(&url));
        Ok(())
    }

    async fn send_frame(&mut self, frame: String) -> Result<(), Self::Error> {
        let link = self.transport.as_ref().ok_or(TransportError::NotOpen)?;
        link.send(frame).await?;
        Ok(())
    }

    fn close_transport(&mut self) {
        if let Some(link) = self.transport.take() {
            link.stop();
        }
    }

    fn request_room(&mut self) {
        let allocator = self.allocator.clone();
        let results = self.allocations_tx.clone();
        tokio::spawn(async move {
            let result = allocator.create_room().await;
            let _ = results.send(result);
        });
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), Self::Error> {
        clipboard::copy_text(text, &mut stdout())?;
        Ok(())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        self.close_transport();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
