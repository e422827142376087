//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. Lines are parsed into commands on Enter.

use roomchat_app::{App, AppAction, Command, Page};
use roomchat_core::env::Environment;

use crate::commands::{self, Line};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key (dismiss alert, otherwise quit).
    Esc,
    /// Ctrl-C.
    Interrupt,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Input state for the TUI.
///
/// Manages the text input buffer and cursor position. The cursor counts
/// characters, not bytes.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    ///
    /// Returns actions to process (render-only for editing keys, App actions
    /// for entered lines).
    pub fn handle_key<E: Environment>(
        &mut self,
        key: KeyInput,
        app: &mut App,
        env: &E,
    ) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_count() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = self.cursor.saturating_add(1).min(self.char_count()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_count(),
            KeyInput::Enter => return self.handle_enter(app, env),
            KeyInput::Esc if app.alert().is_some() => {
                return app.execute(Command::DismissAlert, env);
            },
            KeyInput::Esc | KeyInput::Interrupt => return app.execute(Command::Quit, env),
        }
        vec![AppAction::Render]
    }

    /// Parse the buffer and apply it to the App.
    ///
    /// Free text sends a message inside a room and joins by code elsewhere.
    fn handle_enter<E: Environment>(&mut self, app: &mut App, env: &E) -> Vec<AppAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        let mut actions = match commands::parse(&text) {
            Ok(Line::Empty) => vec![],
            Ok(Line::Command(command)) => app.execute(command, env),
            Ok(Line::Text(text)) => match app.page() {
                Page::Room(_) => app.execute(Command::SendMessage(text), env),
                Page::Landing | Page::Blocked { .. } => app.execute(Command::JoinRoom(text), env),
            },
            Err(e) => {
                app.set_status(e.to_string());
                vec![]
            },
        };

        // The cleared input line must be redrawn.
        if !actions.contains(&AppAction::Render) {
            actions.push(AppAction::Render);
        }
        actions
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use roomchat_client::SystemEnv;
    use roomchat_core::{ConnectionAction, RoomId, TransportEvent};
    use url::Url;

    use super::*;

    fn app() -> App {
        App::new(Url::parse("http://localhost:8000/room.html").unwrap())
    }

    fn type_line(input: &mut InputState, app: &mut App, text: &str) -> Vec<AppAction> {
        for c in text.chars() {
            input.handle_key(KeyInput::Char(c), app, &SystemEnv);
        }
        input.handle_key(KeyInput::Enter, app, &SystemEnv)
    }

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();
        let mut app = app();

        input.handle_key(KeyInput::Char('h'), &mut app, &SystemEnv);
        input.handle_key(KeyInput::Char('i'), &mut app, &SystemEnv);

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn editing_respects_multibyte_chars() {
        let mut input = InputState::new();
        let mut app = app();

        for c in "héllo".chars() {
            input.handle_key(KeyInput::Char(c), &mut app, &SystemEnv);
        }
        input.handle_key(KeyInput::Left, &mut app, &SystemEnv);
        input.handle_key(KeyInput::Left, &mut app, &SystemEnv);
        input.handle_key(KeyInput::Left, &mut app, &SystemEnv);
        input.handle_key(KeyInput::Backspace, &mut app, &SystemEnv);
        assert_eq!(input.buffer(), "hllo");

        input.handle_key(KeyInput::Delete, &mut app, &SystemEnv);
        assert_eq!(input.buffer(), "hlo");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn cursor_movement() {
        let mut input = InputState::new();
        let mut app = app();

        for c in "abc".chars() {
            input.handle_key(KeyInput::Char(c), &mut app, &SystemEnv);
        }

        input.handle_key(KeyInput::Home, &mut app, &SystemEnv);
        assert_eq!(input.cursor(), 0);

        input.handle_key(KeyInput::End, &mut app, &SystemEnv);
        assert_eq!(input.cursor(), 3);

        input.handle_key(KeyInput::Right, &mut app, &SystemEnv);
        assert_eq!(input.cursor(), 3);

        input.handle_key(KeyInput::Left, &mut app, &SystemEnv);
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn enter_on_landing_joins_by_code() {
        let mut input = InputState::new();
        let mut app = app();

        let actions = type_line(&mut input, &mut app, "a3f9c1");

        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
        let navigated = actions.iter().any(|a| {
            matches!(a, AppAction::Navigate { url } if url.query() == Some("room=a3f9c1"))
        });
        assert!(navigated, "{actions:?}");
    }

    #[test]
    fn enter_in_room_sends_message() {
        let mut input = InputState::new();
        let mut app = app();
        app.open_room(&Url::parse("http://localhost:8000/room.html?room=lobby").unwrap());
        app.handle(roomchat_app::AppEvent::Transport(TransportEvent::Opened));

        let actions = type_line(&mut input, &mut app, "hello");

        assert!(actions.contains(&AppAction::Transport(ConnectionAction::Send("hello".into()))));
        assert_eq!(app.session().unwrap().room_id(), &RoomId::new("lobby").unwrap());
    }

    #[test]
    fn parse_error_sets_status() {
        let mut input = InputState::new();
        let mut app = app();

        let actions = type_line(&mut input, &mut app, "/dance");

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.status_message(), Some("Unknown command: /dance"));
    }

    #[test]
    fn esc_dismisses_alert_before_quitting() {
        let mut input = InputState::new();
        let mut app = app();
        type_line(&mut input, &mut app, "bad code");
        assert!(app.alert().is_some());

        input.handle_key(KeyInput::Esc, &mut app, &SystemEnv);
        assert!(app.alert().is_none());

        let actions = input.handle_key(KeyInput::Esc, &mut app, &SystemEnv);
        assert!(actions.contains(&AppAction::Quit));
    }
}
