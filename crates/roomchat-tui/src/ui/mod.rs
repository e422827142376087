//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! returning widget trees.

mod alert;
mod chat;
mod input;
mod landing;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};
use roomchat_app::{App, Page};

use crate::InputState;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input_state: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    match app.page() {
        Page::Room(session) => chat::render(frame, session, *main_area),
        Page::Landing => landing::render(frame, None, *main_area),
        Page::Blocked { reason } => landing::render(frame, Some(reason), *main_area),
    }
    input::render(frame, input_state, *input_area);
    status::render(frame, app, *status_area);

    if let Some(text) = app.alert() {
        alert::render(frame, text, frame.area());
    }
}
