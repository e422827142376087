//! Landing page
//!
//! Shown before entering a room, and when a room page has no usable room.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use roomchat_core::RoomError;

const HELP: [(&str, &str); 4] = [
    ("/create", "create a room on the server"),
    ("/new", "create a room with a local code"),
    ("<code>", "join a room by code"),
    ("/quit", "exit"),
];

/// Render the landing page. `blocked` is set when a room page was opened
/// without a usable room.
pub fn render(frame: &mut Frame, blocked: Option<&RoomError>, area: Rect) {
    let mut lines = Vec::new();

    if let Some(reason) = blocked {
        lines.push(Line::from(Span::styled(
            format!("Cannot open room: {reason}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
    }

    for (input, meaning) in HELP {
        lines.push(Line::from(vec![
            Span::styled(format!("{input:<8}"), Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::raw(meaning),
        ]));
    }

    let block = Block::default().borders(Borders::ALL).title(" Roomchat ");
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
