//! Status bar
//!
//! Displays connection status, the room link and the latest status message.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use roomchat_app::App;
use roomchat_core::LinkStatus;

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    match app.session() {
        Some(session) => {
            spans.push(match session.status() {
                LinkStatus::Connected => Span::styled(
                    "Connected",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                LinkStatus::Disconnected => {
                    Span::styled("Disconnected", Style::default().fg(Color::Red))
                },
            });
            if let Some(link) = app.room_link() {
                spans.push(Span::raw(format!(" | {link}")));
            }
        },
        None if app.is_allocating() => {
            spans.push(Span::styled("Creating room...", Style::default().fg(Color::Yellow)));
        },
        None => spans.push(Span::raw("No room")),
    }

    if let Some(message) = app.status_message() {
        spans.push(Span::styled(format!(" | {message}"), Style::default().fg(Color::Yellow)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
