//! Alert popup
//!
//! Blocking message drawn over the rest of the UI until dismissed with Esc.

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const WIDTH_PERCENT: u16 = 80;
const HEIGHT: u16 = 5;

/// Render `text` in a centered popup.
pub fn render(frame: &mut Frame, text: &str, area: Rect) {
    let [row] = Layout::vertical([Constraint::Length(HEIGHT)]).flex(Flex::Center).areas(area);
    let [popup] =
        Layout::horizontal([Constraint::Percentage(WIDTH_PERCENT)]).flex(Flex::Center).areas(row);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Alert (Esc to dismiss) ")
        .border_style(Style::default().fg(Color::Red));
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
