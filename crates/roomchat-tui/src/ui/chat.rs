//! Chat area
//!
//! Displays the transcript of the active room.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use roomchat_app::{Entry, Origin, Session};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, session: &Session, area: Rect) {
    let title = format!(" #{} ", session.room_id());
    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = if session.transcript().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet. Share the room link with /copy",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        session.transcript().iter().map(entry_line).map(ListItem::new).collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn entry_line(entry: &Entry) -> Line<'_> {
    match entry {
        Entry::Chat(chat) => {
            let (sender, color) = match chat.origin {
                Origin::Local => ("You:", Color::Cyan),
                Origin::Remote => ("Peer:", Color::Green),
            };
            Line::from(vec![
                Span::styled(sender, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::raw(chat.text.as_str()),
            ])
        },
        Entry::System(system) => Line::from(Span::styled(
            format!("* {}", system.text),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    }
}
