//! # History Sidebar Component
//!
//! Previews of the messages sent in this chat, newest first. Stateless; the
//! previews are already truncated by the core.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, List, ListItem};

use crate::tui::component::Component;

/// Terminals narrower than this get no sidebar.
pub const MIN_TERMINAL_WIDTH: u16 = 90;
/// Fits a 25-character preview plus ellipsis inside the borders.
pub const SIDEBAR_WIDTH: u16 = 30;

pub struct HistorySidebar<'a> {
    pub entries: &'a [String],
}

impl<'a> HistorySidebar<'a> {
    pub fn new(entries: &'a [String]) -> Self {
        Self { entries }
    }
}

impl Component for HistorySidebar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" History ");

        let items: Vec<ListItem> = if self.entries.is_empty() {
            vec![ListItem::new(Line::styled(
                "No messages yet",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.entries
                .iter()
                .map(|e| ListItem::new(Line::raw(e.as_str())))
                .collect()
        };

        frame.render_widget(List::new(items).block(block), area);
    }
}
