//! # TitleBar Component
//!
//! One-line status bar across the top of the chat view.
//!
//! ## Layout
//!
//! ```text
//! J.A.R.V.I.S. | <status> | <notice> | ↓ New
//! ```
//!
//! - `status`: request and attachment status from `App` ("Online", "Thinking…",
//!   "2 images attached")
//! - `notice`: one-off message (speech permission, unsupported engine, export
//!   path), shown in yellow until the next send
//! - `↓ New`: a message arrived while the transcript was scrolled away
//!
//! Every field is a prop; the bar keeps no state of its own.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const APP_NAME: &str = "J.A.R.V.I.S.";

pub struct TitleBar<'a> {
    pub status_message: &'a str,
    pub notice: Option<&'a str>,
    pub has_new_message: bool,
    pub recording: bool,
}

impl<'a> TitleBar<'a> {
    pub fn new(
        status_message: &'a str,
        notice: Option<&'a str>,
        has_new_message: bool,
        recording: bool,
    ) -> Self {
        Self {
            status_message,
            notice,
            has_new_message,
            recording,
        }
    }

    fn line(&self) -> Line<'a> {
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![Span::styled(
            APP_NAME,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];

        if !self.status_message.is_empty() {
            spans.push(sep());
            spans.push(Span::raw(self.status_message));
        }
        if self.recording {
            spans.push(sep());
            spans.push(Span::styled("● mic", Style::default().fg(Color::Red)));
        }
        if let Some(notice) = self.notice {
            spans.push(sep());
            spans.push(Span::styled(notice, Style::default().fg(Color::Yellow)));
        }
        if self.has_new_message {
            spans.push(sep());
            spans.push(Span::styled(
                "↓ New",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(title_bar: &mut TitleBar<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_new_message() {
        let text = draw(&mut TitleBar::new("Online", None, true, false));
        assert!(text.contains("J.A.R.V.I.S."));
        assert!(text.contains("Online"));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_shows_notice_and_mic() {
        let text = draw(&mut TitleBar::new(
            "Online",
            Some("Please allow microphone access"),
            false,
            true,
        ));
        assert!(text.contains("microphone access"));
        assert!(text.contains("● mic"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_without_status_has_no_separator() {
        let text = draw(&mut TitleBar::new("", None, false, false));
        assert!(text.contains("J.A.R.V.I.S."));
        assert!(!text.contains('|'));
    }
}
