//! # Landing Page Component
//!
//! Shown while the transcript is empty: the time-of-day greeting, its status
//! line, and the key bindings. Long lines are wrapped with `textwrap` so each
//! wrapped row can be centered on its own.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::greeting::Greeting;
use crate::tui::component::Component;

const HINTS: &str =
    "Enter send · Ctrl+J newline · Ctrl+V image · Ctrl+T speak · Ctrl+N new chat · Ctrl+E export";

pub struct LandingPage<'a> {
    pub greeting: &'a Greeting,
}

impl<'a> LandingPage<'a> {
    pub fn new(greeting: &'a Greeting) -> Self {
        Self { greeting }
    }

    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = width.max(1) as usize;
        let wrapped = |text: &str, style: Style| -> Vec<Line<'static>> {
            textwrap::wrap(text, width)
                .into_iter()
                .map(|row| Line::from(Span::styled(row.into_owned(), style)))
                .collect()
        };

        let mut lines = wrapped(
            self.greeting.heading,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        );
        lines.extend(wrapped(
            self.greeting.status,
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ));
        lines.push(Line::default());
        lines.extend(wrapped(HINTS, Style::default().fg(Color::DarkGray)));
        lines
    }
}

impl Component for LandingPage<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines(area.width);
        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered);
    }
}
