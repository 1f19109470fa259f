use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::conversation::Role;
use crate::core::state::{APOLOGY_TEXT, TranscriptEntry};
use crate::tui::component::Component;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Pulse intensity threshold above which the border transitions from normal to BOLD.
const PULSE_BOLD_THRESHOLD: f32 = 0.6;
/// Pulse intensity threshold above which the border transitions from DIM to normal.
const PULSE_NORMAL_THRESHOLD: f32 = 0.2;

pub const USER_LABEL: &str = "you";
pub const ASSISTANT_LABEL: &str = "J.A.R.V.I.S.";

/// A stateless component that renders one transcript entry.
///
/// # Design
///
/// `Message` is a **transient component**: it's created fresh each frame with the data
/// it needs to render. Hover and selection come from the parent `MessageList`.
///
/// # Styling
///
/// - **User** (green): messages from the human
/// - **Assistant** (blue): replies, rendered from their Markdown/code/image blocks
/// - **Thinking** (dark gray, italic): placeholder while a request is in flight,
///   its border breathing with `pulse_intensity`
/// - **Apology** (red): shown for a few seconds after a failed request
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) lays the same `Text` out with the
/// same `Paragraph` wrapping the widget uses, so the parent can place messages
/// in its scroll view without rendering them first.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub entry: &'a TranscriptEntry,
    pub is_hovered: bool,
    pub is_selected: bool,
    /// Current pulse intensity (0.0 to 1.0) for the thinking placeholder
    pub pulse_intensity: f32,
}

impl<'a> Message<'a> {
    pub fn new(
        entry: &'a TranscriptEntry,
        is_hovered: bool,
        is_selected: bool,
        pulse_intensity: f32,
    ) -> Self {
        Self {
            entry,
            is_hovered,
            is_selected,
            pulse_intensity,
        }
    }

    pub fn calculate_height(entry: &TranscriptEntry, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        let text = content(entry);
        if text.lines.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let lines = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        (lines as u16).max(1) + VERTICAL_OVERHEAD
    }
}

fn label(entry: &TranscriptEntry) -> &'static str {
    match entry {
        TranscriptEntry::Message(m) if m.role == Role::User => USER_LABEL,
        _ => ASSISTANT_LABEL,
    }
}

fn entry_style(entry: &TranscriptEntry) -> Style {
    match entry {
        TranscriptEntry::Message(m) => match m.role {
            Role::User => Style::default().fg(Color::Green),
            Role::Assistant => Style::default().fg(Color::Blue),
        },
        TranscriptEntry::Thinking => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        TranscriptEntry::Apology => Style::default().fg(Color::Red),
    }
}

fn content(entry: &TranscriptEntry) -> Text<'static> {
    match entry {
        TranscriptEntry::Message(m) => {
            let fg = entry_style(entry).fg.unwrap_or(Color::Reset);
            markdown::render_blocks(&m.blocks, fg, m.role == Role::Assistant)
        }
        TranscriptEntry::Thinking => Text::from(Line::from(Span::styled(
            "Thinking…",
            entry_style(entry),
        ))),
        TranscriptEntry::Apology => {
            Text::from(Line::from(Span::styled(APOLOGY_TEXT, entry_style(entry))))
        }
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = entry_style(self.entry);

        // Selection overrides hover: cyan border for selected, bright for hover, dim otherwise
        let mut border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else if self.is_hovered {
            style
        } else {
            style.add_modifier(Modifier::DIM)
        };

        if self.pulse_intensity > PULSE_BOLD_THRESHOLD {
            border_style = border_style
                .remove_modifier(Modifier::DIM)
                .add_modifier(Modifier::BOLD);
        } else if self.pulse_intensity > PULSE_NORMAL_THRESHOLD {
            border_style = border_style.remove_modifier(Modifier::DIM);
        }

        let block = Block::bordered()
            .title(label(self.entry))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(content(self.entry))
            .wrap(Wrap { trim: false })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
