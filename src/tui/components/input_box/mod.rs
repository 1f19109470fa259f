//! # InputBox Component
//!
//! Message input with staged-attachment and microphone indicators.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste, and cursor movement
//! - Emit `Submit` on Enter (or `Ctrl+J` for a newline)
//! - Grow and shrink through the core `InputNormalizer`, which debounces
//!   small edits and applies big ones at once
//! - Ignore editing while a request is in flight (`disabled` prop)
//!
//! ## State Management
//!
//! The text buffer and normalizer are internal state. `disabled`,
//! `attachments`, `recording` and `dimmed` are props synced from `App`
//! every frame.

mod editor;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::input::InputNormalizer;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use editor::{EditBuffer, cursor_cell, natural_rows, wrap_rows};

/// Left and right borders.
const HORIZONTAL_OVERHEAD: u16 = 2;
/// Top and bottom borders.
const VERTICAL_OVERHEAD: u16 = 2;
const DEFAULT_WIDTH: u16 = 80;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    buffer: EditBuffer,
    normalizer: InputNormalizer,
    /// First visible row when the text is taller than the box.
    scroll_offset: u16,
    last_width: u16,
    /// Prop: a request is in flight.
    pub disabled: bool,
    /// Prop: number of staged images.
    pub attachments: usize,
    /// Prop: speech capture is running.
    pub recording: bool,
    /// Prop: cursor mode is active.
    pub dimmed: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: EditBuffer::default(),
            normalizer: InputNormalizer::new(),
            scroll_offset: 0,
            last_width: DEFAULT_WIDTH,
            disabled: false,
            attachments: 0,
            recording: false,
            dimmed: false,
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Total height including borders.
    pub fn calculate_height(&self) -> u16 {
        self.normalizer.lines() + VERTICAL_OVERHEAD
    }

    /// Replace the text (speech transcripts) and remeasure at once.
    pub fn set_text(&mut self, text: String) {
        self.buffer.set(text);
        self.remeasure(Instant::now());
    }

    pub fn clear(&mut self) {
        self.buffer.take();
        self.normalizer.reset();
        self.scroll_offset = 0;
    }

    /// Apply a debounced resize if it has come due. Returns true when the
    /// height changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.normalizer.poll(now)
    }

    pub fn resize_pending(&self) -> bool {
        self.normalizer.is_pending()
    }

    fn inner_width(&self) -> u16 {
        self.last_width.saturating_sub(HORIZONTAL_OVERHEAD).max(1)
    }

    fn remeasure(&mut self, now: Instant) {
        let width = self.inner_width();
        let rows = natural_rows(self.buffer.text(), self.buffer.pos(), width);
        self.normalizer.observe(self.buffer.text(), rows, now);
    }

    fn edited(&mut self, changed: bool) -> Option<InputEvent> {
        changed.then(|| {
            self.remeasure(Instant::now());
            InputEvent::ContentChanged
        })
    }

    fn moved(changed: bool) -> Option<InputEvent> {
        changed.then_some(InputEvent::ContentChanged)
    }

    fn title(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(if self.disabled {
            " Waiting for reply… "
        } else {
            " Message "
        })];
        if self.attachments > 0 {
            let label = match self.attachments {
                1 => " 📎 1 image ".to_string(),
                n => format!(" 📎 {n} images "),
            };
            spans.push(Span::styled(label, Style::default().fg(Color::Yellow)));
        }
        if self.recording {
            spans.push(Span::styled(
                " ● Listening ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.width != self.last_width {
            self.last_width = area.width;
            self.remeasure(Instant::now());
        }

        let width = self.inner_width();
        let visible = area.height.saturating_sub(VERTICAL_OVERHEAD).max(1);
        let (cursor_row, cursor_col) =
            cursor_cell(self.buffer.text(), self.buffer.pos(), width);

        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + visible {
            self.scroll_offset = cursor_row + 1 - visible;
        }

        let rows: Vec<Line> = wrap_rows(self.buffer.text(), width)
            .into_iter()
            .skip(self.scroll_offset as usize)
            .take(visible as usize)
            .map(Line::from)
            .collect();

        let border = if self.disabled || self.dimmed {
            Color::DarkGray
        } else {
            Color::Cyan
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(self.title());

        let text_color = if self.disabled { Color::DarkGray } else { Color::White };
        frame.render_widget(
            Paragraph::new(rows)
                .block(block)
                .style(Style::default().fg(text_color)),
            area,
        );

        if !self.disabled && !self.dimmed {
            frame.set_cursor_position((
                area.x + 1 + cursor_col,
                area.y + 1 + cursor_row.saturating_sub(self.scroll_offset),
            ));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert_char(*c);
                self.edited(true)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(&text.replace("\r\n", "\n"));
                self.edited(true)
            }
            TuiEvent::Backspace => {
                let changed = self.buffer.backspace();
                self.edited(changed)
            }
            TuiEvent::Delete => {
                let changed = self.buffer.delete();
                self.edited(changed)
            }
            TuiEvent::CursorLeft => Self::moved(self.buffer.left()),
            TuiEvent::CursorRight => Self::moved(self.buffer.right()),
            TuiEvent::CursorHome => Self::moved(self.buffer.home()),
            TuiEvent::CursorEnd => Self::moved(self.buffer.end()),
            TuiEvent::WordLeft => Self::moved(self.buffer.word_left()),
            TuiEvent::WordRight => Self::moved(self.buffer.word_right()),
            TuiEvent::CursorUp => Self::moved(self.buffer.vertical(true)),
            TuiEvent::CursorDown => Self::moved(self.buffer.vertical(false)),
            TuiEvent::Submit => {
                if self.buffer.text().trim().is_empty() && self.attachments == 0 {
                    return None;
                }
                let text = self.buffer.take();
                self.normalizer.reset();
                self.scroll_offset = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        input
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();
        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.text(), "ab");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_submit_clears_and_resets_height() {
        let mut input = typed("hello");
        input.handle_event(&TuiEvent::Paste("\n\n\n".into()));
        assert!(input.calculate_height() > 1 + VERTICAL_OVERHEAD);

        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "hello\n\n\n"),
            other => panic!("Expected Submit, got {other:?}"),
        }
        assert!(input.text().is_empty());
        assert_eq!(input.calculate_height(), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_blank_submit_needs_an_attachment() {
        let mut input = typed("   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);

        input.attachments = 1;
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("   ".into()))
        );
    }

    #[test]
    fn test_disabled_ignores_everything() {
        let mut input = typed("hi");
        input.disabled = true;
        assert_eq!(input.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.text(), "hi");
    }

    #[test]
    fn test_newline_grows_immediately_and_caps() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("1\n2\n3".into()));
        assert_eq!(input.calculate_height(), 3 + VERTICAL_OVERHEAD);

        input.handle_event(&TuiEvent::Paste("\n4\n5\n6\n7\n8".into()));
        assert_eq!(input.calculate_height(), 5 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_set_text_replaces_buffer() {
        let mut input = typed("old");
        input.set_text("turn on the lights".into());
        assert_eq!(input.text(), "turn on the lights");
        input.clear();
        assert!(input.text().is_empty());
    }

    #[test]
    fn test_render_shows_attachment_count_and_listening() {
        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        let mut input = typed("hello");
        input.attachments = 2;
        input.recording = true;

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("2 images"), "{text}");
        assert!(text.contains("Listening"), "{text}");
        assert!(text.contains("hello"), "{text}");
    }

    #[test]
    fn test_render_scrolls_to_keep_cursor_visible() {
        let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("first\nsecond\nthird".into()));

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("third"), "{text}");
        assert!(!text.contains("first"), "{text}");
    }
}
