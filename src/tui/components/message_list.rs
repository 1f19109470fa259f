//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Display the transcript entries (messages, thinking placeholder, apology)
//! - Stick to the bottom until the user scrolls away
//! - Raise the "new message" indicator when an entry arrives while the user
//!   is more than [`NEW_MESSAGE_THRESHOLD`] rows above the bottom
//! - Hit testing for mouse interactions
//! - Cache message heights between frames
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//! `Component::render` takes `&mut self`, so the layout cache and scroll state
//! are updated during the render pass.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::TranscriptEntry;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Rows above the bottom beyond which a new entry raises the indicator
/// instead of going unnoticed.
pub const NEW_MESSAGE_THRESHOLD: u16 = 5;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// An entry arrived while the user was scrolled away.
    pub has_new_message: bool,
    /// Currently selected entry index (hover or keyboard navigation)
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Entry count at the previous render.
    seen_entries: usize,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            has_new_message: false,
            selected_index: None,
            viewport_height: 0,
            seen_entries: 0,
        }
    }

    /// Forget everything (new chat).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn total_height(&self) -> u16 {
        self.layout.heights.iter().sum()
    }

    fn max_offset(&self) -> u16 {
        self.total_height().saturating_sub(self.viewport_height)
    }

    /// Rows between the bottom of the viewport and the end of the content.
    pub fn distance_from_bottom(&self) -> u16 {
        self.max_offset()
            .saturating_sub(self.scroll_state.offset().y)
    }

    /// Jump to the newest entry and resume following new content.
    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.has_new_message = false;
        self.scroll_state.scroll_to_bottom();
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected entry is fully visible.
    /// If the entry is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        let Some(&item_bottom) = self.layout.prefix_heights.get(idx) else {
            return;
        };
        let item_top = item_bottom - self.layout.heights[idx];
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + self.viewport_height {
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            self.stick_to_bottom = new_y >= self.max_offset();
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.has_new_message = false;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Entry index under a row of the list area, `row` counted from its top.
    pub fn hit_test(&self, row: u16) -> Option<usize> {
        let content_y = row.saturating_add(self.scroll_state.offset().y);
        let idx = self
            .layout
            .prefix_heights
            .partition_point(|&end| end <= content_y);
        (idx < self.layout.prefix_heights.len()).then_some(idx)
    }

    /// Record entries that appeared since the last frame.
    fn note_arrivals(&mut self, entries: usize) {
        if entries > self.seen_entries
            && !self.stick_to_bottom
            && self.distance_from_bottom() > NEW_MESSAGE_THRESHOLD
        {
            self.has_new_message = true;
        }
        self.seen_entries = entries;
    }
}

/// Scrollable transcript component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub entries: &'a [TranscriptEntry],
    pub pulse_value: f32,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        entries: &'a [TranscriptEntry],
        pulse_value: f32,
    ) -> Self {
        Self {
            state,
            entries,
            pulse_value,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_items = self.entries.len();

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(num_items, content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));
        for entry in self.entries.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(Message::calculate_height(entry, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(self.entries, content_width);

        self.state.viewport_height = area.height;
        self.state.note_arrivals(num_items);

        let total_height = self.state.total_height();
        if self.state.stick_to_bottom {
            let y = total_height.saturating_sub(area.height);
            self.state.scroll_state.set_offset(Position { x: 0, y });
        } else {
            self.state.clamp_scroll();
        }
        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 2. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let entry = &self.entries[i];
            let height = self.state.layout.heights[i];
            let is_selected = self.state.selected_index == Some(i);
            let pulse = if matches!(entry, TranscriptEntry::Thinking) {
                self.pulse_value
            } else {
                0.0
            };

            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(Message::new(entry, false, is_selected, pulse), rect);
            y_offset += height;
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// EventHandler lives on `MessageListState` because `MessageList` is rebuilt
/// every frame while the scroll position has to persist.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    entry_count: usize,
    content_width: u16,
    /// The last entry was a placeholder that gets replaced in place.
    last_is_placeholder: bool,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            entry_count: 0,
            content_width: 0,
            last_is_placeholder: false,
        }
    }

    /// How many cached heights are still valid for `entry_count` entries.
    ///
    /// Entries are append-only except for the trailing placeholder, which is
    /// swapped for the reply or the apology (and the apology is removed).
    pub fn reusable_count(&self, entry_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        if entry_count < self.entry_count {
            return 0;
        }
        if self.last_is_placeholder {
            self.entry_count.saturating_sub(1)
        } else {
            self.entry_count
        }
    }

    pub fn update_metadata(&mut self, entries: &[TranscriptEntry], content_width: u16) {
        self.entry_count = entries.len();
        self.content_width = content_width;
        self.last_is_placeholder = matches!(
            entries.last(),
            Some(TranscriptEntry::Thinking | TranscriptEntry::Apology)
        );
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Role;
    use crate::render::{MessageBody, render};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn msg(role: Role, text: &str) -> TranscriptEntry {
        TranscriptEntry::Message(render(&MessageBody::text(text), role))
    }

    fn draw(state: &mut MessageListState, entries: &[TranscriptEntry], w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal
            .draw(|f| MessageList::new(state, entries, 0.0).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn many(n: usize) -> Vec<TranscriptEntry> {
        (0..n)
            .map(|i| msg(Role::User, &format!("message number {i}")))
            .collect()
    }

    #[test]
    fn test_layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        let entries = many(5);
        cache.heights = vec![3; 5];
        cache.update_metadata(&entries, 80);

        assert_eq!(cache.reusable_count(5, 80), 5);
        assert_eq!(cache.reusable_count(6, 80), 5);
        assert_eq!(cache.reusable_count(5, 40), 0);
    }

    #[test]
    fn test_trailing_placeholder_is_remeasured() {
        let mut cache = LayoutCache::new();
        let mut entries = many(1);
        entries.push(TranscriptEntry::Thinking);
        cache.heights = vec![3, 3];
        cache.update_metadata(&entries, 80);

        // Thinking swapped for the reply: same count, last height stale.
        assert_eq!(cache.reusable_count(2, 80), 1);
        // Apology dismissed: one fewer entry.
        assert_eq!(cache.reusable_count(1, 80), 0);
    }

    #[test]
    fn test_visible_range_and_hit_test() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![3, 4, 5];
        state.layout.rebuild_prefix_heights();
        assert_eq!(state.layout.prefix_heights, vec![3, 7, 12]);

        assert_eq!(state.hit_test(0), Some(0));
        assert_eq!(state.hit_test(3), Some(1));
        assert_eq!(state.hit_test(11), Some(2));
        assert_eq!(state.hit_test(12), None);

        assert_eq!(state.layout.visible_range(0, 4), 0..2);
    }

    #[test]
    fn test_sticks_to_bottom_and_shows_latest() {
        let mut state = MessageListState::new();
        let entries = many(10);
        let screen = draw(&mut state, &entries, 40, 10);
        assert!(screen.contains("message number 9"), "{screen}");
        assert!(!screen.contains("message number 0"), "{screen}");
        assert!(!state.has_new_message);
    }

    #[test]
    fn test_new_entry_while_scrolled_away_raises_indicator() {
        let mut state = MessageListState::new();
        let mut entries = many(10);
        draw(&mut state, &entries, 40, 10);

        for _ in 0..10 {
            state.handle_event(&TuiEvent::ScrollUp);
        }
        assert!(!state.stick_to_bottom);
        assert!(state.distance_from_bottom() > NEW_MESSAGE_THRESHOLD);

        entries.push(msg(Role::Assistant, "fresh reply"));
        draw(&mut state, &entries, 40, 10);
        assert!(state.has_new_message);

        state.scroll_to_bottom();
        assert!(!state.has_new_message);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_small_scroll_does_not_raise_indicator() {
        let mut state = MessageListState::new();
        let mut entries = many(10);
        draw(&mut state, &entries, 40, 10);

        state.handle_event(&TuiEvent::ScrollUp);
        entries.push(msg(Role::Assistant, "close by"));
        draw(&mut state, &entries, 40, 10);
        assert!(!state.has_new_message);
    }

    #[test]
    fn test_scrolling_back_down_repins() {
        let mut state = MessageListState::new();
        let entries = many(10);
        draw(&mut state, &entries, 40, 10);

        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_reset_forgets_layout() {
        let mut state = MessageListState::new();
        draw(&mut state, &many(3), 40, 10);
        assert!(!state.layout.heights.is_empty());
        state.reset();
        assert!(state.layout.heights.is_empty());
        assert!(state.stick_to_bottom);
    }
}
