//! # Input Normalizer
//!
//! Decides how many rows the message input occupies. The caller measures the
//! natural (wrapped) line count; this type decides *when* that measurement is
//! applied:
//!
//! - blank text snaps back to the default height at once
//! - very short single-line text (< 5 chars) leaves the height alone
//! - newlines, big jumps (> 10 chars since the last resize) and growth apply at once
//! - everything else waits for a 300ms quiet period
//!
//! Time is injected so the debounce is testable without sleeping.

use std::time::{Duration, Instant};

pub const DEFAULT_LINES: u16 = 1;
pub const MAX_LINES: u16 = 5;
pub const DEBOUNCE: Duration = Duration::from_millis(300);

const SHORT_TEXT_CHARS: usize = 5;
const LARGE_EDIT_CHARS: usize = 10;

#[derive(Debug, Clone)]
pub struct InputNormalizer {
    lines: u16,
    /// Char count at the last applied resize.
    resized_at_len: usize,
    pending: Option<Pending>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Instant,
    lines: u16,
    len: usize,
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self {
            lines: DEFAULT_LINES,
            resized_at_len: 0,
            pending: None,
        }
    }

    /// Currently applied content height in lines.
    pub fn lines(&self) -> u16 {
        self.lines
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Back to the default height, dropping any pending resize.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed the latest text and its natural line count. Returns the height
    /// to use right now.
    pub fn observe(&mut self, text: &str, natural_lines: u16, now: Instant) -> u16 {
        self.pending = None;

        if text.trim().is_empty() {
            self.lines = DEFAULT_LINES;
            self.resized_at_len = 0;
            return self.lines;
        }

        let len = text.chars().count();
        let has_newline = text.contains('\n');
        if len < SHORT_TEXT_CHARS && !has_newline {
            return self.lines;
        }

        let target = natural_lines.clamp(DEFAULT_LINES, MAX_LINES);
        let change = len.abs_diff(self.resized_at_len);
        let overflowing = natural_lines > self.lines;

        if has_newline || change > LARGE_EDIT_CHARS || overflowing {
            self.lines = target;
            self.resized_at_len = len;
        } else {
            self.pending = Some(Pending {
                due: now + DEBOUNCE,
                lines: target,
                len,
            });
        }
        self.lines
    }

    /// Apply a debounced resize whose quiet period has elapsed.
    /// Returns true when the height changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                self.resized_at_len = pending.len;
                let changed = self.lines != pending.lines;
                self.lines = pending.lines;
                changed
            }
            _ => false,
        }
    }
}
