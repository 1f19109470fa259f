//! Text buffer with a byte-offset cursor, plus the hard-wrap layout the
//! input box draws with.
//!
//! Rows are cut by display width (`unicode-width`), never at word
//! boundaries, so the cursor cell and the row count always agree.

use unicode_width::UnicodeWidthChar;

#[derive(Debug, Default, Clone)]
pub(super) struct EditBuffer {
    text: String,
    /// Byte offset, always on a char boundary.
    pos: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl EditBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Replace the whole text, cursor at the end.
    pub fn set(&mut self, text: String) {
        self.pos = text.len();
        self.text = text;
    }

    pub fn take(&mut self) -> String {
        self.pos = 0;
        std::mem::take(&mut self.text)
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.pos, s);
        self.pos += s.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.pos, c);
        self.pos += c.len_utf8();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.pos].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.pos..]
            .chars()
            .next()
            .map(|c| self.pos + c.len_utf8())
    }

    pub fn backspace(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.text.drain(prev..self.pos);
                self.pos = prev;
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self) -> bool {
        match self.next_boundary() {
            Some(next) => {
                self.text.drain(self.pos..next);
                true
            }
            None => false,
        }
    }

    pub fn left(&mut self) -> bool {
        self.prev_boundary().map(|p| self.pos = p).is_some()
    }

    pub fn right(&mut self) -> bool {
        self.next_boundary().map(|p| self.pos = p).is_some()
    }

    fn line_start(&self) -> usize {
        self.text[..self.pos].rfind('\n').map_or(0, |i| i + 1)
    }

    fn line_end(&self) -> usize {
        self.text[self.pos..]
            .find('\n')
            .map_or(self.text.len(), |i| self.pos + i)
    }

    pub fn home(&mut self) -> bool {
        let start = self.line_start();
        std::mem::replace(&mut self.pos, start) != start
    }

    pub fn end(&mut self) -> bool {
        let end = self.line_end();
        std::mem::replace(&mut self.pos, end) != end
    }

    /// Back over punctuation, then over one word.
    pub fn word_left(&mut self) -> bool {
        let before = &self.text[..self.pos];
        let trimmed = before.trim_end_matches(|c: char| !is_word_char(c));
        let target = trimmed
            .trim_end_matches(is_word_char)
            .len();
        std::mem::replace(&mut self.pos, target) != target
    }

    /// Forward over punctuation, then over one word.
    pub fn word_right(&mut self) -> bool {
        let after = &self.text[self.pos..];
        let skipped = after.trim_start_matches(|c: char| !is_word_char(c));
        let rest = skipped.trim_start_matches(is_word_char);
        let target = self.text.len() - rest.len();
        std::mem::replace(&mut self.pos, target) != target
    }

    /// Move to the previous (`up`) or next logical line, keeping the column
    /// in characters where the target line is long enough.
    pub fn vertical(&mut self, up: bool) -> bool {
        let start = self.line_start();
        let column = self.text[start..self.pos].chars().count();

        let (target_start, target_end) = if up {
            if start == 0 {
                return false;
            }
            let prev_end = start - 1;
            let prev_start = self.text[..prev_end].rfind('\n').map_or(0, |i| i + 1);
            (prev_start, prev_end)
        } else {
            let end = self.line_end();
            if end == self.text.len() {
                return false;
            }
            let next_start = end + 1;
            let next_end = self.text[next_start..]
                .find('\n')
                .map_or(self.text.len(), |i| next_start + i);
            (next_start, next_end)
        };

        let line = &self.text[target_start..target_end];
        self.pos = target_start
            + line
                .char_indices()
                .nth(column)
                .map_or(line.len(), |(i, _)| i);
        true
    }
}

fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Split `text` into display rows of at most `width` columns.
pub(super) fn wrap_rows(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let mut row = String::new();
        let mut used = 0u16;
        for c in line.chars() {
            let w = char_width(c);
            if used + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            row.push(c);
            used += w;
        }
        rows.push(row);
    }
    rows
}

/// Row and column of the cell the cursor sits in. A cursor just past a
/// full row is drawn at the start of the next one.
pub(super) fn cursor_cell(text: &str, pos: usize, width: u16) -> (u16, u16) {
    let width = width.max(1);
    let mut row = 0u16;
    let mut col = 0u16;
    for c in text[..pos].chars() {
        if c == '\n' {
            row += 1;
            col = 0;
            continue;
        }
        let w = char_width(c);
        if col + w > width && col > 0 {
            row += 1;
            col = 0;
        }
        col += w;
    }
    if col >= width {
        row += 1;
        col = 0;
    }
    (row, col)
}

/// Rows needed to show `text` with the cursor at `pos`.
pub(super) fn natural_rows(text: &str, pos: usize, width: u16) -> u16 {
    let rows = wrap_rows(text, width).len() as u16;
    rows.max(cursor_cell(text, pos, width).0 + 1)
}
