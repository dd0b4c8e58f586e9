//! Editable text with a cursor, shared by the input box and in-place message edits.
//!
//! The cursor is a byte offset that always sits on a char boundary.
//! Wrapping helpers use the same `textwrap` options as ratatui's `Paragraph`
//! so predicted line counts match what gets drawn.

use crate::tui::event::TuiEvent;

/// Build textwrap options matching `Paragraph` wrapping.
pub fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Count wrapped lines, including a trailing empty line after a final newline.
pub fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }

    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);

    // textwrap doesn't always produce an empty trailing line for a trailing newline
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }

    count
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing text with the cursor at the end.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Empties the buffer and returns what was in it.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Applies an editing event. Returns `true` if text or cursor changed.
    pub fn apply(&mut self, event: &TuiEvent) -> bool {
        match event {
            TuiEvent::InputChar(c) => {
                self.text.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                true
            }
            TuiEvent::Paste(pasted) => {
                self.text.insert_str(self.cursor, pasted);
                self.cursor += pasted.len();
                !pasted.is_empty()
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.text, self.cursor);
                self.text.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            TuiEvent::Delete if self.cursor < self.text.len() => {
                let next = next_char_boundary(&self.text, self.cursor);
                self.text.drain(self.cursor..next);
                true
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.text, self.cursor);
                true
            }
            TuiEvent::CursorRight if self.cursor < self.text.len() => {
                self.cursor = next_char_boundary(&self.text, self.cursor);
                true
            }
            TuiEvent::CursorHome => {
                let line_start = self.text[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                let moved = self.cursor != line_start;
                self.cursor = line_start;
                moved
            }
            TuiEvent::CursorEnd => {
                let line_end = self.text[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.text.len());
                let moved = self.cursor != line_end;
                self.cursor = line_end;
                moved
            }
            _ => false,
        }
    }

    /// (column, line) of the cursor when the text is wrapped at `width`.
    pub fn cursor_position(&self, width: u16) -> (u16, u16) {
        if width == 0 {
            return (0, 0);
        }
        let before = &self.text[..self.cursor];
        let options = wrap_options(width);
        let line = wrap_line_count(before, width).saturating_sub(1);

        // Count columns from the last newline; textwrap trims trailing spaces
        // so wrapped segment lengths can't be trusted for the column.
        let logical_start = before.rfind('\n').map(|pos| pos + 1).unwrap_or(0);
        let logical = &before[logical_start..];
        let segments = textwrap::wrap(logical, options);
        let consumed: usize = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|seg| seg.chars().count())
            .sum();
        let column = logical.chars().count().saturating_sub(consumed) as u16;

        (column.min(width), line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextBuffer {
        let mut buffer = TextBuffer::new();
        for c in text.chars() {
            buffer.apply(&TuiEvent::InputChar(c));
        }
        buffer
    }

    #[test]
    fn typing_and_backspace() {
        let mut buffer = typed("ab");
        assert_eq!(buffer.as_str(), "ab");
        assert!(buffer.apply(&TuiEvent::Backspace));
        assert_eq!(buffer.as_str(), "a");
        assert!(buffer.apply(&TuiEvent::Backspace));
        assert!(!buffer.apply(&TuiEvent::Backspace));
    }

    #[test]
    fn multibyte_chars_keep_boundaries() {
        let mut buffer = typed("héllo");
        buffer.apply(&TuiEvent::CursorLeft);
        buffer.apply(&TuiEvent::CursorLeft);
        buffer.apply(&TuiEvent::CursorLeft);
        buffer.apply(&TuiEvent::CursorLeft);
        assert!(buffer.apply(&TuiEvent::Delete));
        assert_eq!(buffer.as_str(), "hllo");
    }

    #[test]
    fn insert_in_middle() {
        let mut buffer = TextBuffer::with_text("helo");
        buffer.apply(&TuiEvent::CursorLeft);
        buffer.apply(&TuiEvent::InputChar('l'));
        assert_eq!(buffer.as_str(), "hello");
    }

    #[test]
    fn home_and_end_are_line_local() {
        let mut buffer = TextBuffer::with_text("first\nsecond");
        assert!(buffer.apply(&TuiEvent::CursorHome));
        assert_eq!(buffer.cursor(), "first\n".len());
        assert!(buffer.apply(&TuiEvent::CursorEnd));
        assert_eq!(buffer.cursor(), "first\nsecond".len());
        assert!(!buffer.apply(&TuiEvent::CursorEnd));
    }

    #[test]
    fn take_clears() {
        let mut buffer = typed("prompt");
        assert_eq!(buffer.take(), "prompt");
        assert_eq!(buffer.as_str(), "");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn paste_preserves_newlines() {
        let mut buffer = TextBuffer::new();
        buffer.apply(&TuiEvent::Paste("line one\nline two".into()));
        assert_eq!(buffer.as_str(), "line one\nline two");
        assert_eq!(buffer.cursor(), buffer.as_str().len());
    }

    #[test]
    fn line_count_counts_trailing_newline() {
        assert_eq!(wrap_line_count("", 10), 1);
        assert_eq!(wrap_line_count("hello", 10), 1);
        assert_eq!(wrap_line_count("hello\n", 10), 2);
        assert_eq!(wrap_line_count("hello world", 5), 2);
    }

    #[test]
    fn cursor_position_follows_wrapping() {
        let buffer = TextBuffer::with_text("hello world");
        // "hello" | "world" at width 5, cursor after "world"
        assert_eq!(buffer.cursor_position(5), (5, 1));
        let buffer = TextBuffer::with_text("ab\ncd");
        assert_eq!(buffer.cursor_position(20), (2, 1));
    }
}
