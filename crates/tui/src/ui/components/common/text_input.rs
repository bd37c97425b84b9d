//! Reusable UTF-8 safe text input state with cursor management.
//!
//! Backs both the single-line form inputs and the multi-line letter body
//! fields. Newlines are ordinary characters; line/column helpers let the
//! renderer place the terminal cursor inside a wrapped-free text area.

use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug, Default)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    // ----- Setters -----
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().last() {
            self.cursor -= prev.len_utf8();
        }
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Move to the start of the current line.
    pub fn move_home(&mut self) {
        self.cursor = self.line_start();
    }

    /// Move to the end of the current line.
    pub fn move_end(&mut self) {
        self.cursor = self.input[self.cursor..]
            .find('\n')
            .map_or(self.input.len(), |offset| self.cursor + offset);
    }

    /// Move to the previous line, keeping the column where possible.
    pub fn move_up(&mut self) {
        let start = self.line_start();
        if start == 0 {
            return;
        }
        let column = self.cursor_columns();
        let prev_start = self.input[..start - 1].rfind('\n').map_or(0, |idx| idx + 1);
        self.cursor = prev_start + byte_offset_for_column(&self.input[prev_start..start - 1], column);
    }

    /// Move to the next line, keeping the column where possible.
    pub fn move_down(&mut self) {
        let Some(offset) = self.input[self.cursor..].find('\n') else {
            return;
        };
        let column = self.cursor_columns();
        let next_start = self.cursor + offset + 1;
        let next_end = self.input[next_start..]
            .find('\n')
            .map_or(self.input.len(), |idx| next_start + idx);
        self.cursor = next_start + byte_offset_for_column(&self.input[next_start..next_end], column);
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert a string at the cursor (pasted text).
    pub fn insert_str(&mut self, text: &str) {
        self.input.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().last() {
            let start = self.cursor - prev.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.input.drain(self.cursor..self.cursor + next.len_utf8());
        }
    }

    // ----- Layout helpers -----

    /// Zero-based line the cursor sits on.
    pub fn cursor_line(&self) -> usize {
        self.input[..self.cursor].matches('\n').count()
    }

    /// Display width between the start of the current line and the cursor.
    pub fn cursor_columns(&self) -> usize {
        self.input[self.line_start()..self.cursor].width()
    }

    /// Byte index in a single-line input for a click at `column`.
    pub fn cursor_index_for_column(&self, column: u16) -> usize {
        byte_offset_for_column(&self.input, column as usize)
    }

    fn line_start(&self) -> usize {
        self.input[..self.cursor].rfind('\n').map_or(0, |idx| idx + 1)
    }
}

fn byte_offset_for_column(line: &str, column: usize) -> usize {
    let mut width = 0;
    for (idx, ch) in line.char_indices() {
        if ch == '\n' {
            return idx;
        }
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > column {
            return idx;
        }
        width += ch_width;
    }
    line.len()
}
