//! Virtual keyboard for the terminal user interface.
//!
//! Plays the part of the external keyboard: it keeps its own copy of each
//! field's text, applies key presses with its own editing rules and reports
//! the whole new buffer back to the widget.

use crate::fields::{ActiveField, KeyLayout};
use crate::host::Keyboard;

/// Keyboard with one named buffer per field and a caret in the active one.
#[derive(Clone, Debug)]
pub struct VirtualKeyboard {
    phone: String,
    search: String,
    pub target: ActiveField,
    pub layout: KeyLayout,
    /// Caret as a char offset into the active buffer.
    pub cursor: usize,
}

impl Default for VirtualKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualKeyboard {
    /// Create a keyboard targeting an empty phone buffer.
    pub fn new() -> Self {
        Self {
            phone: String::new(),
            search: String::new(),
            target: ActiveField::PhoneDigits,
            layout: KeyLayout::Phone,
            cursor: 0,
        }
    }

    /// Current content of the active buffer.
    pub fn value(&self) -> &str {
        match self.target {
            ActiveField::PhoneDigits => &self.phone,
            ActiveField::CountrySearch => &self.search,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self.target {
            ActiveField::PhoneDigits => &mut self.phone,
            ActiveField::CountrySearch => &mut self.search,
        }
    }

    fn len(&self) -> usize {
        self.value().chars().count()
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value()
            .char_indices()
            .nth(cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value().len())
    }

    /// Whether the current layout has a key for `c`.
    pub fn accepts(&self, c: char) -> bool {
        match self.layout {
            KeyLayout::Phone => c.is_ascii_digit(),
            KeyLayout::Default => c.is_alphanumeric() || c == ' ' || c == '-',
        }
    }

    /// Insert a character at the cursor. Returns `true` if the buffer changed.
    pub fn handle_char(&mut self, c: char) -> bool {
        if !self.accepts(c) {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value_mut().insert(at, c);
        self.cursor += 1;
        true
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_index(self.cursor - 1);
        self.value_mut().remove(at);
        self.cursor -= 1;
        true
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value_mut().remove(at);
        true
    }

    /// Move cursor one position to the left.
    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor one position to the right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.len();
    }

    /// Rows of key labels for the on-screen hint.
    pub fn key_rows(&self) -> &'static [&'static str] {
        match self.layout {
            KeyLayout::Phone => &["1 2 3", "4 5 6", "7 8 9", "⌫ 0 ⏎"],
            KeyLayout::Default => &["q w e r t y u i o p ⌫", "a s d f g h j k l", "z x c v b n m", "␣ ⏎"],
        }
    }
}

impl Keyboard for VirtualKeyboard {
    fn set_buffer(&mut self, content: &str, target: ActiveField) {
        match target {
            ActiveField::PhoneDigits => self.phone = content.to_string(),
            ActiveField::CountrySearch => self.search = content.to_string(),
        }
        if target == self.target {
            self.cursor = self.cursor.min(self.len());
        }
    }

    fn set_caret(&mut self, position: usize) {
        self.cursor = position.min(self.len());
    }

    fn caret_position(&self) -> Option<usize> {
        Some(self.cursor)
    }

    fn retarget(&mut self, target: ActiveField, layout: KeyLayout) {
        self.target = target;
        self.layout = layout;
        self.cursor = self.cursor.min(self.len());
    }
}
