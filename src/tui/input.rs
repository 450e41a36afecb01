//! Text input field for the terminal user interface.

/// A single-line text input with a byte-indexed cursor kept on character
/// boundaries.
#[derive(Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
}

impl InputField {
    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        InputField {
            value: value.to_string(),
            cursor: value.len(),
            active: false,
        }
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some(c) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.value.remove(self.cursor);
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    /// Move cursor one character to the left.
    pub fn move_left(&mut self) {
        if let Some(c) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    /// Move cursor one character to the right.
    pub fn move_right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Columns before the cursor, for terminal cursor placement.
    pub fn cursor_column(&self) -> usize {
        self.value[..self.cursor].chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_stay_on_character_boundaries() {
        let mut field = InputField::with_value("héllo");
        field.move_home();
        field.move_right();
        field.move_right(); // past 'h' and 'é'
        field.insert_char('x');
        assert_eq!(field.value, "héxllo");

        field.backspace();
        assert_eq!(field.value, "héllo");
        field.backspace();
        assert_eq!(field.value, "hllo");
        assert_eq!(field.cursor_column(), 1);
    }

    #[test]
    fn backspace_at_start_is_a_no_op() {
        let mut field = InputField::with_value("a");
        field.move_home();
        field.backspace();
        assert_eq!(field.value, "a");
    }
}
