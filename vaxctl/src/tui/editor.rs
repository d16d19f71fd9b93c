//! Single-line text editing: the raw input buffer and the field editor
//! shown in the dynamic pane.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::intent::Intent;

/// What a key did to a [`TextInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEffect {
    Submit,
    Cancel,
    Edited,
    CursorMoved,
    Unhandled,
}

/// Editable line of text with a char cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    chars: Vec<char>,
    cursor: usize,
}

impl TextInput {
    pub fn new(initial: &str) -> Self {
        let chars: Vec<char> = initial.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Replace the content, leaving the cursor at the end.
    pub fn set(&mut self, value: &str) {
        *self = Self::new(value);
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputEffect {
        match key.code {
            KeyCode::Enter => return InputEffect::Submit,
            KeyCode::Esc => return InputEffect::Cancel,
            KeyCode::Backspace => self.delete_back(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert(c),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.chars.len(),
            _ => return InputEffect::Unhandled,
        }
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
                InputEffect::CursorMoved
            }
            _ => InputEffect::Edited,
        }
    }

    /// Text before and after the cursor, with `mask` replacing every char.
    pub fn split_at_cursor(&self, mask: Option<char>) -> (String, String) {
        let show = |cs: &[char]| -> String {
            match mask {
                Some(m) => cs.iter().map(|_| m).collect(),
                None => cs.iter().collect(),
            }
        };
        (show(&self.chars[..self.cursor]), show(&self.chars[self.cursor..]))
    }
}

// ---------------------------------------------------------------------------
// Field editor
// ---------------------------------------------------------------------------

/// Returns an error message when a draft value is not acceptable.
pub type Validator = fn(&str) -> Result<(), String>;

/// Prompted text editor for one resource field.
///
/// Enter commits only when the draft passes validation; Esc always cancels.
#[derive(Debug, Clone)]
pub struct FieldEditor {
    prompt: String,
    input: TextInput,
    validator: Option<Validator>,
    masked: bool,
}

impl FieldEditor {
    pub fn new(prompt: impl Into<String>, initial: &str) -> Self {
        Self {
            prompt: prompt.into(),
            input: TextInput::new(initial),
            validator: None,
            masked: false,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn set_validator(&mut self, validator: Option<Validator>) {
        self.validator = validator;
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn value(&self) -> String {
        self.input.value()
    }

    pub fn set_value(&mut self, value: &str) {
        self.input.set(value);
    }

    pub fn set_masked(&mut self, masked: bool) {
        self.masked = masked;
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// `None` when the field has no validator.
    pub fn validation(&self) -> Option<Result<(), String>> {
        self.validator.map(|check| check(&self.input.value()))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match self.input.handle_key(key) {
            InputEffect::Submit => match self.validation() {
                Some(Err(_)) => None,
                _ => Some(Intent::ExitDynamicView { save: true }),
            },
            InputEffect::Cancel => Some(Intent::ExitDynamicView { save: false }),
            _ => None,
        }
    }
}

/// Accepts only ASCII digits (and the empty string).
pub fn digits_only(value: &str) -> Result<(), String> {
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err("only digits are allowed".into())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::tui::testing::{key, type_str};

    #[test]
    fn new_puts_cursor_at_end() {
        let input = TextInput::new("café");
        assert_eq!(input.len(), 4);
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn edits_around_the_cursor() {
        let mut input = TextInput::new("ac");
        input.left();
        input.insert('b');
        assert_eq!(input.value(), "abc");
        input.delete_forward();
        assert_eq!(input.value(), "ab");
        input.delete_back();
        input.delete_back();
        input.delete_back();
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn right_stops_at_end() {
        let mut input = TextInput::new("ab");
        input.right();
        input.right();
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn multibyte_chars_are_single_positions() {
        let mut input = TextInput::new("ñu");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.value(), "u");
        input.handle_key(key(KeyCode::Char('é')));
        assert_eq!(input.value(), "éu");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn key_effects() {
        let mut input = TextInput::new("x");
        assert_eq!(input.handle_key(key(KeyCode::Enter)), InputEffect::Submit);
        assert_eq!(input.handle_key(key(KeyCode::Esc)), InputEffect::Cancel);
        assert_eq!(input.handle_key(key(KeyCode::Left)), InputEffect::CursorMoved);
        assert_eq!(input.handle_key(key(KeyCode::Char('y'))), InputEffect::Edited);
        assert_eq!(input.handle_key(key(KeyCode::F(2))), InputEffect::Unhandled);
        assert_eq!(input.value(), "yx");
    }

    #[test]
    fn masked_split() {
        let mut input = TextInput::new("secret");
        input.left();
        assert_eq!(input.split_at_cursor(Some('*')), ("*****".into(), "*".into()));
        assert_eq!(input.split_at_cursor(None), ("secre".into(), "t".into()));
    }

    #[test]
    fn field_editor_submit_and_cancel() {
        let mut editor = FieldEditor::new("Enter Name:", "");
        type_str(|k| editor.handle_key(k), "web-01");
        assert_eq!(editor.value(), "web-01");
        assert_eq!(
            editor.handle_key(key(KeyCode::Enter)),
            Some(Intent::ExitDynamicView { save: true })
        );
        assert_eq!(
            editor.handle_key(key(KeyCode::Esc)),
            Some(Intent::ExitDynamicView { save: false })
        );
    }

    #[test]
    fn invalid_draft_is_not_submitted() {
        let mut editor = FieldEditor::new("Seconds:", "1").with_validator(digits_only);
        assert_eq!(editor.validation(), Some(Ok(())));
        editor.handle_key(key(KeyCode::Char('x')));
        assert!(matches!(editor.validation(), Some(Err(_))));
        assert_eq!(editor.handle_key(key(KeyCode::Enter)), None);
    }
}
