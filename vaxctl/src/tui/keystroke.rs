//! Editor for `keystroke` action data.
//!
//! The data is a `;`-separated list of steps. A step is either a plain
//! string typed as-is, or a key combo: keys joined by `+`, where special keys
//! carry a `Keys.` prefix (`Keys.Control+c`). The editor shows the step list;
//! strings and combos each open their own sub-editor.

use crossterm::event::{KeyCode, KeyEvent};

use super::choice::ChoiceList;
use super::editor::{InputEffect, TextInput};
use super::intent::Intent;

pub const SPECIAL_PREFIX: &str = "Keys.";
const STEP_SEPARATOR: char = ';';
const KEY_SEPARATOR: char = '+';

/// A step starting with a special key is a combo, anything else a string.
pub fn is_combo(step: &str) -> bool {
    step.starts_with(SPECIAL_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    New,
    Existing(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyInput {
    List,
    Char,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Steps,
    Sequence(Target),
    Combo(Target, KeyInput),
}

/// What the dynamic pane draws for the editor.
pub enum KeystrokeView<'a> {
    Steps,
    Sequence(&'a TextInput),
    Combo,
    Char(&'a TextInput),
    Special(&'a ChoiceList),
}

#[derive(Debug, Clone)]
pub struct KeystrokeEditor {
    steps: Vec<String>,
    cursor: usize,
    mode: Mode,
    sequence: TextInput,
    combo: Vec<String>,
    combo_cursor: usize,
    char_input: TextInput,
    special: ChoiceList,
}

impl KeystrokeEditor {
    pub fn new(special_keys: Vec<String>) -> Self {
        Self {
            steps: Vec::new(),
            cursor: 0,
            mode: Mode::Steps,
            sequence: TextInput::default(),
            combo: Vec::new(),
            combo_cursor: 0,
            char_input: TextInput::default(),
            special: ChoiceList::new("Choose special key:", special_keys),
        }
    }

    pub fn value(&self) -> String {
        self.steps.join(&STEP_SEPARATOR.to_string())
    }

    /// Load `data` and go back to the step list.
    pub fn set_value(&mut self, data: &str) {
        self.steps = data
            .split(STEP_SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self.cursor = 0;
        self.mode = Mode::Steps;
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Keys of the combo being edited.
    pub fn combo(&self) -> &[String] {
        &self.combo
    }

    pub fn combo_cursor(&self) -> usize {
        self.combo_cursor
    }

    pub fn view(&self) -> KeystrokeView<'_> {
        match self.mode {
            Mode::Steps => KeystrokeView::Steps,
            Mode::Sequence(_) => KeystrokeView::Sequence(&self.sequence),
            Mode::Combo(_, KeyInput::List) => KeystrokeView::Combo,
            Mode::Combo(_, KeyInput::Char) => KeystrokeView::Char(&self.char_input),
            Mode::Combo(_, KeyInput::Special) => KeystrokeView::Special(&self.special),
        }
    }

    pub fn hints(&self) -> Vec<(&'static str, &'static str)> {
        match self.mode {
            Mode::Steps => vec![
                ("a", "add combo"),
                ("s", "add string"),
                ("e", "edit"),
                ("r", "remove"),
                ("+/-", "move"),
            ],
            Mode::Combo(_, KeyInput::List) => vec![
                ("a", "special key"),
                ("c", "character"),
                ("r", "remove"),
                ("enter", "done"),
            ],
            _ => Vec::new(),
        }
    }

    /// Only the step list hands intents back; the sub-editors return to it.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match self.mode {
            Mode::Steps => return self.steps_key(key),
            Mode::Sequence(target) => self.sequence_key(target, key),
            Mode::Combo(target, KeyInput::List) => self.combo_key(target, key),
            Mode::Combo(target, KeyInput::Char) => self.char_key(target, key),
            Mode::Combo(target, KeyInput::Special) => self.special_key(target, key),
        }
        None
    }

    // -- step list -----------------------------------------------------------

    fn steps_key(&mut self, key: KeyEvent) -> Option<Intent> {
        let last = self.steps.len().saturating_sub(1);
        match key.code {
            KeyCode::Enter => return Some(Intent::ExitDynamicView { save: true }),
            KeyCode::Esc => return Some(Intent::ExitDynamicView { save: false }),
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.cursor = (self.cursor + 1).min(last),
            KeyCode::Char('+') if self.cursor > 0 => {
                self.steps.swap(self.cursor, self.cursor - 1);
                self.cursor -= 1;
            }
            KeyCode::Char('-') if self.cursor < last => {
                self.steps.swap(self.cursor, self.cursor + 1);
                self.cursor += 1;
            }
            KeyCode::Char('r') if !self.steps.is_empty() => {
                self.steps.remove(self.cursor);
                self.cursor = self.cursor.min(self.steps.len().saturating_sub(1));
            }
            KeyCode::Char('e') => self.edit_current(),
            KeyCode::Char('a') => {
                self.combo.clear();
                self.combo_cursor = 0;
                self.mode = Mode::Combo(Target::New, KeyInput::List);
            }
            KeyCode::Char('s') => {
                self.sequence.clear();
                self.mode = Mode::Sequence(Target::New);
            }
            _ => {}
        }
        None
    }

    fn edit_current(&mut self) {
        let Some(step) = self.steps.get(self.cursor) else {
            return;
        };
        let target = Target::Existing(self.cursor);
        if is_combo(step) {
            self.combo = step.split(KEY_SEPARATOR).map(str::to_string).collect();
            self.combo_cursor = 0;
            self.mode = Mode::Combo(target, KeyInput::List);
        } else {
            self.sequence.set(step);
            self.mode = Mode::Sequence(target);
        }
    }

    fn commit(&mut self, target: Target, step: String) {
        self.mode = Mode::Steps;
        if step.is_empty() {
            return;
        }
        match target {
            Target::New => {
                self.steps.push(step);
                self.cursor = self.steps.len() - 1;
            }
            Target::Existing(i) => {
                if let Some(slot) = self.steps.get_mut(i) {
                    *slot = step;
                }
            }
        }
    }

    // -- sub-editors ---------------------------------------------------------

    fn sequence_key(&mut self, target: Target, key: KeyEvent) {
        match self.sequence.handle_key(key) {
            InputEffect::Submit => {
                let step = self.sequence.value();
                self.commit(target, step);
            }
            InputEffect::Cancel => self.mode = Mode::Steps,
            _ => {}
        }
    }

    fn combo_key(&mut self, target: Target, key: KeyEvent) {
        let last = self.combo.len().saturating_sub(1);
        match key.code {
            KeyCode::Enter => {
                let step = self.combo.join(&KEY_SEPARATOR.to_string());
                self.commit(target, step);
            }
            KeyCode::Esc => self.mode = Mode::Steps,
            KeyCode::Up | KeyCode::Char('k') => {
                self.combo_cursor = self.combo_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.combo_cursor = (self.combo_cursor + 1).min(last);
            }
            KeyCode::Char('r') if !self.combo.is_empty() => {
                self.combo.remove(self.combo_cursor);
                self.combo_cursor = self.combo_cursor.min(self.combo.len().saturating_sub(1));
            }
            KeyCode::Char('a') => self.mode = Mode::Combo(target, KeyInput::Special),
            KeyCode::Char('c') => {
                self.char_input.clear();
                self.mode = Mode::Combo(target, KeyInput::Char);
            }
            _ => {}
        }
    }

    fn push_key(&mut self, target: Target, key: String) {
        if !key.is_empty() {
            self.combo.push(key);
            self.combo_cursor = self.combo.len() - 1;
        }
        self.mode = Mode::Combo(target, KeyInput::List);
    }

    fn char_key(&mut self, target: Target, key: KeyEvent) {
        match key.code {
            // One character per key; typing again replaces it.
            KeyCode::Char(c) => self.char_input.set(&c.to_string()),
            _ => match self.char_input.handle_key(key) {
                InputEffect::Submit => {
                    let c = self.char_input.value();
                    self.push_key(target, c);
                }
                InputEffect::Cancel => self.mode = Mode::Combo(target, KeyInput::List),
                _ => {}
            },
        }
    }

    fn special_key(&mut self, target: Target, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let chosen = self
                    .special
                    .value()
                    .map(|k| format!("{SPECIAL_PREFIX}{k}"))
                    .unwrap_or_default();
                self.push_key(target, chosen);
            }
            KeyCode::Esc => self.mode = Mode::Combo(target, KeyInput::List),
            _ => {
                self.special.handle_key(key);
            }
        }
    }
}
