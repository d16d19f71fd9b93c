//! The field list of the resource being edited.

use crossterm::event::{KeyCode, KeyEvent};

use super::intent::{DynamicView, Intent};

/// How a field reacts in the data panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Shown but never focused.
    ReadOnly,
    /// Enter opens its editor in the dynamic pane.
    Editable,
    /// Space/left/right flips a `true`/`false` value in place.
    Toggle,
}

#[derive(Debug, Clone)]
pub struct DataField {
    pub title: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

impl DataField {
    pub fn editable(title: &'static str) -> Self {
        Self::new(title, FieldKind::Editable)
    }

    pub fn toggle(title: &'static str, value: bool) -> Self {
        Self {
            value: value.to_string(),
            ..Self::new(title, FieldKind::Toggle)
        }
    }

    pub fn read_only(title: &'static str) -> Self {
        Self::new(title, FieldKind::ReadOnly)
    }

    fn new(title: &'static str, kind: FieldKind) -> Self {
        Self {
            title,
            value: String::new(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceData {
    title: &'static str,
    fields: Vec<DataField>,
    /// Index into the focusable fields.
    focus: usize,
}

impl ResourceData {
    pub fn new(title: &'static str, fields: Vec<DataField>) -> Self {
        Self {
            title,
            fields,
            focus: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn fields(&self) -> &[DataField] {
        &self.fields
    }

    pub fn set_value(&mut self, title: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.title == title) {
            field.value = value.into();
        }
    }

    #[cfg(test)]
    pub fn value(&self, title: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.title == title)
            .map(|f| f.value.as_str())
            .unwrap_or_default()
    }

    #[cfg(test)]
    /// Move focus to the field titled `title`, if it can take focus.
    pub fn focus_on(&mut self, title: &str) {
        if let Some(pos) = self.focusable().iter().position(|&i| self.fields[i].title == title) {
            self.focus = pos;
        }
    }

    /// Index into `fields` of the focused field.
    pub fn focused_index(&self) -> Option<usize> {
        self.focusable().get(self.focus).copied()
    }

    fn focusable(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind != FieldKind::ReadOnly)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        let count = self.focusable().len();
        if count == 0 {
            return None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.focus = (self.focus + count - 1) % count,
            KeyCode::Down | KeyCode::Char('j') => self.focus = (self.focus + 1) % count,
            KeyCode::PageUp => self.focus = 0,
            KeyCode::PageDown => self.focus = count - 1,
            KeyCode::Enter => {
                let idx = self.focused_index()?;
                let field = &self.fields[idx];
                if field.kind == FieldKind::Editable {
                    return Some(Intent::SetDynamicView(DynamicView::Field(field.title)));
                }
            }
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                let idx = self.focused_index()?;
                let field = &mut self.fields[idx];
                if field.kind == FieldKind::Toggle
                    && let Ok(current) = field.value.parse::<bool>()
                {
                    field.value = (!current).to_string();
                    return Some(Intent::UpdateToggleValue {
                        name: field.title,
                        value: !current,
                    });
                }
            }
            _ => {}
        }
        None
    }
}
