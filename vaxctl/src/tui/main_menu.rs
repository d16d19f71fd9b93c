use crossterm::event::{KeyCode, KeyEvent};

use super::intent::{Intent, MainAction};

/// The per-resource action list in the main pane.
#[derive(Debug, Clone)]
pub struct MainMenu {
    title: String,
    actions: &'static [MainAction],
    cursor: usize,
}

impl MainMenu {
    pub fn new(title: impl Into<String>, actions: &'static [MainAction], initial: MainAction) -> Self {
        Self {
            title: title.into(),
            actions,
            cursor: actions.iter().position(|a| *a == initial).unwrap_or(0),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn actions(&self) -> &'static [MainAction] {
        self.actions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        let last = self.actions.len().saturating_sub(1);
        match key.code {
            KeyCode::Enter => return self.actions.get(self.cursor).copied().map(Intent::ApplyMainAction),
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.cursor = (self.cursor + 1).min(last),
            KeyCode::PageUp | KeyCode::Home => self.cursor = 0,
            KeyCode::PageDown | KeyCode::End => self.cursor = last,
            _ => {}
        }
        None
    }
}
