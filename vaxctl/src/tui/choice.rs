use crossterm::event::{KeyCode, KeyEvent};

use super::intent::Intent;

/// Pick one value from a short list (action type, device credentials).
#[derive(Debug, Clone)]
pub struct ChoiceList {
    prompt: &'static str,
    options: Vec<String>,
    cursor: usize,
}

impl ChoiceList {
    pub fn new(prompt: &'static str, options: Vec<String>) -> Self {
        Self {
            prompt,
            options,
            cursor: 0,
        }
    }

    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn value(&self) -> Option<&str> {
        self.options.get(self.cursor).map(String::as_str)
    }

    /// Highlight `value` if it is one of the options.
    pub fn set_value(&mut self, value: &str) {
        if let Some(i) = self.options.iter().position(|o| o == value) {
            self.cursor = i;
        }
    }

    /// Swap in new options, keeping the highlighted value when it survives.
    pub fn set_options(&mut self, options: Vec<String>) {
        let current = self.value().map(str::to_string);
        self.options = options;
        self.cursor = 0;
        if let Some(current) = current {
            self.set_value(&current);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match key.code {
            KeyCode::Enter if !self.options.is_empty() => {
                return Some(Intent::ExitDynamicView { save: true });
            }
            KeyCode::Esc => return Some(Intent::ExitDynamicView { save: false }),
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = (self.cursor + 1).min(self.options.len().saturating_sub(1));
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::tui::testing::key;

    fn types() -> Vec<String> {
        ["sleep", "power", "ipmitool"].map(String::from).to_vec()
    }

    #[test]
    fn moves_and_commits() {
        let mut list = ChoiceList::new("Choose Action Type:", types());
        list.handle_key(key(KeyCode::Down));
        assert_eq!(list.value(), Some("power"));
        assert_eq!(
            list.handle_key(key(KeyCode::Enter)),
            Some(Intent::ExitDynamicView { save: true })
        );
    }

    #[test]
    fn options_refresh_keeps_value() {
        let mut list = ChoiceList::new("Choose Creds:", types());
        list.set_value("ipmitool");
        list.set_options(["ipmitool", "sleep"].map(String::from).to_vec());
        assert_eq!(list.value(), Some("ipmitool"));
        list.set_options(Vec::new());
        assert_eq!(list.value(), None);
        assert_eq!(list.handle_key(key(KeyCode::Enter)), None);
    }
}
