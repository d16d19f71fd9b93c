//! Multi-select list that keeps its chosen entries, in chosen order, at the
//! head of the list.
//!
//! The first `chosen` items are always exactly the selected ones. Selecting
//! an item moves it to the end of that prefix; unselecting moves it to the
//! first position after the shrunk prefix. `+`/`-` reorder while no filter is
//! in effect. A `/` filter narrows what is displayed without touching order
//! or selection, and rows are then resolved by name rather than position.

use crossterm::event::{KeyCode, KeyEvent};

use super::editor::{InputEffect, TextInput};
use super::intent::Intent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableItem {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Unfiltered,
    /// The filter prompt is receiving keys.
    Filtering,
    FilterApplied,
}

#[derive(Debug, Clone)]
pub struct OrderedSelection {
    title: String,
    items: Vec<SelectableItem>,
    chosen: usize,
    /// Index into the visible rows.
    cursor: usize,
    filter: TextInput,
    filter_state: FilterState,
}

impl OrderedSelection {
    pub fn new(title: impl Into<String>, candidates: &[String], selected: &[String]) -> Self {
        let mut list = Self {
            title: title.into(),
            items: candidates
                .iter()
                .map(|name| SelectableItem {
                    name: name.clone(),
                    selected: false,
                })
                .collect(),
            chosen: 0,
            cursor: 0,
            filter: TextInput::default(),
            filter_state: FilterState::Unfiltered,
        };
        list.set_selected(selected);
        list
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[SelectableItem] {
        &self.items
    }

    pub fn filter_state(&self) -> FilterState {
        self.filter_state
    }

    pub fn filter(&self) -> &TextInput {
        &self.filter
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The chosen names, in execution order.
    pub fn value(&self) -> Vec<String> {
        self.items[..self.chosen]
            .iter()
            .map(|item| item.name.clone())
            .collect()
    }

    /// Indices into `items` of the rows currently displayed.
    pub fn visible(&self) -> Vec<usize> {
        let needle = self.filter.value().to_lowercase();
        if self.filter_state == FilterState::Unfiltered || needle.is_empty() {
            return (0..self.items.len()).collect();
        }
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Make `names` the selection, in that order. Names missing from the
    /// candidate list are added.
    pub fn set_selected(&mut self, names: &[String]) {
        let mut rest: Vec<SelectableItem> = std::mem::take(&mut self.items)
            .into_iter()
            .filter(|item| !names.contains(&item.name))
            .map(|item| SelectableItem {
                selected: false,
                ..item
            })
            .collect();
        self.items = names
            .iter()
            .map(|name| SelectableItem {
                name: name.clone(),
                selected: true,
            })
            .collect();
        self.chosen = self.items.len();
        self.items.append(&mut rest);
        self.clamp_cursor();
    }

    pub fn clear_selected(&mut self) {
        self.set_selected(&[]);
    }

    /// Replace the candidates, keeping the current selection first.
    pub fn update_candidates(&mut self, candidates: &[String]) {
        let chosen = self.value();
        self.items = candidates
            .iter()
            .map(|name| SelectableItem {
                name: name.clone(),
                selected: false,
            })
            .collect();
        self.set_selected(&chosen);
    }

    /// Flip the selection of the row under the cursor.
    pub fn toggle(&mut self) {
        if self.filter_state == FilterState::Filtering {
            return;
        }
        let Some(index) = self.target_index() else {
            return;
        };
        let mut item = self.items.remove(index);
        if item.selected {
            item.selected = false;
            self.chosen -= 1;
            self.items.insert(self.chosen, item);
        } else {
            item.selected = true;
            self.items.insert(self.chosen, item);
            if self.filter_state == FilterState::Unfiltered {
                self.cursor = self.chosen;
            }
            self.chosen += 1;
        }
    }

    /// Swap the row under the cursor with its neighbour. Unfiltered only.
    pub fn move_row(&mut self, up: bool) {
        if self.filter_state != FilterState::Unfiltered {
            return;
        }
        let from = self.cursor;
        let to = if up {
            match from.checked_sub(1) {
                Some(to) => to,
                None => return,
            }
        } else {
            from + 1
        };
        if to >= self.items.len() {
            return;
        }
        // A swap across the prefix boundary would break the invariant.
        if self.items[from].selected != self.items[to].selected {
            return;
        }
        self.items.swap(from, to);
        self.cursor = to;
    }

    fn target_index(&self) -> Option<usize> {
        match self.filter_state {
            FilterState::Unfiltered => (self.cursor < self.items.len()).then_some(self.cursor),
            _ => self.visible().get(self.cursor).copied(),
        }
    }

    fn clamp_cursor(&mut self) {
        let shown = self.visible().len();
        self.cursor = self.cursor.min(shown.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        if self.filter_state == FilterState::Filtering {
            match self.filter.handle_key(key) {
                InputEffect::Submit => {
                    self.filter_state = if self.filter.is_empty() {
                        FilterState::Unfiltered
                    } else {
                        FilterState::FilterApplied
                    };
                }
                InputEffect::Cancel => self.reset_filter(),
                InputEffect::Edited => self.cursor = 0,
                _ => {}
            }
            return None;
        }

        let unfiltered = self.filter_state == FilterState::Unfiltered;
        match key.code {
            KeyCode::Enter if unfiltered => return Some(Intent::ExitDynamicView { save: true }),
            KeyCode::Esc if unfiltered => return Some(Intent::ExitDynamicView { save: false }),
            KeyCode::Esc => self.reset_filter(),
            KeyCode::Char('/') => {
                self.filter.clear();
                self.filter_state = FilterState::Filtering;
                self.cursor = 0;
            }
            KeyCode::Char(' ') => self.toggle(),
            KeyCode::Char('+') => self.move_row(true),
            KeyCode::Char('-') => self.move_row(false),
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor += 1;
                self.clamp_cursor();
            }
            _ => {}
        }
        None
    }

    fn reset_filter(&mut self) {
        self.filter.clear();
        self.filter_state = FilterState::Unfiltered;
        self.clamp_cursor();
    }
}
