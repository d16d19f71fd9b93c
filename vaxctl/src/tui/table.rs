//! Paged resource table and the pending-reorder bookkeeping for rules.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{Placement, RulePlacement};

use super::intent::Intent;

pub const UNSAVED_BANNER: &str =
    "The table currently shows unsaved changes (Enter to apply, Esc to cancel)";

/// The current page of a table, flattened to strings for drawing.
#[derive(Debug, Clone)]
pub struct TableView {
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
    /// Row within `rows` under the cursor.
    pub selected: Option<usize>,
    pub page: (usize, usize),
    pub unsaved: bool,
}

/// Rows of `T` rendered through a fixed column layout.
pub struct DataTable<T> {
    columns: &'static [&'static str],
    cells: fn(&T) -> Vec<String>,
    items: Vec<T>,
    cursor: usize,
    page_size: usize,
    /// Local edits that are not on the server yet.
    pub manual_changes: bool,
}

impl<T> DataTable<T> {
    pub fn new(columns: &'static [&'static str], cells: fn(&T) -> Vec<String>) -> Self {
        Self {
            columns,
            cells,
            items: Vec::new(),
            cursor: 0,
            page_size: 10,
            manual_changes: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn select(&mut self, index: usize) {
        self.cursor = index.min(self.items.len().saturating_sub(1));
    }

    /// Set from the rendered height of the table body.
    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 1-based current page and total page count.
    pub fn page(&self) -> (usize, usize) {
        let pages = self.items.len().div_ceil(self.page_size).max(1);
        (self.cursor / self.page_size + 1, pages)
    }

    /// Index range of the rows on the current page.
    pub fn page_range(&self) -> std::ops::Range<usize> {
        let start = self.cursor / self.page_size * self.page_size;
        start..(start + self.page_size).min(self.items.len())
    }

    pub fn view(&self) -> TableView {
        let range = self.page_range();
        let start = range.start;
        TableView {
            columns: self.columns,
            rows: self.items[range].iter().map(|item| (self.cells)(item)).collect(),
            selected: (!self.items.is_empty()).then(|| self.cursor - start),
            page: self.page(),
            unsaved: self.manual_changes,
        }
    }

    /// Move the row at `from` to `to`, keeping the cursor on it.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from >= self.items.len() {
            return;
        }
        let item = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, item);
        self.cursor = to;
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Intent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let last = self.items.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('r') if ctrl => return Some(Intent::RefreshData),
            KeyCode::Char('d') if ctrl => return Some(Intent::SetAsDefault),
            KeyCode::Enter if self.manual_changes => {
                return Some(Intent::ApplyTableChange { save: true });
            }
            KeyCode::Enter if !self.items.is_empty() => return Some(Intent::EditItem),
            KeyCode::Esc if self.manual_changes => {
                return Some(Intent::ApplyTableChange { save: false });
            }
            KeyCode::Char('+') => return Some(Intent::ChangeOrder { up: true }),
            KeyCode::Char('-') => return Some(Intent::ChangeOrder { up: false }),
            KeyCode::Down | KeyCode::Char('j') => self.cursor = (self.cursor + 1).min(last),
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right | KeyCode::PageDown => {
                self.cursor = (self.cursor + self.page_size).min(last);
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.cursor = self.cursor.saturating_sub(self.page_size);
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = last,
            _ => {}
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Reorder tracking
// ---------------------------------------------------------------------------

/// Rows moved locally since the last fetch, keyed by name, with the index
/// each had in the server's order.
#[derive(Debug, Default)]
pub struct ReorderTracker {
    original: HashMap<String, usize>,
}

impl ReorderTracker {
    pub fn is_dirty(&self) -> bool {
        !self.original.is_empty()
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.original.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.original.clear();
    }

    /// Record a one-step move of `name`, currently at `current` in a table of
    /// `len` rows, and return the index it lands on.
    ///
    /// A row that lands back on its recorded index is no longer pending.
    pub fn nudge(&mut self, name: &str, current: usize, up: bool, len: usize) -> usize {
        let original = *self.original.entry(name.to_string()).or_insert(current);
        let target = if up {
            current.saturating_sub(1)
        } else {
            (current + 1).min(len.saturating_sub(1))
        };
        if target == original {
            self.original.remove(name);
        }
        target
    }

    /// Placement updates for every pending row, top to bottom over the final
    /// `order`. Each row is placed after its predecessor; the first row has
    /// none and is placed before the second instead.
    pub fn directives(&self, order: &[String]) -> Vec<RulePlacement> {
        let mut out = Vec::new();
        let mut previous: Option<&String> = None;
        for (i, name) in order.iter().enumerate() {
            if self.is_pending(name) {
                let placement = match previous {
                    Some(prev) => Some(Placement::AfterRule(prev.clone())),
                    None => order.get(i + 1).cloned().map(Placement::BeforeRule),
                };
                if let Some(placement) = placement {
                    out.push(RulePlacement {
                        name: name.clone(),
                        placement,
                    });
                }
            }
            previous = Some(name);
        }
        out
    }
}
