//! Ratatui style constants for the interactive mode.
//!
//! Terminal-relative modifiers are preferred over fixed colors so the UI
//! stays readable on remapped palettes. Colors are kept for the few places
//! that carry meaning (matches, errors, validity markers).

use ratatui::style::{Color, Modifier, Style};

/// Focused row in lists, tables and the data panel.
pub const SELECTED: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Title bar.
pub const HEADER: Style = Style::new()
    .add_modifier(Modifier::BOLD)
    .add_modifier(Modifier::REVERSED);

/// Pane titles and table column headers.
pub const TITLE: Style = Style::new().add_modifier(Modifier::BOLD);

/// Secondary text: hints, placeholders, unset values.
pub const DIM: Style = Style::new().add_modifier(Modifier::DIM);

/// Key hints bar.
pub const STATUS_BAR: Style = Style::new().add_modifier(Modifier::DIM);

/// Border of an inactive pane.
pub const BORDER: Style = Style::new().add_modifier(Modifier::DIM);

/// Border of the pane receiving keys.
pub const ACTIVE_BORDER: Style = Style::new().fg(Color::Cyan);

/// Regex matches inside OCR text.
pub const MATCH: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

/// Unsaved-changes banner under a table.
pub const PENDING: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Chosen entries in a selection editor.
pub const CHOSEN: Style = Style::new().fg(Color::Green);

pub const INFO: Style = Style::new().fg(Color::Green);

pub const ERROR: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

/// Status line style for a message.
pub fn status_style(is_error: bool) -> Style {
    if is_error { ERROR } else { INFO }
}
