//! Colored CLI output helpers.
//!
//! Backed by [`console`], so styling is dropped automatically when the stream
//! is not a terminal or `NO_COLOR` is set.

use console::Style;

fn out() -> Style {
    Style::new()
}

fn err() -> Style {
    Style::new().for_stderr()
}

// ---------------------------------------------------------------------------
// stdout
// ---------------------------------------------------------------------------

pub fn bold(text: &str) -> String {
    out().bold().apply_to(text).to_string()
}

pub fn dim(text: &str) -> String {
    out().dim().apply_to(text).to_string()
}

/// Table column headers.
pub fn header(text: &str) -> String {
    out().cyan().bold().apply_to(text).to_string()
}

/// Success messages ("Created rule 'x'").
pub fn green(text: &str) -> String {
    out().green().apply_to(text).to_string()
}

pub fn red(text: &str) -> String {
    out().red().apply_to(text).to_string()
}

pub fn yellow(text: &str) -> String {
    out().yellow().apply_to(text).to_string()
}

pub fn cyan(text: &str) -> String {
    out().cyan().apply_to(text).to_string()
}

// ---------------------------------------------------------------------------
// stderr
// ---------------------------------------------------------------------------

pub fn err_red_bold(text: &str) -> String {
    err().red().bold().apply_to(text).to_string()
}

pub fn err_dim(text: &str) -> String {
    err().dim().apply_to(text).to_string()
}

pub fn err_cyan_bold(text: &str) -> String {
    err().cyan().bold().apply_to(text).to_string()
}

pub fn err_yellow(text: &str) -> String {
    err().yellow().apply_to(text).to_string()
}
