//! Resource shapes exchanged with the API, and their CLI renderings.
//!
//! Every resource prints in one of three [`OutputFormat`]s. JSON and YAML are
//! plain serde dumps; the table format uses each resource's [`TableRow`]
//! columns, padded to the widest cell.

pub mod action;
pub mod cred;
pub mod device;
pub mod execution;
pub mod rule;
pub mod state;
pub mod work;

use anyhow::{Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

pub use action::Action;
pub use cred::Cred;
pub use device::Device;
pub use execution::Execution;
pub use rule::{Placement, Rule, RulePlacement};
pub use state::State;
pub use work::{Work, WorkAssignment, WorkCompleted};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Column layout of a resource in table output.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

/// Render `items` in the requested format.
///
/// `single` mirrors a lookup by name or id: JSON and YAML then emit the object
/// itself rather than a one-element list.
pub fn render<T>(items: &[T], single: bool, format: OutputFormat) -> Result<String>
where
    T: Serialize + TableRow,
{
    if single && items.is_empty() {
        bail!("the server returned no matching resource");
    }
    let out = match (format, single) {
        (OutputFormat::Table, _) => render_table(items),
        (OutputFormat::Json, true) => serde_json::to_string_pretty(&items[0])?,
        (OutputFormat::Json, false) => serde_json::to_string_pretty(items)?,
        (OutputFormat::Yaml, true) => serde_yaml::to_string(&items[0])?,
        (OutputFormat::Yaml, false) => serde_yaml::to_string(items)?,
    };
    Ok(out)
}

/// Padded, left-aligned columns with a styled header line.
pub fn render_table<T: TableRow>(items: &[T]) -> String {
    let headers = T::headers();
    let rows: Vec<Vec<String>> = items.iter().map(TableRow::cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            let longest = cell.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(longest);
            }
        }
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| crate::style::header(&pad(&h.to_uppercase(), *w)))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![header_line.trim_end().to_string()];
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(&cell.replace('\n', " "), *w))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

// ---------------------------------------------------------------------------
// serde helpers shared by the resource structs
// ---------------------------------------------------------------------------

/// The server sends `null` for unset strings and ids; treat it as the default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Pair {
        key: String,
        value: String,
    }

    impl TableRow for Pair {
        fn headers() -> &'static [&'static str] {
            &["Key", "Value"]
        }
        fn cells(&self) -> Vec<String> {
            vec![self.key.clone(), self.value.clone()]
        }
    }

    fn pairs() -> Vec<Pair> {
        vec![
            Pair {
                key: "a".into(),
                value: "short".into(),
            },
            Pair {
                key: "longer-key".into(),
                value: "x".into(),
            },
        ]
    }

    #[test]
    fn table_columns_are_padded() {
        console::set_colors_enabled(false);
        let out = render_table(&pairs());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "KEY         VALUE");
        assert_eq!(lines[1], "a           short");
        assert_eq!(lines[2], "longer-key  x");
    }

    #[test]
    fn single_json_is_an_object() {
        let out = render(&pairs()[..1], true, OutputFormat::Json).unwrap();
        assert!(out.starts_with('{'), "{out}");
        let out = render(&pairs(), false, OutputFormat::Json).unwrap();
        assert!(out.starts_with('['), "{out}");
    }

    #[test]
    fn single_with_no_items_fails() {
        let empty: Vec<Pair> = Vec::new();
        assert!(render(&empty, true, OutputFormat::Yaml).is_err());
    }
}
