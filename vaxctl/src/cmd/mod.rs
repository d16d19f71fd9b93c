//! One module per top-level subcommand. Each exposes a `run` taking the parsed
//! options and an [`ApiClient`](crate::api::ApiClient).

pub mod apply;
pub mod assign;
pub mod create;
pub mod delete;
pub mod edit;
pub mod generate;
pub mod get;
pub mod interactive;
pub mod set;

use anyhow::Result;
use serde::Serialize;

use crate::model::{self, OutputFormat, TableRow};
use crate::style;

/// Print `items` in `format` on stdout.
pub(crate) fn print_items<T>(items: &[T], single: bool, format: OutputFormat) -> Result<()>
where
    T: Serialize + TableRow,
{
    println!("{}", model::render(items, single, format)?);
    Ok(())
}

/// One-line success message.
pub(crate) fn done(message: &str) {
    println!("{} {}", style::green("✓"), message);
}
