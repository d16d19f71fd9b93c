use anyhow::Result;
use tracing::{Level, instrument};

use crate::api::ApiClient;
use crate::tui::{self, StartAt};

/// Open the terminal UI at the resource menu.
#[instrument(level = Level::TRACE, skip(api))]
pub fn run(api: ApiClient) -> Result<()> {
    tui::run(api, StartAt::Navigation)
}
