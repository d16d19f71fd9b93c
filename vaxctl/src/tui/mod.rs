//! Full-screen TUI for browsing and editing server resources.

mod app;
mod choice;
mod editor;
mod highlight;
mod input;
mod intent;
mod keystroke;
mod main_menu;
mod models;
mod ordered_select;
mod render;
mod resource_data;
pub mod style;
mod table;
#[cfg(test)]
mod testing;
mod viewer;

use std::io;

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::api::ApiClient;

use self::app::App;
pub use self::app::StartAt;

/// Entry point: launch the TUI against `api`, starting on `start`.
pub fn run(api: ApiClient, start: StartAt) -> Result<()> {
    info!(?start, "starting interactive mode");
    let mut app = App::new(api, start);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = app.run(&mut terminal);

    // Restore terminal even if the app errored
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result
}
