//! Key event handling: global keys, navigation menu, and hand-off to the
//! active resource screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{Resource, ResourceApi};

use super::app::{App, Screen};
use super::intent::{Intent, MainAction, View};

/// Result of handling a key event.
pub enum InputResult {
    /// Continue the event loop.
    Continue,
    /// Quit the TUI.
    Quit,
}

/// Handle a key event for whichever screen is showing.
pub fn handle_key<A: ResourceApi>(app: &mut App<A>, key: KeyEvent) -> InputResult {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return InputResult::Quit;
    }
    match app.screen {
        Screen::Navigation => handle_navigation(app, key),
        Screen::Resource(resource) => handle_resource(app, resource, key),
    }
}

// ---------------------------------------------------------------------------
// Navigation menu
// ---------------------------------------------------------------------------

fn handle_navigation<A: ResourceApi>(app: &mut App<A>, key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return InputResult::Quit,
        KeyCode::Char('k') | KeyCode::Up => app.menu_up(),
        KeyCode::Char('j') | KeyCode::Down => app.menu_down(),
        KeyCode::Enter => match app.selected_item().resource() {
            Some(resource) => app.open_resource(resource),
            None => return InputResult::Quit,
        },
        _ => {}
    }
    InputResult::Continue
}

// ---------------------------------------------------------------------------
// Resource screens
// ---------------------------------------------------------------------------

fn handle_resource<A: ResourceApi>(
    app: &mut App<A>,
    resource: Resource,
    key: KeyEvent,
) -> InputResult {
    let Some(model) = app.models.get_mut(resource) else {
        return InputResult::Continue;
    };

    // Pane keys only apply while no editor is capturing text.
    if !model.panes().in_dynamic_editor() {
        let panes = model.panes_mut();
        if let KeyCode::Char(c) = key.code
            && let Some(view) = View::from_shortcut(c)
        {
            panes.view = view;
            return InputResult::Continue;
        }
        match key.code {
            KeyCode::Char('q') => return InputResult::Quit,
            KeyCode::Char('b') => {
                app.dispatch(vec![Intent::ApplyMainAction(MainAction::Back)]);
                return InputResult::Continue;
            }
            KeyCode::Tab => {
                panes.view = panes.view.next();
                panes.clear_status();
                return InputResult::Continue;
            }
            KeyCode::BackTab => {
                panes.view = panes.view.prev();
                panes.clear_status();
                return InputResult::Continue;
            }
            _ => {}
        }
    }

    let intents = model.handle_key(key);
    app.dispatch(intents);
    InputResult::Continue
}
