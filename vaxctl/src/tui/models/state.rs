//! State screen: browse captured states, flip their resolved flag, and hand
//! one off to the rule editor.

use anyhow::Result;
use crossterm::event::KeyEvent;
use serde_json::Value;
use tracing::info;

use crate::api::{Resource, ResourceApi};
use crate::model::State;
use crate::tui::intent::{Intent, MainAction, STATE_ACTIONS, View};
use crate::tui::main_menu::MainMenu;
use crate::tui::resource_data::{DataField, ResourceData};
use crate::tui::table::DataTable;

use super::{DynamicContent, Panes, SAVED_TO_SERVER, SubModel, ViewerContent, apply_shared};

pub const ID: &str = "Id";
pub const DEVICE: &str = "Device";
pub const RESOLVED: &str = "Resolved";

pub const NO_STATE: &str = "No state is selected";

const COLUMNS: &[&str] = &["Id", "Ocr Text", "Device", "Resolved", "Matched Rule"];

fn row_cells(state: &State) -> Vec<String> {
    vec![
        state.state_id.to_string(),
        state.ocr_text.replace('\n', " "),
        state.device_uid.clone(),
        state.resolved.to_string(),
        state.matched_rule.clone(),
    ]
}

pub struct StateModel {
    panes: Panes,
    state: State,
    table: DataTable<State>,
}

impl StateModel {
    pub fn new(api: &dyn ResourceApi) -> Self {
        let data = ResourceData::new(
            "State",
            vec![
                DataField::read_only(ID),
                DataField::read_only(DEVICE),
                DataField::toggle(RESOLVED, false),
            ],
        );
        let mut model = Self {
            panes: Panes::new(
                MainMenu::new("State Actions", STATE_ACTIONS, MainAction::SaveToServer),
                data,
                View::Viewer,
            ),
            state: State::default(),
            table: DataTable::new(COLUMNS, row_cells),
        };
        model.refresh(api);
        model
    }

    #[cfg(test)]
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn refresh(&mut self, api: &dyn ResourceApi) {
        match api.fetch_states() {
            Ok(states) => self.table.set_items(states),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    /// Load the state with `state_id` into the field list.
    pub fn edit_id(&mut self, state_id: i64, api: &dyn ResourceApi) {
        match api.fetch_state(state_id) {
            Ok(state) => self.load(state),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    fn load(&mut self, state: State) {
        self.state = state;
        self.sync_data();
        self.panes.view = View::Data;
    }

    fn sync_data(&mut self) {
        let loaded = self.state.state_id != 0;
        let data = &mut self.panes.data;
        data.set_value(
            ID,
            if loaded { self.state.state_id.to_string() } else { String::new() },
        );
        data.set_value(DEVICE, self.state.device_uid.clone());
        data.set_value(RESOLVED, self.state.resolved.to_string());
    }

    fn save_resolved(&mut self, api: &dyn ResourceApi) {
        if self.state.state_id == 0 {
            self.panes.error(NO_STATE);
            return;
        }
        info!(
            state_id = self.state.state_id,
            resolved = self.state.resolved,
            "updating state"
        );
        let result = api.update_state_resolved(self.state.state_id, self.state.resolved);
        self.panes.report(&result, SAVED_TO_SERVER);
        if result.is_ok() {
            self.refresh(api);
        }
    }
}

impl SubModel for StateModel {
    fn resource(&self) -> Resource {
        Resource::State
    }

    fn panes(&self) -> &Panes {
        &self.panes
    }

    fn panes_mut(&mut self) -> &mut Panes {
        &mut self.panes
    }

    fn document(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.state)?)
    }

    fn apply(&mut self, intent: Intent, api: &dyn ResourceApi) -> Vec<Intent> {
        match intent {
            Intent::UpdateToggleValue {
                name: RESOLVED,
                value,
            } => self.state.resolved = value,
            Intent::ApplyMainAction(MainAction::SaveToServer) => self.save_resolved(api),
            Intent::ApplyMainAction(MainAction::CreateRuleFromState) => {
                if self.state.state_id == 0 {
                    self.panes.error(NO_STATE);
                } else {
                    return vec![Intent::CreateRule {
                        state_id: self.state.state_id,
                    }];
                }
            }
            Intent::ApplyMainAction(MainAction::ClearFields) => {
                self.state = State::default();
                self.sync_data();
                self.panes.view = View::Viewer;
            }
            Intent::EditItem => {
                if let Some(state) = self.table.current().cloned() {
                    self.load(state);
                }
            }
            Intent::RefreshData => self.refresh(api),
            other => return apply_shared(self, other, api),
        }
        Vec::new()
    }

    fn field_key(&mut self, _field: &'static str, _key: KeyEvent) -> Vec<Intent> {
        Vec::new()
    }

    fn viewer_key(&mut self, key: KeyEvent) -> Vec<Intent> {
        self.table.handle_key(key).into_iter().collect()
    }

    fn field_content(&self, _field: &'static str) -> DynamicContent<'_> {
        DynamicContent::Empty
    }

    fn viewer_content(&self) -> ViewerContent<'_> {
        ViewerContent::Table(self.table.view())
    }

    fn resize(&mut self, viewer_rows: usize, dynamic_rows: usize) {
        self.table.set_page_size(viewer_rows.saturating_sub(1));
        self.panes.yaml_preview.set_height(dynamic_rows);
    }
}
