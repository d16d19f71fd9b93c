use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;

use crate::api::{Resource, ResourceApi};
use crate::model::Action;
use crate::tui::choice::ChoiceList;
use crate::tui::editor::{FieldEditor, Validator, digits_only};
use crate::tui::intent::{DynamicView, Intent, MainAction, RESOURCE_ACTIONS, View};
use crate::tui::keystroke::KeystrokeEditor;
use crate::tui::main_menu::MainMenu;
use crate::tui::resource_data::{DataField, ResourceData};
use crate::tui::table::DataTable;

use super::{
    DynamicContent, Panes, SAVED_TO_SERVER, SubModel, ViewerContent, apply_shared, save_document,
};

pub const NAME: &str = "Name";
pub const TYPE: &str = "Type";
pub const DATA: &str = "Data";

const NO_TYPE: &str = "Action Type must be set to edit the data";

const COLUMNS: &[&str] = &["Name", "Type", "Data"];

fn row_cells(action: &Action) -> Vec<String> {
    vec![
        action.name.clone(),
        action.action_type.clone(),
        action.action_data.clone(),
    ]
}

/// Which editor the Data field opens, by action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataKind {
    Unset,
    Text,
    Seconds,
    Power,
    Keystroke,
}

impl DataKind {
    fn of(action_type: &str) -> Self {
        match action_type {
            "" => Self::Unset,
            "sleep" => Self::Seconds,
            "power" => Self::Power,
            "keystroke" => Self::Keystroke,
            _ => Self::Text,
        }
    }

    fn validator(self) -> Option<Validator> {
        match self {
            Self::Seconds => Some(digits_only),
            _ => None,
        }
    }
}

/// Action screen. Changing the type clears the data, since every type reads
/// its data differently.
pub struct ActionModel {
    panes: Panes,
    action: Action,
    name_input: FieldEditor,
    type_choice: ChoiceList,
    data_input: FieldEditor,
    power_choice: ChoiceList,
    keystroke: KeystrokeEditor,
    table: DataTable<Action>,
}

impl ActionModel {
    pub fn new(api: &dyn ResourceApi) -> Self {
        let data = ResourceData::new(
            "Action",
            vec![
                DataField::editable(NAME),
                DataField::editable(TYPE),
                DataField::editable(DATA),
            ],
        );
        let mut model = Self {
            panes: Panes::new(
                MainMenu::new("Action Actions", RESOURCE_ACTIONS, MainAction::ShowYaml),
                data,
                View::Viewer,
            ),
            action: Action::default(),
            name_input: FieldEditor::new("Enter Action Name:", ""),
            type_choice: ChoiceList::new("Choose Action Type:", Vec::new()),
            data_input: FieldEditor::new("Enter Action Data:", ""),
            power_choice: ChoiceList::new("Select Power Action:", Vec::new()),
            keystroke: KeystrokeEditor::new(Vec::new()),
            table: DataTable::new(COLUMNS, row_cells),
        };
        match api.fetch_action_types() {
            Ok(types) => model.type_choice.set_options(types),
            Err(e) => model.panes.error(format!("{e:#}")),
        }
        match api.fetch_power_options() {
            Ok(options) => model.power_choice.set_options(options),
            Err(e) => model.panes.error(format!("{e:#}")),
        }
        match api.fetch_special_keys() {
            Ok(keys) => model.keystroke = KeystrokeEditor::new(keys),
            Err(e) => model.panes.error(format!("{e:#}")),
        }
        model.refresh(api);
        model
    }

    #[cfg(test)]
    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn refresh(&mut self, api: &dyn ResourceApi) {
        match api.fetch_actions() {
            Ok(actions) => self.table.set_items(actions),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    pub fn edit_named(&mut self, name: &str, api: &dyn ResourceApi) {
        match api.fetch_action(name) {
            Ok(action) => self.load(action),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    fn data_kind(&self) -> DataKind {
        DataKind::of(&self.action.action_type)
    }

    fn load(&mut self, action: Action) {
        self.action = Action {
            name: action.name,
            action_type: action.action_type,
            action_data: action.action_data,
            ..Action::default()
        };
        self.name_input.set_value(&self.action.name);
        self.type_choice.set_value(&self.action.action_type);
        self.reset_data_editors();
        self.sync_data();
        self.panes.view = View::Data;
    }

    /// Point every data editor back at the committed data.
    fn reset_data_editors(&mut self) {
        let kind = self.data_kind();
        let data = &self.action.action_data;
        self.data_input.set_value(data);
        self.data_input.set_validator(kind.validator());
        self.power_choice.set_value(data);
        self.keystroke.set_value(data);
    }

    fn sync_data(&mut self) {
        let data = &mut self.panes.data;
        data.set_value(NAME, self.action.name.clone());
        data.set_value(TYPE, self.action.action_type.clone());
        data.set_value(DATA, self.action.action_data.clone());
    }

    fn data_draft(&self) -> Option<String> {
        match self.data_kind() {
            DataKind::Unset => None,
            DataKind::Text | DataKind::Seconds => Some(self.data_input.value()),
            DataKind::Power => self.power_choice.value().map(str::to_string),
            DataKind::Keystroke => Some(self.keystroke.value()),
        }
    }

    fn exit_field(&mut self, field: &'static str, save: bool) {
        match (field, save) {
            (NAME, true) => self.action.name = self.name_input.value(),
            (NAME, false) => self.name_input.set_value(&self.action.name),
            (TYPE, true) => {
                let chosen = self.type_choice.value().unwrap_or_default().to_string();
                if chosen != self.action.action_type {
                    self.action.action_type = chosen;
                    self.action.action_data.clear();
                    self.reset_data_editors();
                }
            }
            (TYPE, false) => self.type_choice.set_value(&self.action.action_type),
            (DATA, true) => {
                if let Some(draft) = self.data_draft() {
                    self.action.action_data = draft;
                }
                self.reset_data_editors();
            }
            (DATA, false) => self.reset_data_editors(),
            _ => {}
        }
        self.sync_data();
    }

    fn data_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match self.data_kind() {
            DataKind::Unset => match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(Intent::ExitDynamicView { save: false }),
                _ => None,
            },
            DataKind::Text | DataKind::Seconds => self.data_input.handle_key(key),
            DataKind::Power => self.power_choice.handle_key(key),
            DataKind::Keystroke => self.keystroke.handle_key(key),
        }
    }
}

impl SubModel for ActionModel {
    fn resource(&self) -> Resource {
        Resource::Action
    }

    fn panes(&self) -> &Panes {
        &self.panes
    }

    fn panes_mut(&mut self) -> &mut Panes {
        &mut self.panes
    }

    fn document(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.action)?)
    }

    fn apply(&mut self, intent: Intent, api: &dyn ResourceApi) -> Vec<Intent> {
        match intent {
            Intent::ExitDynamicView { save } => match self.panes.dynamic {
                Some(DynamicView::Field(field)) => {
                    self.exit_field(field, save);
                    self.panes.close();
                }
                _ => return apply_shared(self, intent, api),
            },
            Intent::ApplyMainAction(MainAction::SaveToServer) => {
                let result = save_document(self, api);
                self.panes.report(&result, SAVED_TO_SERVER);
                if result.is_ok() {
                    return vec![Intent::UpdateActionNames, Intent::RefreshData];
                }
            }
            Intent::ApplyMainAction(MainAction::ClearFields) => {
                self.load(Action::default());
                self.panes.view = View::Data;
            }
            Intent::EditItem => {
                if let Some(action) = self.table.current().cloned() {
                    self.load(action);
                }
            }
            Intent::RefreshData => self.refresh(api),
            other => return apply_shared(self, other, api),
        }
        Vec::new()
    }

    fn field_key(&mut self, field: &'static str, key: KeyEvent) -> Vec<Intent> {
        let intent = match field {
            NAME => self.name_input.handle_key(key),
            TYPE => self.type_choice.handle_key(key),
            DATA => self.data_key(key),
            _ => None,
        };
        intent.into_iter().collect()
    }

    fn viewer_key(&mut self, key: KeyEvent) -> Vec<Intent> {
        self.table.handle_key(key).into_iter().collect()
    }

    fn field_content(&self, field: &'static str) -> DynamicContent<'_> {
        match field {
            NAME => DynamicContent::Editor(&self.name_input),
            TYPE => DynamicContent::Choice(&self.type_choice),
            DATA => match self.data_kind() {
                DataKind::Unset => DynamicContent::Message(NO_TYPE),
                DataKind::Text | DataKind::Seconds => DynamicContent::Editor(&self.data_input),
                DataKind::Power => DynamicContent::Choice(&self.power_choice),
                DataKind::Keystroke => DynamicContent::Keystroke(&self.keystroke),
            },
            _ => DynamicContent::Empty,
        }
    }

    fn viewer_content(&self) -> ViewerContent<'_> {
        ViewerContent::Table(self.table.view())
    }

    fn resize(&mut self, viewer_rows: usize, dynamic_rows: usize) {
        self.table.set_page_size(viewer_rows.saturating_sub(1));
        self.panes.yaml_preview.set_height(dynamic_rows);
    }

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        let editing_data = self.panes.view == View::Dynamic
            && self.panes.dynamic == Some(DynamicView::Field(DATA));
        if editing_data && self.data_kind() == DataKind::Keystroke {
            self.keystroke.hints()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::tui::testing::{FakeApi, key, type_str};

    fn api() -> FakeApi {
        FakeApi {
            action_types: ["sleep", "power", "ipmitool", "keystroke"]
                .map(String::from)
                .to_vec(),
            power_options: ["on", "off", "cycle"].map(String::from).to_vec(),
            special_keys: ["Control", "Enter"].map(String::from).to_vec(),
            actions: vec![
                Action {
                    name: "nap".into(),
                    action_type: "sleep".into(),
                    action_data: "10".into(),
                    ..Action::default()
                },
                Action {
                    name: "power-cycle".into(),
                    action_type: "power".into(),
                    action_data: "cycle".into(),
                    ..Action::default()
                },
                Action {
                    name: "interrupt".into(),
                    action_type: "keystroke".into(),
                    action_data: "Keys.Control+c".into(),
                    ..Action::default()
                },
            ]
            .into(),
            ..FakeApi::default()
        }
    }

    fn press(model: &mut ActionModel, api: &FakeApi, k: KeyEvent) -> Vec<Intent> {
        let mut out = Vec::new();
        for intent in model.handle_key(k) {
            out.extend(model.apply(intent, api));
        }
        out
    }

    #[test]
    fn type_change_clears_data() {
        let api = api();
        let mut model = ActionModel::new(&api);
        model.edit_named("nap", &api);
        assert_eq!(model.panes().data.value(DATA), "10");

        model.apply(Intent::SetDynamicView(DynamicView::Field(TYPE)), &api);
        press(&mut model, &api, key(KeyCode::Down));
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.action().action_type, "power");
        assert_eq!(model.action().action_data, "");
        assert_eq!(model.panes().data.value(DATA), "");
    }

    #[test]
    fn same_type_keeps_data() {
        let api = api();
        let mut model = ActionModel::new(&api);
        model.edit_named("nap", &api);
        model.apply(Intent::SetDynamicView(DynamicView::Field(TYPE)), &api);
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.action().action_data, "10");
    }

    #[test]
    fn sleep_data_must_be_digits() {
        let api = api();
        let mut model = ActionModel::new(&api);
        model.edit_named("nap", &api);
        model.apply(Intent::SetDynamicView(DynamicView::Field(DATA)), &api);
        type_str(|k| press(&mut model, &api, k), "s");
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.panes().view, View::Dynamic);
        press(&mut model, &api, key(KeyCode::Backspace));
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.panes().view, View::Data);
    }

    #[test]
    fn save_refreshes_action_names() {
        let api = api();
        let mut model = ActionModel::new(&api);
        model.edit_named("nap", &api);
        let out = model.apply(Intent::ApplyMainAction(MainAction::SaveToServer), &api);
        assert_eq!(out, vec![Intent::UpdateActionNames, Intent::RefreshData]);
        assert_eq!(
            api.saved.borrow()["action/nap"],
            serde_json::json!({"name": "nap", "action_type": "sleep", "action_data": "10"})
        );
    }

    #[test]
    fn save_without_name_fails() {
        let api = api();
        let mut model = ActionModel::new(&api);
        let out = model.apply(Intent::ApplyMainAction(MainAction::SaveToServer), &api);
        assert!(out.is_empty());
        assert!(api.calls().is_empty());
        assert!(model.panes().status.as_ref().is_some_and(|s| s.is_error));
    }

    #[test]
    fn power_data_is_chosen_from_server_options() {
        let api = api();
        let mut model = ActionModel::new(&api);
        model.edit_named("power-cycle", &api);
        model.apply(Intent::SetDynamicView(DynamicView::Field(DATA)), &api);
        assert!(matches!(
            model.dynamic_content(),
            DynamicContent::Choice(list) if list.value() == Some("cycle")
        ));

        press(&mut model, &api, key(KeyCode::Up));
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.action().action_data, "off");
        assert_eq!(model.panes().data.value(DATA), "off");
    }

    #[test]
    fn keystroke_data_uses_the_step_editor() {
        let api = api();
        let mut model = ActionModel::new(&api);
        model.edit_named("interrupt", &api);
        model.apply(Intent::SetDynamicView(DynamicView::Field(DATA)), &api);
        assert!(matches!(model.dynamic_content(), DynamicContent::Keystroke(_)));
        assert!(model.hints().contains(&("a", "add combo")));

        press(&mut model, &api, key(KeyCode::Char('s')));
        type_str(|k| press(&mut model, &api, k), "exit");
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.panes().view, View::Dynamic);

        press(&mut model, &api, key(KeyCode::Char('a')));
        press(&mut model, &api, key(KeyCode::Char('a')));
        press(&mut model, &api, key(KeyCode::Down));
        press(&mut model, &api, key(KeyCode::Enter));
        press(&mut model, &api, key(KeyCode::Enter));
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.panes().view, View::Data);
        assert_eq!(model.action().action_data, "Keys.Control+c;exit;Keys.Enter");
    }

    #[test]
    fn keystroke_escape_restores_data() {
        let api = api();
        let mut model = ActionModel::new(&api);
        model.edit_named("interrupt", &api);
        model.apply(Intent::SetDynamicView(DynamicView::Field(DATA)), &api);
        press(&mut model, &api, key(KeyCode::Char('r')));
        press(&mut model, &api, key(KeyCode::Esc));
        assert_eq!(model.action().action_data, "Keys.Control+c");

        model.apply(Intent::SetDynamicView(DynamicView::Field(DATA)), &api);
        assert!(matches!(
            model.dynamic_content(),
            DynamicContent::Keystroke(editor) if editor.value() == "Keys.Control+c"
        ));
    }

    #[test]
    fn data_needs_a_type_first() {
        let api = api();
        let mut model = ActionModel::new(&api);
        model.apply(Intent::ApplyMainAction(MainAction::ClearFields), &api);
        model.apply(Intent::SetDynamicView(DynamicView::Field(DATA)), &api);
        assert!(matches!(model.dynamic_content(), DynamicContent::Message(NO_TYPE)));
        press(&mut model, &api, key(KeyCode::Char('x')));
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.panes().view, View::Data);
        assert_eq!(model.action().action_data, "");
    }
}
