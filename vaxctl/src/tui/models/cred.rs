//! Credentials screen. Passwords stay masked in every pane until ctrl+p.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use tracing::info;

use crate::api::{Resource, ResourceApi};
use crate::model::Cred;
use crate::model::cred::mask;
use crate::tui::editor::FieldEditor;
use crate::tui::intent::{DynamicView, Intent, MainAction, RESOURCE_ACTIONS, View};
use crate::tui::main_menu::MainMenu;
use crate::tui::resource_data::{DataField, ResourceData};
use crate::tui::table::DataTable;

use super::{
    DynamicContent, Panes, SAVED_TO_SERVER, SubModel, ViewerContent, apply_shared, route_key,
    save_document,
};

pub const NAME: &str = "Name";
pub const USERNAME: &str = "Username";
pub const PASSWORD: &str = "Password";

pub const DEFAULT_SAVED: &str = "Default creds updated!";

const COLUMNS: &[&str] = &["Name", "Username", "Password", "Default"];
const PASSWORD_COLUMN: usize = 2;

fn row_cells(cred: &Cred) -> Vec<String> {
    vec![
        cred.name.clone(),
        cred.username.clone(),
        cred.password.clone(),
        cred.is_default.to_string(),
    ]
}

pub struct CredModel {
    panes: Panes,
    cred: Cred,
    name_input: FieldEditor,
    username_input: FieldEditor,
    password_input: FieldEditor,
    show_passwords: bool,
    table: DataTable<Cred>,
    /// Row marked with ctrl+d, not yet sent.
    pending_default: Option<String>,
}

impl CredModel {
    pub fn new(api: &dyn ResourceApi) -> Self {
        let data = ResourceData::new(
            "Credential",
            vec![
                DataField::editable(NAME),
                DataField::editable(USERNAME),
                DataField::editable(PASSWORD),
            ],
        );
        let mut password_input = FieldEditor::new("Enter Password:", "");
        password_input.set_masked(true);
        let mut model = Self {
            panes: Panes::new(
                MainMenu::new("Credential Actions", RESOURCE_ACTIONS, MainAction::ShowYaml),
                data,
                View::Viewer,
            ),
            cred: Cred::default(),
            name_input: FieldEditor::new("Enter Creds Name:", ""),
            username_input: FieldEditor::new("Enter Username:", ""),
            password_input,
            show_passwords: false,
            table: DataTable::new(COLUMNS, row_cells),
            pending_default: None,
        };
        model.refresh(api);
        model
    }

    #[cfg(test)]
    pub fn cred(&self) -> &Cred {
        &self.cred
    }

    #[cfg(test)]
    pub fn shows_passwords(&self) -> bool {
        self.show_passwords
    }

    pub fn refresh(&mut self, api: &dyn ResourceApi) {
        match api.fetch_creds() {
            Ok(creds) => self.table.set_items(creds),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    pub fn edit_named(&mut self, name: &str, api: &dyn ResourceApi) {
        match api.fetch_cred(name) {
            Ok(cred) => self.load(cred),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    pub fn toggle_passwords(&mut self) {
        self.show_passwords = !self.show_passwords;
        self.password_input.set_masked(!self.show_passwords);
        self.sync_data();
    }

    fn load(&mut self, cred: Cred) {
        self.cred = Cred {
            name: cred.name,
            username: cred.username,
            password: cred.password,
            ..Cred::default()
        };
        self.name_input.set_value(&self.cred.name);
        self.username_input.set_value(&self.cred.username);
        self.password_input.set_value(&self.cred.password);
        self.sync_data();
        self.panes.view = View::Data;
    }

    fn sync_data(&mut self) {
        let password = if self.show_passwords {
            self.cred.password.clone()
        } else {
            mask(&self.cred.password)
        };
        let data = &mut self.panes.data;
        data.set_value(NAME, self.cred.name.clone());
        data.set_value(USERNAME, self.cred.username.clone());
        data.set_value(PASSWORD, password);
    }

    fn exit_field(&mut self, field: &'static str, save: bool) {
        match (field, save) {
            (NAME, true) => self.cred.name = self.name_input.value(),
            (NAME, false) => self.name_input.set_value(&self.cred.name),
            (USERNAME, true) => self.cred.username = self.username_input.value(),
            (USERNAME, false) => self.username_input.set_value(&self.cred.username),
            (PASSWORD, true) => self.cred.password = self.password_input.value(),
            (PASSWORD, false) => self.password_input.set_value(&self.cred.password),
            _ => {}
        }
        self.sync_data();
    }

    /// Mark the highlighted row as default locally. Nothing is sent until
    /// the change is applied.
    fn mark_default(&mut self) {
        let Some(name) = self.table.current().map(|c| c.name.clone()) else {
            return;
        };
        for cred in self.table.iter_mut() {
            cred.is_default = cred.name == name;
        }
        self.pending_default = Some(name);
        self.table.manual_changes = true;
    }

    fn apply_table_change(&mut self, save: bool, api: &dyn ResourceApi) {
        if save && let Some(name) = self.pending_default.take() {
            info!(cred = %name, "setting default creds");
            let result = api.set_default_cred(&name);
            self.panes.report(&result, DEFAULT_SAVED);
        }
        self.pending_default = None;
        self.table.manual_changes = false;
        self.refresh(api);
    }
}

impl SubModel for CredModel {
    fn resource(&self) -> Resource {
        Resource::Cred
    }

    fn panes(&self) -> &Panes {
        &self.panes
    }

    fn panes_mut(&mut self) -> &mut Panes {
        &mut self.panes
    }

    fn document(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.cred)?)
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
                    return vec![Intent::UpdateCredNames, Intent::RefreshData];
                }
            }
            Intent::ApplyMainAction(MainAction::ClearFields) => self.load(Cred::default()),
            Intent::EditItem => {
                if let Some(cred) = self.table.current().cloned() {
                    self.load(cred);
                }
            }
            Intent::SetAsDefault => self.mark_default(),
            Intent::ApplyTableChange { save } => self.apply_table_change(save, api),
            Intent::RefreshData => self.refresh(api),
            other => return apply_shared(self, other, api),
        }
        Vec::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Intent> {
        if key.code == KeyCode::Char('p') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.toggle_passwords();
            return Vec::new();
        }
        route_key(self, key)
    }

    fn field_key(&mut self, field: &'static str, key: KeyEvent) -> Vec<Intent> {
        let intent = match field {
            NAME => self.name_input.handle_key(key),
            USERNAME => self.username_input.handle_key(key),
            PASSWORD => self.password_input.handle_key(key),
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
            USERNAME => DynamicContent::Editor(&self.username_input),
            PASSWORD => DynamicContent::Editor(&self.password_input),
            _ => DynamicContent::Empty,
        }
    }

    fn viewer_content(&self) -> ViewerContent<'_> {
        let mut view = self.table.view();
        if !self.show_passwords {
            for row in &mut view.rows {
                if let Some(cell) = row.get_mut(PASSWORD_COLUMN) {
                    *cell = mask(cell);
                }
            }
        }
        ViewerContent::Table(view)
    }

    fn resize(&mut self, viewer_rows: usize, dynamic_rows: usize) {
        self.table.set_page_size(viewer_rows.saturating_sub(1));
        self.panes.yaml_preview.set_height(dynamic_rows);
    }

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        let mut hints = vec![("ctrl+p", "show/hide passwords")];
        if self.panes.view == View::Viewer {
            hints.push(("ctrl+d", "set default"));
        }
        hints
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::tui::testing::{FakeApi, ctrl, key};

    fn api() -> FakeApi {
        let cred = |name: &str, is_default| Cred {
            name: name.into(),
            username: "admin".into(),
            password: "hunter2".into(),
            is_default,
            ..Cred::default()
        };
        FakeApi {
            creds: vec![cred("bmc", true), cred("ilo", false)].into(),
            ..FakeApi::default()
        }
    }

    fn press(model: &mut CredModel, api: &FakeApi, k: KeyEvent) -> Vec<Intent> {
        let mut out = Vec::new();
        for intent in model.handle_key(k) {
            out.extend(model.apply(intent, api));
        }
        out
    }

    fn table_rows(model: &CredModel) -> Vec<Vec<String>> {
        match model.viewer_content() {
            ViewerContent::Table(view) => view.rows,
            ViewerContent::Text { .. } => panic!("creds viewer is a table"),
        }
    }

    #[test]
    fn passwords_masked_until_toggled() {
        let api = api();
        let mut model = CredModel::new(&api);
        assert_eq!(table_rows(&model)[0][PASSWORD_COLUMN], "*******");
        model.edit_named("bmc", &api);
        assert_eq!(model.panes().data.value(PASSWORD), "*******");

        press(&mut model, &api, ctrl('p'));
        assert!(model.shows_passwords());
        assert_eq!(model.panes().data.value(PASSWORD), "hunter2");
        assert_eq!(table_rows(&model)[0][PASSWORD_COLUMN], "hunter2");
        let DynamicContent::Editor(editor) = model.field_content(PASSWORD) else {
            panic!("password is a text editor");
        };
        assert!(!editor.is_masked());
    }

    #[test]
    fn default_is_pending_until_applied() {
        let api = api();
        let mut model = CredModel::new(&api);
        press(&mut model, &api, key(KeyCode::Down));
        press(&mut model, &api, ctrl('d'));
        assert!(api.calls().is_empty());
        assert_eq!(table_rows(&model)[1][3], "true");
        assert_eq!(table_rows(&model)[0][3], "false");

        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(api.calls(), vec!["default ilo"]);
        assert_eq!(
            model.panes().status.as_ref().map(|s| s.text.as_str()),
            Some(DEFAULT_SAVED)
        );
    }

    #[test]
    fn escape_drops_pending_default() {
        let api = api();
        let mut model = CredModel::new(&api);
        press(&mut model, &api, key(KeyCode::Down));
        press(&mut model, &api, ctrl('d'));
        press(&mut model, &api, key(KeyCode::Esc));
        assert!(api.calls().is_empty());
        assert_eq!(table_rows(&model)[0][3], "true");
    }

    #[test]
    fn save_refreshes_cred_names() {
        let api = api();
        let mut model = CredModel::new(&api);
        model.edit_named("ilo", &api);
        let out = model.apply(Intent::ApplyMainAction(MainAction::SaveToServer), &api);
        assert_eq!(out, vec![Intent::UpdateCredNames, Intent::RefreshData]);
        assert_eq!(api.calls(), vec!["save creds ilo"]);
    }
}
