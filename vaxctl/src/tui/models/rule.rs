//! Rule screen: the rules table with reordering, and the rule editor with
//! live regex highlighting over the source state's OCR text.
//!
//! While a rule is being edited the viewer pane shows the OCR text instead
//! of the table. Every keystroke in the regex editor re-runs the
//! highlighter; a pattern that does not compile leaves the last good
//! rendering in place and reports the error in the status line.

use anyhow::Result;
use crossterm::event::KeyEvent;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{Resource, ResourceApi};
use crate::model::Rule;
use crate::tui::editor::FieldEditor;
use crate::tui::highlight::{HighlightError, highlight};
use crate::tui::intent::{DynamicView, Intent, MainAction, RESOURCE_ACTIONS, View};
use crate::tui::main_menu::MainMenu;
use crate::tui::ordered_select::OrderedSelection;
use crate::tui::resource_data::{DataField, ResourceData};
use crate::tui::table::{DataTable, ReorderTracker};
use crate::tui::viewer::TextViewer;

use super::{
    DynamicContent, Panes, SAVED_TO_SERVER, SubModel, ViewerContent, apply_shared, save_document,
};

pub const NAME: &str = "Name";
pub const REGEX: &str = "Regex";
pub const ACTIONS: &str = "Actions";
pub const IGNORE_CASE: &str = "Ignore Case";
pub const ENABLED: &str = "Enabled";

const COLUMNS: &[&str] = &[
    "Name",
    "State ID",
    "Regex",
    "Actions",
    "Ignore Case",
    "Enabled",
    "Position",
];

const REGEX_ERROR: &str = "Regex error";
pub const ORDER_SAVED: &str = "Changes saved to server!";

fn row_cells(rule: &Rule) -> Vec<String> {
    vec![
        rule.name.clone(),
        rule.state_id.to_string(),
        rule.regex.clone(),
        rule.actions.join(", "),
        rule.ignore_case.to_string(),
        rule.enabled.to_string(),
        rule.position.to_string(),
    ]
}

fn compiles(pattern: &str) -> Result<(), String> {
    highlight(pattern, false, "")
        .map(|_| ())
        .map_err(|e| e.to_string())
}

pub struct RuleModel {
    panes: Panes,
    /// Committed field values.
    rule: Rule,
    /// A specific rule (or a state's new rule) is loaded.
    editing: bool,
    name_input: FieldEditor,
    regex_input: FieldEditor,
    actions: OrderedSelection,
    ocr_text: String,
    ocr_viewer: TextViewer,
    table: DataTable<Rule>,
    reorder: ReorderTracker,
}

impl RuleModel {
    pub fn new(api: &dyn ResourceApi) -> Self {
        let data = ResourceData::new(
            "Rule",
            vec![
                DataField::editable(NAME),
                DataField::editable(REGEX),
                DataField::editable(ACTIONS),
                DataField::toggle(IGNORE_CASE, true),
                DataField::toggle(ENABLED, true),
            ],
        );
        let mut model = Self {
            panes: Panes::new(
                MainMenu::new("Rule Actions", RESOURCE_ACTIONS, MainAction::ShowYaml),
                data,
                View::Viewer,
            ),
            rule: Rule::default(),
            editing: false,
            name_input: FieldEditor::new("Enter Rule Name:", ""),
            regex_input: FieldEditor::new("Enter Regex:", "").with_validator(compiles),
            actions: OrderedSelection::new("Select actions for rule:", &[], &[]),
            ocr_text: String::new(),
            ocr_viewer: TextViewer::default(),
            table: DataTable::new(COLUMNS, row_cells),
            reorder: ReorderTracker::default(),
        };
        model.refresh(api);
        model.update_action_names(api);
        model
    }

    #[cfg(test)]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    #[cfg(test)]
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    #[cfg(test)]
    pub fn ocr_viewer(&self) -> &TextViewer {
        &self.ocr_viewer
    }

    #[cfg(test)]
    pub fn table(&self) -> &DataTable<Rule> {
        &self.table
    }

    /// Leave edit mode and show the rules table again.
    pub fn stop_editing(&mut self) {
        self.editing = false;
        self.panes.view = View::Viewer;
        self.panes.dynamic = None;
        self.panes.clear_status();
    }

    /// Refetch the rules. The server order replaces any unsaved moves.
    pub fn refresh(&mut self, api: &dyn ResourceApi) {
        match api.fetch_rules() {
            Ok(rules) => {
                if self.reorder.is_dirty() {
                    debug!("dropping unsaved rule order on refresh");
                }
                self.reorder.clear();
                self.table.manual_changes = false;
                self.table.set_items(rules);
            }
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    pub fn update_action_names(&mut self, api: &dyn ResourceApi) {
        match api.fetch_action_names() {
            Ok(names) => self.actions.update_candidates(&names),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    /// Start a new rule against the OCR text of `state_id`, in the regex
    /// editor.
    pub fn create_from_state(&mut self, state_id: i64, api: &dyn ResourceApi) {
        info!(state_id, "creating rule from state");
        self.load(
            Rule {
                state_id,
                ..Rule::default()
            },
            api,
        );
        self.panes.open(DynamicView::Field(REGEX));
    }

    /// Fetch the rule named `name` and edit it.
    pub fn edit_named(&mut self, name: &str, api: &dyn ResourceApi) {
        match api.fetch_rule(name) {
            Ok(rule) => self.load(rule, api),
            Err(e) => self.panes.error(format!("{e:#}")),
        }
    }

    fn load(&mut self, rule: Rule, api: &dyn ResourceApi) {
        self.ocr_text = if rule.state_id != 0 {
            match api.fetch_state_ocr_text(rule.state_id) {
                Ok(text) => text,
                Err(e) => {
                    self.panes.error(format!("{e:#}"));
                    String::new()
                }
            }
        } else {
            String::new()
        };
        self.rule = Rule {
            name: rule.name,
            state_id: rule.state_id,
            regex: rule.regex,
            actions: rule.actions,
            ignore_case: rule.ignore_case,
            enabled: rule.enabled,
            ..Rule::default()
        };
        self.name_input.set_value(&self.rule.name);
        self.regex_input.set_value(&self.rule.regex);
        self.actions.set_selected(&self.rule.actions);
        self.ocr_viewer.set_content(self.ocr_text.clone());
        self.sync_data();
        let committed = self.rule.regex.clone();
        let _ = self.update_regex(&committed);
        self.editing = true;
        self.panes.dynamic = None;
        self.panes.view = View::Data;
    }

    fn reset(&mut self) {
        self.rule = Rule::default();
        self.ocr_text.clear();
        self.ocr_viewer.set_content("");
        self.name_input.set_value("");
        self.regex_input.set_value("");
        self.actions.clear_selected();
        self.sync_data();
    }

    fn sync_data(&mut self) {
        let data = &mut self.panes.data;
        data.set_value(NAME, self.rule.name.clone());
        data.set_value(REGEX, self.rule.regex.clone());
        data.set_value(ACTIONS, self.rule.actions.join(", "));
        data.set_value(IGNORE_CASE, self.rule.ignore_case.to_string());
        data.set_value(ENABLED, self.rule.enabled.to_string());
    }

    /// Highlight the OCR text with `pattern`. On a compile error the viewer
    /// keeps what it showed before.
    fn update_regex(&mut self, pattern: &str) -> Result<(), HighlightError> {
        if pattern.is_empty() {
            self.ocr_viewer.set_content(self.ocr_text.clone());
            self.clear_regex_error();
            return Ok(());
        }
        match highlight(pattern, self.rule.ignore_case, &self.ocr_text) {
            Ok(marked) => {
                self.ocr_viewer.set_content(marked);
                self.clear_regex_error();
                Ok(())
            }
            Err(e) => {
                debug!(pattern, error = %e, "pattern does not compile");
                self.panes.error(format!("{REGEX_ERROR}: {e}"));
                Err(e)
            }
        }
    }

    fn clear_regex_error(&mut self) {
        if let Some(status) = &self.panes.status
            && status.is_error
            && status.text.starts_with(REGEX_ERROR)
        {
            self.panes.status = None;
        }
    }

    /// Commit or revert the field editor. Returns false when the editor
    /// must stay open.
    fn exit_field(&mut self, field: &'static str, save: bool) -> bool {
        match (field, save) {
            (NAME, true) => self.rule.name = self.name_input.value(),
            (NAME, false) => self.name_input.set_value(&self.rule.name),
            (REGEX, true) => {
                let draft = self.regex_input.value();
                if self.update_regex(&draft).is_err() {
                    return false;
                }
                self.rule.regex = draft;
            }
            (REGEX, false) => {
                self.regex_input.set_value(&self.rule.regex);
                let committed = self.rule.regex.clone();
                let _ = self.update_regex(&committed);
            }
            (ACTIONS, true) => self.rule.actions = self.actions.value(),
            (ACTIONS, false) => self.actions.set_selected(&self.rule.actions),
            _ => {}
        }
        self.sync_data();
        true
    }

    fn change_order(&mut self, up: bool) {
        let current = self.table.cursor();
        let Some(name) = self.table.current().map(|r| r.name.clone()) else {
            return;
        };
        let to = self.reorder.nudge(&name, current, up, self.table.items().len());
        self.table.move_item(current, to);
        self.table.manual_changes = self.reorder.is_dirty();
    }

    /// Push pending moves to the server (`save`) or drop them. Either way the
    /// table is refetched and becomes authoritative again.
    fn apply_table_change(&mut self, save: bool, api: &dyn ResourceApi) {
        if save {
            let order: Vec<String> = self.table.items().iter().map(|r| r.name.clone()).collect();
            let mut failure = None;
            for directive in self.reorder.directives(&order) {
                debug!(rule = %directive.name, placement = ?directive.placement, "placing rule");
                if let Err(e) = api.set_rule_placement(&directive) {
                    warn!(rule = %directive.name, error = %e, "rule placement failed");
                    failure.get_or_insert_with(|| format!("{e:#}"));
                }
            }
            match failure {
                Some(e) => self.panes.error(e),
                None => self.panes.info(ORDER_SAVED),
            }
        }
        self.reorder.clear();
        self.table.manual_changes = false;
        self.refresh(api);
    }
}

impl SubModel for RuleModel {
    fn resource(&self) -> Resource {
        Resource::Rule
    }

    fn panes(&self) -> &Panes {
        &self.panes
    }

    fn panes_mut(&mut self) -> &mut Panes {
        &mut self.panes
    }

    fn document(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.rule)?)
    }

    fn apply(&mut self, intent: Intent, api: &dyn ResourceApi) -> Vec<Intent> {
        match intent {
            Intent::ExitDynamicView { save } => match self.panes.dynamic {
                Some(DynamicView::Field(field)) => {
                    if self.exit_field(field, save) {
                        self.panes.close();
                    }
                }
                _ => return apply_shared(self, intent, api),
            },
            Intent::UpdateToggleValue { name, value } => match name {
                IGNORE_CASE => {
                    self.rule.ignore_case = value;
                    let committed = self.rule.regex.clone();
                    let _ = self.update_regex(&committed);
                }
                ENABLED => self.rule.enabled = value,
                _ => {}
            },
            Intent::ApplyMainAction(MainAction::SaveToServer) => {
                let result = save_document(self, api);
                self.panes.report(&result, SAVED_TO_SERVER);
                if result.is_ok() {
                    self.refresh(api);
                }
            }
            Intent::ApplyMainAction(MainAction::ClearFields) => {
                self.reset();
                self.editing = false;
                self.panes.dynamic = None;
                self.panes.view = View::Viewer;
            }
            Intent::ApplyMainAction(MainAction::Back) if self.editing => self.stop_editing(),
            Intent::EditItem => {
                if let Some(rule) = self.table.current().cloned() {
                    self.load(rule, api);
                }
            }
            Intent::RefreshData => self.refresh(api),
            Intent::ChangeOrder { up } => self.change_order(up),
            Intent::ApplyTableChange { save } => self.apply_table_change(save, api),
            other => return apply_shared(self, other, api),
        }
        Vec::new()
    }

    fn field_key(&mut self, field: &'static str, key: KeyEvent) -> Vec<Intent> {
        let intent = match field {
            NAME => self.name_input.handle_key(key),
            REGEX => {
                let intent = self.regex_input.handle_key(key);
                if intent.is_none() {
                    let draft = self.regex_input.value();
                    let _ = self.update_regex(&draft);
                }
                intent
            }
            ACTIONS => self.actions.handle_key(key),
            _ => None,
        };
        intent.into_iter().collect()
    }

    fn viewer_key(&mut self, key: KeyEvent) -> Vec<Intent> {
        if self.editing {
            self.ocr_viewer.handle_key(key);
            Vec::new()
        } else {
            self.table.handle_key(key).into_iter().collect()
        }
    }

    fn field_content(&self, field: &'static str) -> DynamicContent<'_> {
        match field {
            NAME => DynamicContent::Editor(&self.name_input),
            REGEX => DynamicContent::Editor(&self.regex_input),
            ACTIONS => DynamicContent::Selection(&self.actions),
            _ => DynamicContent::Empty,
        }
    }

    fn viewer_content(&self) -> ViewerContent<'_> {
        if self.editing {
            ViewerContent::Text {
                title: "OCR Text",
                viewer: &self.ocr_viewer,
            }
        } else {
            ViewerContent::Table(self.table.view())
        }
    }

    fn resize(&mut self, viewer_rows: usize, dynamic_rows: usize) {
        self.table.set_page_size(viewer_rows.saturating_sub(1));
        self.ocr_viewer.set_height(viewer_rows);
        self.panes.yaml_preview.set_height(dynamic_rows);
    }

    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        match self.panes.view {
            View::Viewer if !self.editing && self.table.manual_changes => {
                vec![("+/-", "move"), ("enter", "apply order"), ("esc", "cancel")]
            }
            View::Viewer if !self.editing => vec![("+/-", "move"), ("ctrl+r", "refresh")],
            View::Dynamic if self.panes.dynamic == Some(DynamicView::Field(ACTIONS)) => {
                vec![("space", "select"), ("+/-", "order"), ("/", "filter")]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crossterm::event::KeyCode;

    use super::*;
    use crate::model::{Action, State};
    use crate::tui::highlight::{MATCH_END, MATCH_START};
    use crate::tui::testing::{FakeApi, ctrl, key, type_str};

    fn press(model: &mut RuleModel, api: &FakeApi, k: KeyEvent) {
        let mut queue: VecDeque<Intent> = model.handle_key(k).into();
        while let Some(intent) = queue.pop_front() {
            queue.extend(model.apply(intent, api));
        }
    }

    fn type_into(model: &mut RuleModel, api: &FakeApi, text: &str) {
        type_str(|k| press(model, api, k), text);
    }

    fn state_api() -> FakeApi {
        FakeApi {
            states: vec![State {
                state_id: 42,
                ocr_text: "ERROR: disk full".into(),
                device_uid: "web-01".into(),
                ..State::default()
            }],
            actions: vec![
                Action {
                    name: "reboot".into(),
                    ..Action::default()
                },
                Action {
                    name: "notify".into(),
                    ..Action::default()
                },
            ]
            .into(),
            ..FakeApi::with_rules(&["A", "B", "C"])
        }
    }

    fn marked(s: &str) -> String {
        format!("{MATCH_START}{s}{MATCH_END}")
    }

    #[test]
    fn create_from_state_highlights_and_saves() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        model.create_from_state(42, &api);
        assert!(model.is_editing());
        assert_eq!(model.panes().dynamic, Some(DynamicView::Field(REGEX)));
        assert_eq!(model.ocr_viewer().content(), "ERROR: disk full");

        type_into(&mut model, &api, "ERROR.*");
        assert_eq!(model.ocr_viewer().content(), marked("ERROR: disk full"));
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.rule().regex, "ERROR.*");
        assert_eq!(model.panes().view, View::Data);

        model.apply(Intent::SetDynamicView(DynamicView::Field(NAME)), &api);
        type_into(&mut model, &api, "disk-full");
        press(&mut model, &api, key(KeyCode::Enter));

        model.apply(Intent::SetDynamicView(DynamicView::Field(ACTIONS)), &api);
        press(&mut model, &api, key(KeyCode::Char(' ')));
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.rule().actions, vec!["reboot".to_string()]);

        model.apply(Intent::ApplyMainAction(MainAction::SaveToServer), &api);
        assert_eq!(api.calls(), vec!["save rule disk-full"]);
        assert_eq!(
            api.saved.borrow()["rule/disk-full"],
            serde_json::json!({
                "name": "disk-full",
                "state_id": 42,
                "regex": "ERROR.*",
                "actions": ["reboot"],
                "ignore_case": true,
                "enabled": true,
            })
        );
        assert_eq!(
            model.panes().status.as_ref().map(|s| s.text.as_str()),
            Some(SAVED_TO_SERVER)
        );
    }

    #[test]
    fn invalid_pattern_keeps_last_rendering() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        model.create_from_state(42, &api);
        type_into(&mut model, &api, "ERROR");
        let before = model.ocr_viewer().content().to_string();
        assert_eq!(before, format!("{}: disk full", marked("ERROR")));

        type_into(&mut model, &api, "(");
        assert_eq!(model.ocr_viewer().content(), before);
        let status = model.panes().status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.text.starts_with("Regex error:"), "{}", status.text);

        // Enter does not commit a pattern that does not compile.
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.panes().view, View::Dynamic);
        assert_eq!(model.rule().regex, "");

        // Fixing the pattern clears the error.
        type_into(&mut model, &api, ")");
        assert!(model.panes().status.is_none());
    }

    #[test]
    fn cancel_rehighlights_committed_regex() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        model.create_from_state(42, &api);
        type_into(&mut model, &api, "disk");
        press(&mut model, &api, key(KeyCode::Enter));

        model.apply(Intent::SetDynamicView(DynamicView::Field(REGEX)), &api);
        type_into(&mut model, &api, " full");
        assert_eq!(model.ocr_viewer().content(), format!("ERROR: {}", marked("disk full")));
        press(&mut model, &api, key(KeyCode::Esc));
        assert_eq!(model.rule().regex, "disk");
        assert_eq!(model.ocr_viewer().content(), format!("ERROR: {} full", marked("disk")));
    }

    #[test]
    fn ignore_case_toggle_rehighlights() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        model.create_from_state(42, &api);
        type_into(&mut model, &api, "error");
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.ocr_viewer().content(), format!("{}: disk full", marked("ERROR")));

        model.panes_mut().data.focus_on(IGNORE_CASE);
        press(&mut model, &api, key(KeyCode::Char(' ')));
        assert!(!model.rule().ignore_case);
        assert_eq!(model.ocr_viewer().content(), "ERROR: disk full");
    }

    #[test]
    fn edit_item_loads_rule_and_its_ocr_text() {
        let api = state_api();
        api.rules.borrow_mut()[1].state_id = 42;
        api.rules.borrow_mut()[1].regex = "disk".into();
        let mut model = RuleModel::new(&api);
        press(&mut model, &api, key(KeyCode::Down));
        press(&mut model, &api, key(KeyCode::Enter));
        assert!(model.is_editing());
        assert_eq!(model.rule().name, "B");
        assert_eq!(model.panes().data.value(REGEX), "disk");
        assert_eq!(model.ocr_viewer().content(), format!("ERROR: {} full", marked("disk")));
        assert!(matches!(model.viewer_content(), ViewerContent::Text { .. }));
    }

    #[test]
    fn back_leaves_edit_mode_before_navigation() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        model.create_from_state(42, &api);
        let follow = model.apply(Intent::ApplyMainAction(MainAction::Back), &api);
        assert!(follow.is_empty());
        assert!(!model.is_editing());
        assert_eq!(model.panes().view, View::Viewer);

        let follow = model.apply(Intent::ApplyMainAction(MainAction::Back), &api);
        assert_eq!(follow, vec![Intent::BackToNavigation]);
    }

    #[test]
    fn reorder_commit_places_moved_rule() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        press(&mut model, &api, key(KeyCode::Down));
        press(&mut model, &api, key(KeyCode::Char('+')));
        assert!(model.table().manual_changes);
        let names: Vec<&str> = model.table().items().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);

        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(api.calls(), vec![r#"place {"name":"B","before_rule":"A"}"#]);
        assert!(!model.table().manual_changes);
        assert_eq!(
            model.panes().status.as_ref().map(|s| s.text.as_str()),
            Some(ORDER_SAVED)
        );
        // The fake server never moved anything, so the refetch restores it.
        assert_eq!(model.table().items()[0].name, "A");
    }

    #[test]
    fn reorder_up_then_down_is_clean() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        press(&mut model, &api, key(KeyCode::Down));
        press(&mut model, &api, key(KeyCode::Char('+')));
        press(&mut model, &api, key(KeyCode::Char('-')));
        assert!(!model.table().manual_changes);
        assert_eq!(model.handle_key(key(KeyCode::Enter)), vec![Intent::EditItem]);
    }

    #[test]
    fn failed_placement_still_clears_and_refetches() {
        let mut api = state_api();
        api.fail_on = vec!["place".into()];
        let mut model = RuleModel::new(&api);
        press(&mut model, &api, key(KeyCode::Char('-')));
        press(&mut model, &api, key(KeyCode::Char('-')));
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(api.calls().len(), 1);
        assert!(api.calls()[0].contains(r#""after_rule":"C""#));
        assert!(model.panes().status.as_ref().is_some_and(|s| s.is_error));
        assert!(!model.table().manual_changes);
    }

    #[test]
    fn refresh_drops_unsaved_order() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        press(&mut model, &api, key(KeyCode::Down));
        press(&mut model, &api, key(KeyCode::Char('+')));
        assert!(model.table().manual_changes);

        press(&mut model, &api, ctrl('r'));
        let names: Vec<&str> = model.table().items().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(!model.table().manual_changes);

        // Enter is row activation again, not a stale placement.
        press(&mut model, &api, key(KeyCode::Enter));
        assert!(api.calls().is_empty());
        assert!(model.is_editing());
    }

    #[test]
    fn clear_fields_resets_and_returns_to_table() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        model.create_from_state(42, &api);
        type_into(&mut model, &api, "ERROR");
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.rule().regex, "ERROR");

        model.apply(Intent::ApplyMainAction(MainAction::ClearFields), &api);
        assert!(!model.is_editing());
        assert_eq!(model.rule(), &Rule::default());
        assert_eq!(model.panes().data.value(REGEX), "");
        assert_eq!(model.panes().view, View::Viewer);
        assert_eq!(model.panes().dynamic, None);
        assert!(matches!(model.viewer_content(), ViewerContent::Table(_)));
    }

    #[test]
    fn failed_save_keeps_the_edit() {
        let mut api = state_api();
        api.fail_on = vec!["save".into()];
        let mut model = RuleModel::new(&api);
        model.create_from_state(42, &api);
        type_into(&mut model, &api, "ERROR.*");
        press(&mut model, &api, key(KeyCode::Enter));
        model.apply(Intent::SetDynamicView(DynamicView::Field(NAME)), &api);
        type_into(&mut model, &api, "disk-full");
        press(&mut model, &api, key(KeyCode::Enter));

        model.apply(Intent::ApplyMainAction(MainAction::SaveToServer), &api);
        assert_eq!(api.calls(), vec!["save rule disk-full"]);
        let status = model.panes().status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains("boom"), "{}", status.text);
        assert!(model.is_editing());
        assert_eq!(model.rule().name, "disk-full");
        assert_eq!(model.rule().regex, "ERROR.*");
        assert_eq!(model.ocr_viewer().content(), marked("ERROR: disk full"));
    }

    #[test]
    fn multi_line_regex_marks_each_line() {
        let mut api = state_api();
        api.states[0].ocr_text = "foo\nbar".into();
        let mut model = RuleModel::new(&api);
        model.create_from_state(42, &api);
        type_into(&mut model, &api, r"foo\nbar");
        assert_eq!(
            model.ocr_viewer().content(),
            format!("{}\n{}", marked("foo"), marked("bar"))
        );
        press(&mut model, &api, key(KeyCode::Enter));
        assert_eq!(model.rule().regex, r"foo\nbar");
    }

    #[test]
    fn escape_discards_pending_order() {
        let api = state_api();
        let mut model = RuleModel::new(&api);
        press(&mut model, &api, key(KeyCode::Char('-')));
        press(&mut model, &api, key(KeyCode::Esc));
        assert!(api.calls().is_empty());
        assert_eq!(model.table().items()[0].name, "A");
        assert!(!model.table().manual_changes);
    }
}
