//! Per-resource screens.
//!
//! Every screen owns the same four panes (main actions, field list, dynamic
//! editor, viewer). The [`SubModel`] trait routes keys to the active pane and
//! applies intents; [`apply_shared`] covers the behavior all screens have in
//! common so each model only handles what is specific to its resource.

pub mod action;
pub mod cred;
pub mod device;
pub mod rule;
pub mod state;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::{Resource, ResourceApi};

use super::choice::ChoiceList;
use super::editor::FieldEditor;
use super::intent::{DynamicView, Intent, MainAction, View};
use super::keystroke::KeystrokeEditor;
use super::main_menu::MainMenu;
use super::ordered_select::OrderedSelection;
use super::resource_data::ResourceData;
use super::table::TableView;
use super::viewer::TextViewer;

pub use self::action::ActionModel;
pub use self::cred::CredModel;
pub use self::device::DeviceModel;
pub use self::rule::RuleModel;
pub use self::state::StateModel;

/// How long informational messages stay up. Errors stay until replaced.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

pub const SAVED_TO_SERVER: &str = "Saved to Server!";

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created_at: Instant,
}

// ---------------------------------------------------------------------------
// Panes
// ---------------------------------------------------------------------------

/// Pane state shared by every resource screen.
pub struct Panes {
    pub view: View,
    pub dynamic: Option<DynamicView>,
    pub main: MainMenu,
    pub data: ResourceData,
    pub yaml_preview: TextViewer,
    pub yaml_path: FieldEditor,
    pub status: Option<StatusMessage>,
}

impl Panes {
    pub fn new(main: MainMenu, data: ResourceData, view: View) -> Self {
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| ".".into());
        Self {
            view,
            dynamic: None,
            main,
            data,
            yaml_preview: TextViewer::default(),
            yaml_path: FieldEditor::new(
                format!("Enter YAML file name (absolute or relative to '{cwd}'):"),
                "",
            ),
            status: None,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
            created_at: Instant::now(),
        });
    }

    pub fn error(&mut self, err: impl std::fmt::Display) {
        let text = err.to_string();
        warn!(error = %text, "status error");
        self.status = Some(StatusMessage {
            text,
            is_error: true,
            created_at: Instant::now(),
        });
    }

    /// Report the outcome of a call: the error, or `done` on success.
    pub fn report(&mut self, result: &Result<()>, done: &str) {
        match result {
            Ok(()) => self.info(done),
            Err(e) => self.error(format!("{e:#}")),
        }
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn expire_status(&mut self) {
        if let Some(status) = &self.status
            && !status.is_error
            && status.created_at.elapsed() >= STATUS_MESSAGE_TTL
        {
            self.status = None;
        }
    }

    /// A dynamic editor is open and receiving keys. The YAML preview is
    /// read-only and does not count.
    pub fn in_dynamic_editor(&self) -> bool {
        self.view == View::Dynamic
            && matches!(
                self.dynamic,
                Some(DynamicView::Field(_) | DynamicView::YamlSave)
            )
    }

    pub fn open(&mut self, dynamic: DynamicView) {
        self.dynamic = Some(dynamic);
        self.view = View::Dynamic;
    }

    /// Leave the dynamic pane: file saves return to the main menu, field
    /// edits to the field list.
    pub fn close(&mut self) {
        self.view = if self.dynamic == Some(DynamicView::YamlSave) {
            View::Main
        } else {
            View::Data
        };
        self.dynamic = None;
    }
}

// ---------------------------------------------------------------------------
// Render hand-off
// ---------------------------------------------------------------------------

/// What the dynamic pane draws.
pub enum DynamicContent<'a> {
    Empty,
    /// A fixed notice in place of an editor.
    Message(&'static str),
    Editor(&'a FieldEditor),
    Choice(&'a ChoiceList),
    Selection(&'a OrderedSelection),
    Keystroke(&'a KeystrokeEditor),
    Text(&'a TextViewer),
}

/// What the viewer pane draws.
pub enum ViewerContent<'a> {
    Table(TableView),
    Text { title: &'a str, viewer: &'a TextViewer },
}

// ---------------------------------------------------------------------------
// Sub-model trait
// ---------------------------------------------------------------------------

pub trait SubModel {
    fn resource(&self) -> Resource;
    fn panes(&self) -> &Panes;
    fn panes_mut(&mut self) -> &mut Panes;

    /// The resource being edited, as sent to the server and dumped to YAML.
    fn document(&self) -> Result<Value>;

    /// Apply an intent addressed to this screen, returning follow-ups.
    fn apply(&mut self, intent: Intent, api: &dyn ResourceApi) -> Vec<Intent>;

    /// Keys for the editor of `field` in the dynamic pane.
    fn field_key(&mut self, field: &'static str, key: KeyEvent) -> Vec<Intent>;

    /// Keys for the viewer pane.
    fn viewer_key(&mut self, key: KeyEvent) -> Vec<Intent>;

    fn field_content(&self, field: &'static str) -> DynamicContent<'_>;
    fn viewer_content(&self) -> ViewerContent<'_>;

    /// Viewer pane body height, in rows.
    fn resize(&mut self, viewer_rows: usize, dynamic_rows: usize);

    /// Extra key hints for this screen.
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Intent> {
        route_key(self, key)
    }

    fn dynamic_content(&self) -> DynamicContent<'_> {
        let panes = self.panes();
        match panes.dynamic {
            None => DynamicContent::Empty,
            Some(DynamicView::YamlSave) => DynamicContent::Editor(&panes.yaml_path),
            Some(DynamicView::YamlPreview) => DynamicContent::Text(&panes.yaml_preview),
            Some(DynamicView::Field(field)) => self.field_content(field),
        }
    }
}

/// Send `key` to whichever pane is active.
pub fn route_key<M: SubModel + ?Sized>(model: &mut M, key: KeyEvent) -> Vec<Intent> {
    let (view, dynamic) = {
        let panes = model.panes();
        (panes.view, panes.dynamic)
    };
    match (view, dynamic) {
        (View::Main, _) => model.panes_mut().main.handle_key(key).into_iter().collect(),
        (View::Data, _) => model.panes_mut().data.handle_key(key).into_iter().collect(),
        (View::Viewer, _) => model.viewer_key(key),
        (View::Dynamic, None) => Vec::new(),
        (View::Dynamic, Some(DynamicView::YamlSave)) => {
            model.panes_mut().yaml_path.handle_key(key).into_iter().collect()
        }
        (View::Dynamic, Some(DynamicView::YamlPreview)) => {
            model.panes_mut().yaml_preview.handle_key(key);
            Vec::new()
        }
        (View::Dynamic, Some(DynamicView::Field(field))) => model.field_key(field, key),
    }
}

/// Behavior every screen shares. Models call this for intents they do not
/// handle themselves.
pub fn apply_shared<M: SubModel + ?Sized>(
    model: &mut M,
    intent: Intent,
    api: &dyn ResourceApi,
) -> Vec<Intent> {
    match intent {
        Intent::SetDynamicView(view) => model.panes_mut().open(view),
        Intent::ExitDynamicView { save } => {
            if save && model.panes().dynamic == Some(DynamicView::YamlSave) {
                let path = model.panes().yaml_path.value();
                let result = model.document().and_then(|doc| write_yaml(&path, &doc));
                let panes = model.panes_mut();
                match result {
                    Ok(written) => panes.info(format!("Saved to '{}'!", written.display())),
                    Err(e) => panes.error(format!("{e:#}")),
                }
            }
            model.panes_mut().close();
        }
        Intent::ApplyMainAction(MainAction::ShowYaml) => {
            let yaml = model
                .document()
                .and_then(|doc| serde_yaml::to_string(&doc).context("failed to render YAML"));
            let panes = model.panes_mut();
            match yaml {
                Ok(yaml) => {
                    panes.yaml_preview.set_content(yaml);
                    panes.dynamic = Some(DynamicView::YamlPreview);
                }
                Err(e) => panes.error(format!("{e:#}")),
            }
        }
        Intent::ApplyMainAction(MainAction::SaveToFile) => {
            return vec![Intent::SetDynamicView(DynamicView::YamlSave)];
        }
        Intent::ApplyMainAction(MainAction::SaveToServer) => {
            let result = save_document(model, api);
            model.panes_mut().report(&result, SAVED_TO_SERVER);
            if result.is_ok() {
                return vec![Intent::RefreshData];
            }
        }
        Intent::ApplyMainAction(MainAction::Back) => {
            let panes = model.panes_mut();
            panes.view = View::Viewer;
            panes.clear_status();
            return vec![Intent::BackToNavigation];
        }
        _ => {}
    }
    Vec::new()
}

/// Create-or-update the edited resource on the server.
pub fn save_document<M: SubModel + ?Sized>(model: &M, api: &dyn ResourceApi) -> Result<()> {
    let resource = model.resource();
    let doc = model.document()?;
    let key = crate::api::resource_key(resource, &doc)?;
    info!(resource = resource.path(), %key, "saving from interactive mode");
    api.save(resource, &key, &doc)
}

// ---------------------------------------------------------------------------
// YAML export
// ---------------------------------------------------------------------------

/// Expand a leading `~/`, `$VAR/` or `${VAR}/` in a user-typed path.
pub fn expand_path(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if let Some(var_path) = input.strip_prefix('$')
        && let Some((var, rest)) = var_path.split_once('/')
    {
        let name = var.trim_start_matches('{').trim_end_matches('}');
        let base = std::env::var(name).unwrap_or_default();
        return PathBuf::from(format!("{base}/{rest}"));
    }
    PathBuf::from(input)
}

fn write_yaml(input: &str, doc: &Value) -> Result<PathBuf> {
    if input.trim().is_empty() {
        anyhow::bail!("no file name given");
    }
    let path = expand_path(input.trim());
    let yaml = serde_yaml::to_string(doc).context("failed to render YAML")?;
    std::fs::write(&path, yaml)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote resource YAML");
    Ok(path)
}
