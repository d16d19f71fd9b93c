//! App state, main event loop, intent delivery.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::api::{Resource, ResourceApi};

use super::input::{self, InputResult};
use super::intent::{Intent, View};
use super::models::{ActionModel, CredModel, DeviceModel, RuleModel, StateModel, SubModel};
use super::render;

pub const TITLE: &str = "vaxctl interactive mode";
pub const MENU_TITLE: &str = "Select Resource";

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Intents delivered for one key before the queue is considered runaway.
const MAX_INTENT_STEPS: usize = 256;

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Creds,
    Devices,
    Actions,
    Rules,
    States,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 6] = [
        MenuItem::Creds,
        MenuItem::Devices,
        MenuItem::Actions,
        MenuItem::Rules,
        MenuItem::States,
        MenuItem::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Creds => "Creds",
            MenuItem::Devices => "Devices",
            MenuItem::Actions => "Actions",
            MenuItem::Rules => "Rules",
            MenuItem::States => "States",
            MenuItem::Quit => "Quit",
        }
    }

    /// `None` for Quit.
    pub fn resource(self) -> Option<Resource> {
        match self {
            MenuItem::Creds => Some(Resource::Cred),
            MenuItem::Devices => Some(Resource::Device),
            MenuItem::Actions => Some(Resource::Action),
            MenuItem::Rules => Some(Resource::Rule),
            MenuItem::States => Some(Resource::State),
            MenuItem::Quit => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Navigation,
    Resource(Resource),
}

/// Where the UI opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartAt {
    Navigation,
    /// Blank field list of a resource.
    Create(Resource),
    /// An existing resource, by name (uid for devices, id for states).
    Edit(Resource, String),
    /// The rule editor over a state's OCR text.
    CreateRuleFromState(i64),
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

pub struct Models {
    pub rule: RuleModel,
    pub state: StateModel,
    pub action: ActionModel,
    pub device: DeviceModel,
    pub cred: CredModel,
}

impl Models {
    fn new(api: &dyn ResourceApi) -> Self {
        Self {
            rule: RuleModel::new(api),
            state: StateModel::new(api),
            action: ActionModel::new(api),
            device: DeviceModel::new(api),
            cred: CredModel::new(api),
        }
    }

    pub fn get(&self, resource: Resource) -> Option<&dyn SubModel> {
        match resource {
            Resource::Rule => Some(&self.rule),
            Resource::State => Some(&self.state),
            Resource::Action => Some(&self.action),
            Resource::Device => Some(&self.device),
            Resource::Cred => Some(&self.cred),
            Resource::Work => None,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> Option<&mut dyn SubModel> {
        match resource {
            Resource::Rule => Some(&mut self.rule),
            Resource::State => Some(&mut self.state),
            Resource::Action => Some(&mut self.action),
            Resource::Device => Some(&mut self.device),
            Resource::Cred => Some(&mut self.cred),
            Resource::Work => None,
        }
    }

    fn each_mut(&mut self) -> [&mut dyn SubModel; 5] {
        [
            &mut self.rule,
            &mut self.state,
            &mut self.action,
            &mut self.device,
            &mut self.cred,
        ]
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<A: ResourceApi> {
    pub screen: Screen,
    /// Index into [`MenuItem::ALL`].
    pub menu_cursor: usize,
    pub models: Models,
    api: A,
    intents: VecDeque<Intent>,
}

impl<A: ResourceApi> App<A> {
    pub fn new(api: A, start: StartAt) -> Self {
        let models = Models::new(&api);
        let mut app = Self {
            screen: Screen::Navigation,
            menu_cursor: 0,
            models,
            api,
            intents: VecDeque::new(),
        };
        app.start(start);
        app
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    fn start(&mut self, start: StartAt) {
        let api = &self.api;
        match start {
            StartAt::Navigation => {}
            StartAt::Create(resource) => {
                self.open_resource(resource);
                if let Some(model) = self.models.get_mut(resource) {
                    model.panes_mut().view = View::Data;
                }
            }
            StartAt::Edit(resource, key) => {
                self.screen = Screen::Resource(resource);
                match resource {
                    Resource::Rule => self.models.rule.edit_named(&key, api),
                    Resource::Action => self.models.action.edit_named(&key, api),
                    Resource::Device => self.models.device.edit_uid(&key, api),
                    Resource::Cred => self.models.cred.edit_named(&key, api),
                    Resource::State => match key.parse::<i64>() {
                        Ok(id) => self.models.state.edit_id(id, api),
                        Err(_) => self
                            .models
                            .state
                            .panes_mut()
                            .error(format!("'{key}' is not a state id")),
                    },
                    Resource::Work => self.screen = Screen::Navigation,
                }
            }
            StartAt::CreateRuleFromState(state_id) => {
                self.screen = Screen::Resource(Resource::Rule);
                self.models.rule.create_from_state(state_id, api);
            }
        }
    }

    pub fn selected_item(&self) -> MenuItem {
        MenuItem::ALL[self.menu_cursor.min(MenuItem::ALL.len() - 1)]
    }

    pub fn menu_up(&mut self) {
        self.menu_cursor = self.menu_cursor.saturating_sub(1);
    }

    pub fn menu_down(&mut self) {
        self.menu_cursor = (self.menu_cursor + 1).min(MenuItem::ALL.len() - 1);
    }

    pub fn open_resource(&mut self, resource: Resource) {
        debug!(resource = resource.path(), "opening screen");
        self.screen = Screen::Resource(resource);
    }

    pub fn current_model(&self) -> Option<&dyn SubModel> {
        match self.screen {
            Screen::Resource(resource) => self.models.get(resource),
            Screen::Navigation => None,
        }
    }

    // -- intents -------------------------------------------------------------

    /// Queue `intents` and deliver until nothing follows.
    pub fn dispatch(&mut self, intents: Vec<Intent>) {
        self.intents.extend(intents);
        let mut steps = 0;
        while let Some(intent) = self.intents.pop_front() {
            steps += 1;
            if steps > MAX_INTENT_STEPS {
                warn!(dropped = self.intents.len() + 1, "intent queue did not settle");
                self.intents.clear();
                break;
            }
            debug!(?intent, "deliver");
            let follow = self.deliver(intent);
            self.intents.extend(follow);
        }
    }

    fn deliver(&mut self, intent: Intent) -> Vec<Intent> {
        let api = &self.api;
        match intent {
            Intent::BackToNavigation => self.screen = Screen::Navigation,
            Intent::CreateRule { state_id } => {
                self.screen = Screen::Resource(Resource::Rule);
                self.models.rule.create_from_state(state_id, api);
            }
            Intent::UpdateCredNames => self.models.device.update_cred_names(api),
            Intent::UpdateActionNames => self.models.rule.update_action_names(api),
            other => {
                if let Screen::Resource(resource) = self.screen
                    && let Some(model) = self.models.get_mut(resource)
                {
                    return model.apply(other, api);
                }
            }
        }
        Vec::new()
    }

    // -- loop ----------------------------------------------------------------

    pub fn run<B>(&mut self, terminal: &mut ratatui::Terminal<B>) -> Result<()>
    where
        B: ratatui::backend::Backend,
        B::Error: Send + Sync + 'static,
    {
        loop {
            terminal.draw(|f| {
                self.resize(f.area());
                render::render(f, self);
            })?;

            if event::poll(TICK_INTERVAL)? {
                let key = match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => key,
                    Event::Mouse(MouseEvent {
                        kind: MouseEventKind::ScrollUp,
                        ..
                    }) => KeyCode::Up.into(),
                    Event::Mouse(MouseEvent {
                        kind: MouseEventKind::ScrollDown,
                        ..
                    }) => KeyCode::Down.into(),
                    _ => continue,
                };
                match input::handle_key(self, key) {
                    InputResult::Continue => {}
                    InputResult::Quit => break,
                }
            } else {
                self.tick();
            }
        }
        Ok(())
    }

    /// Tell every screen how many rows its viewer and dynamic panes have.
    pub fn resize(&mut self, area: Rect) {
        let (viewer_rows, dynamic_rows) = render::body_heights(area);
        for model in self.models.each_mut() {
            model.resize(viewer_rows, dynamic_rows);
        }
    }

    fn tick(&mut self) {
        for model in self.models.each_mut() {
            model.panes_mut().expire_status();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::State;
    use crate::tui::models::rule;
    use crate::tui::testing::FakeApi;

    fn api() -> FakeApi {
        FakeApi {
            states: vec![State {
                state_id: 42,
                ocr_text: "ERROR: disk full".into(),
                ..State::default()
            }],
            ..FakeApi::with_rules(&["A", "B"])
        }
    }

    #[test]
    fn starts_on_navigation_menu() {
        let app = App::new(api(), StartAt::Navigation);
        assert_eq!(app.screen, Screen::Navigation);
        assert_eq!(app.selected_item(), MenuItem::Creds);
        assert!(app.current_model().is_none());
    }

    #[test]
    fn create_rule_from_state_opens_regex_editor() {
        let app = App::new(api(), StartAt::CreateRuleFromState(42));
        assert_eq!(app.screen, Screen::Resource(Resource::Rule));
        assert!(app.models.rule.is_editing());
        assert_eq!(
            app.models.rule.panes().dynamic,
            Some(crate::tui::intent::DynamicView::Field(rule::REGEX))
        );
    }

    #[test]
    fn create_intent_switches_screens() {
        let mut app = App::new(api(), StartAt::Navigation);
        app.open_resource(Resource::State);
        app.dispatch(vec![Intent::CreateRule { state_id: 42 }]);
        assert_eq!(app.screen, Screen::Resource(Resource::Rule));
        assert_eq!(app.models.rule.ocr_viewer().content(), "ERROR: disk full");
    }

    #[test]
    fn edit_start_loads_named_resource() {
        let app = App::new(api(), StartAt::Edit(Resource::Rule, "B".into()));
        assert_eq!(app.models.rule.rule().name, "B");
        assert_eq!(app.models.rule.panes().view, View::Data);

        let app = App::new(api(), StartAt::Edit(Resource::State, "abc".into()));
        let status = app.models.state.panes().status.clone().unwrap();
        assert!(status.is_error);
    }

    #[test]
    fn create_start_opens_field_list() {
        let app = App::new(api(), StartAt::Create(Resource::Cred));
        assert_eq!(app.screen, Screen::Resource(Resource::Cred));
        assert_eq!(app.models.cred.panes().view, View::Data);
    }

    #[test]
    fn back_returns_to_navigation() {
        let mut app = App::new(api(), StartAt::Create(Resource::Device));
        app.dispatch(vec![Intent::ApplyMainAction(
            crate::tui::intent::MainAction::Back,
        )]);
        assert_eq!(app.screen, Screen::Navigation);
    }

    #[test]
    fn resize_reaches_every_model() {
        let mut app = App::new(api(), StartAt::Navigation);
        let area = Rect::new(0, 0, 120, 40);
        app.resize(area);
        let (viewer_rows, _) = render::body_heights(area);
        assert!(viewer_rows > 1);
        assert_eq!(app.models.rule.table().page_size(), viewer_rows - 1);
    }
}
