//! Test helpers: synthetic key events and an in-memory service.

use std::cell::RefCell;
use std::collections::BTreeMap;

use anyhow::{Result, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use serde_json::Value;

use crate::api::{HttpError, Resource, ResourceApi};
use crate::model::{Action, Cred, Device, Rule, RulePlacement, State};

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent {
        modifiers: KeyModifiers::CONTROL,
        ..key(KeyCode::Char(c))
    }
}

pub fn shift_tab() -> KeyEvent {
    KeyEvent {
        modifiers: KeyModifiers::SHIFT,
        ..key(KeyCode::BackTab)
    }
}

/// Feed each char of `text` as a key press.
pub fn type_str<R>(mut handle: impl FnMut(KeyEvent) -> R, text: &str) {
    for c in text.chars() {
        handle(key(KeyCode::Char(c)));
    }
}

/// Service double backed by plain vectors. Every mutating call is recorded
/// in `calls` as a short string, and any call whose record starts with an
/// entry of `fail_on` fails with a 500.
#[derive(Default)]
pub struct FakeApi {
    pub rules: RefCell<Vec<Rule>>,
    pub states: Vec<State>,
    pub actions: RefCell<Vec<Action>>,
    pub action_types: Vec<String>,
    pub power_options: Vec<String>,
    pub special_keys: Vec<String>,
    pub devices: RefCell<Vec<Device>>,
    pub creds: RefCell<Vec<Cred>>,
    pub calls: RefCell<Vec<String>>,
    pub saved: RefCell<BTreeMap<String, Value>>,
    pub fail_on: Vec<String>,
}

impl FakeApi {
    pub fn with_rules(names: &[&str]) -> Self {
        let rules = names
            .iter()
            .enumerate()
            .map(|(i, name)| Rule {
                name: name.to_string(),
                regex: format!("{name}.*"),
                position: i as i64 + 1,
                ..Rule::default()
            })
            .collect();
        Self {
            rules: RefCell::new(rules),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        let failing = self.fail_on.iter().any(|f| call.starts_with(f.as_str()));
        self.calls.borrow_mut().push(call);
        if failing {
            bail!(HttpError::from_body(500, r#"{"message":"boom"}"#));
        }
        Ok(())
    }

    fn missing(what: &str) -> anyhow::Error {
        anyhow::Error::new(HttpError::from_body(
            404,
            &format!(r#"{{"message":"{what} not found"}}"#),
        ))
    }
}

impl ResourceApi for FakeApi {
    fn fetch_rules(&self) -> Result<Vec<Rule>> {
        Ok(self.rules.borrow().clone())
    }

    fn fetch_rule(&self, name: &str) -> Result<Rule> {
        self.rules
            .borrow()
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| Self::missing(name))
    }

    fn fetch_state(&self, state_id: i64) -> Result<State> {
        self.states
            .iter()
            .find(|s| s.state_id == state_id)
            .cloned()
            .ok_or_else(|| Self::missing(&format!("state {state_id}")))
    }

    fn fetch_states(&self) -> Result<Vec<State>> {
        Ok(self.states.clone())
    }

    fn fetch_actions(&self) -> Result<Vec<Action>> {
        Ok(self.actions.borrow().clone())
    }

    fn fetch_action(&self, name: &str) -> Result<Action> {
        self.actions
            .borrow()
            .iter()
            .find(|a| a.name == name)
            .cloned()
            .ok_or_else(|| Self::missing(name))
    }

    fn fetch_action_types(&self) -> Result<Vec<String>> {
        Ok(self.action_types.clone())
    }

    fn fetch_power_options(&self) -> Result<Vec<String>> {
        Ok(self.power_options.clone())
    }

    fn fetch_special_keys(&self) -> Result<Vec<String>> {
        Ok(self.special_keys.clone())
    }

    fn fetch_devices(&self) -> Result<Vec<Device>> {
        Ok(self.devices.borrow().clone())
    }

    fn fetch_device(&self, uid: &str) -> Result<Device> {
        self.devices
            .borrow()
            .iter()
            .find(|d| d.uid == uid)
            .cloned()
            .ok_or_else(|| Self::missing(uid))
    }

    fn fetch_creds(&self) -> Result<Vec<Cred>> {
        Ok(self.creds.borrow().clone())
    }

    fn fetch_cred(&self, name: &str) -> Result<Cred> {
        self.creds
            .borrow()
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| Self::missing(name))
    }

    fn save(&self, resource: Resource, key: &str, body: &Value) -> Result<()> {
        self.record(format!("save {} {key}", resource.path()))?;
        self.saved
            .borrow_mut()
            .insert(format!("{}/{key}", resource.path()), body.clone());
        Ok(())
    }

    fn delete(&self, resource: Resource, key: &str) -> Result<()> {
        self.record(format!("delete {} {key}", resource.path()))
    }

    fn set_rule_placement(&self, placement: &RulePlacement) -> Result<()> {
        let body = serde_json::to_string(placement)?;
        self.record(format!("place {body}"))
    }

    fn update_state_resolved(&self, state_id: i64, resolved: bool) -> Result<()> {
        self.record(format!("resolve {state_id} {resolved}"))
    }

    fn set_default_cred(&self, name: &str) -> Result<()> {
        self.record(format!("default {name}"))
    }
}
