//! Blocking client for the automation service's `/api/v1` REST endpoints.
//!
//! Every call is a single synchronous request. Any status other than 200 is
//! turned into an [`HttpError`] built from the server's
//! `{"errors": {..}, "message": ".."}` body; transport failures surface as
//! `ureq::Error` inside the anyhow chain.
//!
//! The terminal UI talks to the service through the [`ResourceApi`] trait so
//! its state machines can be driven against an in-memory fake.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{Level, debug, instrument, warn};

use crate::model::action::{
    ActionTypesResponse, ActionsResponse, PowerOptionsResponse, SpecialKeysResponse,
};
use crate::model::cred::CredsResponse;
use crate::model::device::DevicesResponse;
use crate::model::execution::ExecutionsResponse;
use crate::model::rule::RulesResponse;
use crate::model::state::{StateType, StatesResponse, UpdateResolved};
use crate::model::work::WorksResponse;
use crate::model::{
    Action, Cred, Device, Execution, Rule, RulePlacement, State, Work, WorkAssignment,
    WorkCompleted,
};
use crate::settings::VaxctlSettings;
use crate::version;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Resource kinds with CRUD endpoints under `<path>/`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Rule,
    Action,
    Device,
    Cred,
    State,
    Work,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Rule => "rule",
            Resource::Action => "action",
            Resource::Device => "device",
            Resource::Cred => "creds",
            Resource::State => "state",
            Resource::Work => "work",
        }
    }

    /// Field identifying a resource, used both as query parameter and as the
    /// key read from resource files. Devices are addressed by uid.
    pub fn key_field(self) -> &'static str {
        match self {
            Resource::Device => "uid",
            _ => "name",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Resource::Cred => "cred",
            other => other.path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A non-200 response from the service.
#[derive(Debug, Error)]
#[error("Request returned {status} status.{}", detail_lines(.message, .errors))]
pub struct HttpError {
    pub status: u16,
    pub message: String,
    /// Field name to validation message.
    pub errors: BTreeMap<String, String>,
}

fn detail_lines(message: &str, errors: &BTreeMap<String, String>) -> String {
    if !errors.is_empty() {
        errors
            .iter()
            .map(|(field, msg)| format!("\nError: {msg} - {field}"))
            .collect()
    } else if !message.is_empty() {
        format!("\nError: {message}")
    } else {
        String::new()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Option<BTreeMap<String, String>>,
    #[serde(default)]
    message: Option<String>,
}

impl HttpError {
    /// Build from a response body. Bodies that are not the expected JSON
    /// shape leave message and errors empty.
    pub fn from_body(status: u16, body: &str) -> Self {
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
        Self {
            status,
            message: parsed.message.unwrap_or_default(),
            errors: parsed.errors.unwrap_or_default(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn hint(&self) -> Option<String> {
        match self.status {
            404 => Some("the resource does not exist on the server; check the name or id".into()),
            400 | 422 if !self.errors.is_empty() => {
                Some("fix the fields listed above and try again".into())
            }
            500..=599 => Some("the server failed to handle the request; check its logs".into()),
            _ => None,
        }
    }
}

/// True when `err` carries a 404 [`HttpError`] anywhere in its chain.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<HttpError>())
        .any(HttpError::is_not_found)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &VaxctlSettings) -> Self {
        Self::new(settings.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request against `<base>/api/v1/<path>`.
    #[instrument(level = Level::TRACE, skip(self, body))]
    pub fn run_query(
        &self,
        method: &str,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let url = format!("{}/api/v1/{}", self.base_url, path);
        debug!(method, url = %url, "api request");

        let mut request = ureq::request(method, &url)
            .set("Content-Type", "application/json")
            .set("User-Agent", version::user_agent());
        for (key, value) in query {
            request = request.query(key, value);
        }

        let result = match body {
            Some(bytes) => request.send_bytes(bytes),
            None => request.call(),
        };

        match result {
            Ok(resp) if resp.status() == 200 => read_body(resp),
            Ok(resp) => {
                let status = resp.status();
                let body = read_body(resp).unwrap_or_default();
                Err(http_error(method, path, status, &body))
            }
            Err(ureq::Error::Status(status, resp)) => {
                let body = read_body(resp).unwrap_or_default();
                Err(http_error(method, path, status, &body))
            }
            Err(e) => Err(e).with_context(|| format!("{method} {url} failed")),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let bytes = self.run_query("GET", path, query, None)?;
        decode(path, &bytes)
    }

    fn send(&self, method: &str, path: &str, query: &[(&str, &str)], body: &Value) -> Result<()> {
        let bytes = serde_json::to_vec(body)?;
        self.run_query(method, path, query, Some(&bytes))?;
        Ok(())
    }

    // -- generic CRUD ------------------------------------------------------

    pub fn get_all<T: DeserializeOwned>(&self, resource: Resource) -> Result<T> {
        self.get(&format!("{}/all", resource.path()), &[])
    }

    pub fn get_by_key<T: DeserializeOwned>(&self, resource: Resource, key: &str) -> Result<T> {
        self.get(
            &format!("{}/", resource.path()),
            &[(resource.key_field(), key)],
        )
    }

    pub fn get_by_id<T: DeserializeOwned>(&self, resource: Resource, id: &str) -> Result<T> {
        self.get(&format!("{}/", resource.path()), &[("id", id)])
    }

    pub fn create(&self, resource: Resource, body: &Value) -> Result<()> {
        self.send("POST", &format!("{}/", resource.path()), &[], body)
    }

    pub fn update(&self, resource: Resource, body: &Value) -> Result<()> {
        self.send("PUT", &format!("{}/", resource.path()), &[], body)
    }

    pub fn delete_by_key(&self, resource: Resource, key: &str) -> Result<()> {
        self.run_query(
            "DELETE",
            &format!("{}/", resource.path()),
            &[(resource.key_field(), key)],
            None,
        )?;
        Ok(())
    }

    /// PUT when the resource already exists, POST when the lookup 404s.
    /// Any other lookup failure is returned as is.
    pub fn update_or_create(&self, resource: Resource, key: &str, body: &Value) -> Result<()> {
        match self.run_query(
            "GET",
            &format!("{}/", resource.path()),
            &[(resource.key_field(), key)],
            None,
        ) {
            Ok(_) => {
                debug!(resource = resource.path(), key, "exists, updating");
                self.update(resource, body)
            }
            Err(e) if is_not_found(&e) => {
                debug!(resource = resource.path(), key, "not found, creating");
                self.create(resource, body)
            }
            Err(e) => Err(e),
        }
    }

    // -- typed lookups -----------------------------------------------------

    /// All rules in evaluation order, or the one named rule.
    pub fn rules(&self, name: Option<&str>) -> Result<Vec<Rule>> {
        let resp: RulesResponse = match name {
            Some(name) => self.get_by_key(Resource::Rule, name)?,
            None => self.get("rule/ordered", &[])?,
        };
        Ok(resp.rules)
    }

    pub fn rule_names(&self) -> Result<Vec<String>> {
        let resp: RulesResponse = self.get_all(Resource::Rule)?;
        Ok(resp.rules.into_iter().map(|r| r.name).collect())
    }

    pub fn actions(&self, name: Option<&str>) -> Result<Vec<Action>> {
        let resp: ActionsResponse = match name {
            Some(name) => self.get_by_key(Resource::Action, name)?,
            None => self.get_all(Resource::Action)?,
        };
        Ok(resp.actions)
    }

    pub fn devices(&self, uid: Option<&str>) -> Result<Vec<Device>> {
        let resp: DevicesResponse = match uid {
            Some(uid) => self.get_by_key(Resource::Device, uid)?,
            None => self.get_all(Resource::Device)?,
        };
        Ok(resp.devices)
    }

    pub fn creds(&self, name: Option<&str>) -> Result<Vec<Cred>> {
        let resp: CredsResponse = match name {
            Some(name) => self.get_by_key(Resource::Cred, name)?,
            None => self.get_all(Resource::Cred)?,
        };
        Ok(resp.creds)
    }

    /// One state by id, or states filtered by type, device and regex.
    pub fn states(
        &self,
        id: Option<&str>,
        state_type: Option<StateType>,
        device_uid: Option<&str>,
        regex: Option<&str>,
    ) -> Result<Vec<State>> {
        let resp: StatesResponse = match id {
            Some(id) => self.get_by_id(Resource::State, id)?,
            None => {
                let mut query = Vec::new();
                if let Some(t) = state_type {
                    query.push(("type", t.as_str()));
                }
                if let Some(uid) = device_uid {
                    query.push(("uid", uid));
                }
                if let Some(regex) = regex {
                    query.push(("regex", regex));
                }
                self.get("state/all", &query)?
            }
        };
        Ok(resp.states)
    }

    pub fn action_types(&self) -> Result<Vec<String>> {
        let resp: ActionTypesResponse = self.get("action/list-types", &[])?;
        Ok(resp.action_types)
    }

    pub fn power_options(&self) -> Result<Vec<String>> {
        let resp: PowerOptionsResponse = self.get("action/list-power-options", &[])?;
        Ok(resp.power_options)
    }

    pub fn special_keys(&self) -> Result<Vec<String>> {
        let resp: SpecialKeysResponse = self.get("action/list-special-keys", &[])?;
        Ok(resp.special_keys)
    }

    // -- work and executions -----------------------------------------------

    pub fn works(&self, work_id: Option<&str>, device_uid: Option<&str>) -> Result<Vec<Work>> {
        let resp: WorksResponse = match (work_id, device_uid) {
            (Some(id), _) => self.get("work/by-id", &[("id", id)])?,
            (None, Some(uid)) => self.get("work/all/by-device", &[("uid", uid)])?,
            (None, None) => self.get_all(Resource::Work)?,
        };
        Ok(resp.works)
    }

    pub fn executions_for_work(&self, work_id: i64) -> Result<Vec<Execution>> {
        let id = work_id.to_string();
        let resp: ExecutionsResponse = self.get("execution/all/by-work-id", &[("id", id.as_str())])?;
        Ok(resp.executions)
    }

    pub fn assign_work(&self, assignment: &WorkAssignment) -> Result<()> {
        self.send("POST", "work/", &[], &serde_json::to_value(assignment)?)
    }

    pub fn report_execution(&self, execution: &Execution) -> Result<()> {
        self.send("POST", "execution/", &[], &serde_json::to_value(execution)?)
    }

    pub fn report_work_completed(&self, completed: &WorkCompleted) -> Result<()> {
        self.send("POST", "work/by-id", &[], &serde_json::to_value(completed)?)
    }

    // -- state, creds, screenshots -----------------------------------------

    /// Mark the device's latest state as resolved.
    pub fn resolve_device_state(&self, device_uid: &str) -> Result<()> {
        self.run_query("POST", "state/resolve", &[("uid", device_uid)], None)?;
        Ok(())
    }

    pub fn screenshot_by_state(&self, state_id: &str) -> Result<Vec<u8>> {
        self.run_query("GET", "state-screenshot/by-id", &[("id", state_id)], None)
    }

    pub fn screenshot_by_device(&self, device_uid: &str) -> Result<Vec<u8>> {
        self.run_query("GET", "state-screenshot/by-device", &[("uid", device_uid)], None)
    }
}

fn read_body(resp: ureq::Response) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    resp.into_reader()
        .read_to_end(&mut buf)
        .context("failed to read response body")?;
    Ok(buf)
}

fn http_error(method: &str, path: &str, status: u16, body: &[u8]) -> anyhow::Error {
    let err = HttpError::from_body(status, &String::from_utf8_lossy(body));
    warn!(method, path, status, error = %err, "api request failed");
    err.into()
}

fn decode<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).with_context(|| format!("unexpected response from {path}"))
}

fn first<T>(items: Vec<T>, resource: Resource, key: &str) -> Result<T> {
    match items.into_iter().next() {
        Some(item) => Ok(item),
        None => bail!("{} '{}' not found", resource.display_name(), key),
    }
}

// ---------------------------------------------------------------------------
// Resource files
// ---------------------------------------------------------------------------

/// Read a YAML or JSON resource definition into a JSON value.
pub fn read_resource_file(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("{} is not valid YAML or JSON", path.display()))
}

/// The identifying field (`name`, or `uid` for devices) of a resource body.
pub fn resource_key(resource: Resource, body: &Value) -> Result<String> {
    match body.get(resource.key_field()).and_then(Value::as_str) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => bail!(
            "{} definition has no '{}' field",
            resource.display_name(),
            resource.key_field()
        ),
    }
}

// ---------------------------------------------------------------------------
// UI boundary
// ---------------------------------------------------------------------------

/// Synchronous operations the terminal UI needs from the service.
pub trait ResourceApi {
    fn fetch_rules(&self) -> Result<Vec<Rule>>;
    fn fetch_rule(&self, name: &str) -> Result<Rule>;
    fn fetch_state(&self, state_id: i64) -> Result<State>;
    fn fetch_states(&self) -> Result<Vec<State>>;
    fn fetch_actions(&self) -> Result<Vec<Action>>;
    fn fetch_action(&self, name: &str) -> Result<Action>;
    fn fetch_action_types(&self) -> Result<Vec<String>>;
    fn fetch_power_options(&self) -> Result<Vec<String>>;
    fn fetch_special_keys(&self) -> Result<Vec<String>>;
    fn fetch_devices(&self) -> Result<Vec<Device>>;
    fn fetch_device(&self, uid: &str) -> Result<Device>;
    fn fetch_creds(&self) -> Result<Vec<Cred>>;
    fn fetch_cred(&self, name: &str) -> Result<Cred>;

    /// Create or update, keyed by name (uid for devices).
    fn save(&self, resource: Resource, key: &str, body: &Value) -> Result<()>;
    fn delete(&self, resource: Resource, key: &str) -> Result<()>;
    fn set_rule_placement(&self, placement: &RulePlacement) -> Result<()>;
    fn update_state_resolved(&self, state_id: i64, resolved: bool) -> Result<()>;
    fn set_default_cred(&self, name: &str) -> Result<()>;

    fn fetch_state_ocr_text(&self, state_id: i64) -> Result<String> {
        Ok(self.fetch_state(state_id)?.ocr_text)
    }

    fn fetch_action_names(&self) -> Result<Vec<String>> {
        Ok(self.fetch_actions()?.into_iter().map(|a| a.name).collect())
    }

    fn fetch_cred_names(&self) -> Result<Vec<String>> {
        Ok(self.fetch_creds()?.into_iter().map(|c| c.name).collect())
    }
}

impl ResourceApi for ApiClient {
    fn fetch_rules(&self) -> Result<Vec<Rule>> {
        self.rules(None)
    }

    fn fetch_rule(&self, name: &str) -> Result<Rule> {
        first(self.rules(Some(name))?, Resource::Rule, name)
    }

    fn fetch_state(&self, state_id: i64) -> Result<State> {
        let id = state_id.to_string();
        first(self.states(Some(&id), None, None, None)?, Resource::State, &id)
    }

    fn fetch_states(&self) -> Result<Vec<State>> {
        let resp: StatesResponse = self.get_all(Resource::State)?;
        Ok(resp.states)
    }

    fn fetch_actions(&self) -> Result<Vec<Action>> {
        self.actions(None)
    }

    fn fetch_action(&self, name: &str) -> Result<Action> {
        first(self.actions(Some(name))?, Resource::Action, name)
    }

    fn fetch_action_types(&self) -> Result<Vec<String>> {
        self.action_types()
    }

    fn fetch_power_options(&self) -> Result<Vec<String>> {
        self.power_options()
    }

    fn fetch_special_keys(&self) -> Result<Vec<String>> {
        self.special_keys()
    }

    fn fetch_devices(&self) -> Result<Vec<Device>> {
        self.devices(None)
    }

    fn fetch_device(&self, uid: &str) -> Result<Device> {
        first(self.devices(Some(uid))?, Resource::Device, uid)
    }

    fn fetch_creds(&self) -> Result<Vec<Cred>> {
        self.creds(None)
    }

    fn fetch_cred(&self, name: &str) -> Result<Cred> {
        first(self.creds(Some(name))?, Resource::Cred, name)
    }

    fn save(&self, resource: Resource, key: &str, body: &Value) -> Result<()> {
        self.update_or_create(resource, key, body)
    }

    fn delete(&self, resource: Resource, key: &str) -> Result<()> {
        self.delete_by_key(resource, key)
    }

    fn set_rule_placement(&self, placement: &RulePlacement) -> Result<()> {
        self.update(Resource::Rule, &serde_json::to_value(placement)?)
    }

    fn update_state_resolved(&self, state_id: i64, resolved: bool) -> Result<()> {
        let body = serde_json::to_value(UpdateResolved { state_id, resolved })?;
        self.send("POST", "state/update-resolve", &[], &body)
    }

    fn set_default_cred(&self, name: &str) -> Result<()> {
        self.run_query("PUT", "creds/default", &[("name", name)], None)?;
        Ok(())
    }
}
