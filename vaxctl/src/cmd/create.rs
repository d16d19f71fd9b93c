use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{Level, info, instrument};

use crate::api::{ApiClient, Resource, read_resource_file};
use crate::cli::CreateCmd;
use crate::model::State;
use crate::model::action::detailed_types_report;
use crate::tui::{self, StartAt};

use super::done;

#[instrument(level = Level::TRACE, skip(api))]
pub fn run(api: ApiClient, cmd: CreateCmd) -> Result<()> {
    match cmd {
        CreateCmd::Action {
            list_types: true,
            details,
            ..
        } => list_action_types(&api, details),
        CreateCmd::Action {
            filename,
            interactive,
            ..
        } => create_or_open(api, Resource::Action, filename, interactive),
        CreateCmd::Device {
            filename,
            interactive,
        } => create_or_open(api, Resource::Device, filename, interactive),
        CreateCmd::Cred {
            filename,
            interactive,
        } => create_or_open(api, Resource::Cred, filename, interactive),
        CreateCmd::State { filename } => from_file(&api, Resource::State, &filename),
        CreateCmd::Rule {
            filename,
            id,
            device,
        } => {
            if let Some(state_id) = id {
                // Fail before the UI opens when the state does not exist.
                api.states(Some(&state_id.to_string()), None, None, None)?;
                return tui::run(api, StartAt::CreateRuleFromState(state_id));
            }
            if let Some(uid) = device {
                let states = api.states(None, None, Some(&uid), None)?;
                let state_id = open_state_id(&states, &uid)?;
                return tui::run(api, StartAt::CreateRuleFromState(state_id));
            }
            match filename {
                Some(path) => from_file(&api, Resource::Rule, &path),
                None => bail!("set either a filename (-f), a state id (-i) or a device uid (-d)"),
            }
        }
    }
}

fn create_or_open(
    api: ApiClient,
    resource: Resource,
    filename: Option<PathBuf>,
    interactive: bool,
) -> Result<()> {
    if interactive {
        return tui::run(api, StartAt::Create(resource));
    }
    match filename {
        Some(path) => from_file(&api, resource, &path),
        None => bail!("set either a filename (-f) or interactive mode (-i)"),
    }
}

fn from_file(api: &ApiClient, resource: Resource, path: &Path) -> Result<()> {
    let body = read_resource_file(path)?;
    info!(resource = resource.path(), path = %path.display(), "creating from file");
    api.create(resource, &body)?;
    done(&format!("{} created", resource.display_name()));
    Ok(())
}

/// The device's latest state, which must still be open.
fn open_state_id(states: &[State], uid: &str) -> Result<i64> {
    match states.last() {
        None => bail!("State for UID '{uid}' was not found"),
        Some(state) if state.resolved => bail!(
            "Open State for UID '{uid}' was not found, last resolved state ID is '{}'",
            state.state_id
        ),
        Some(state) => Ok(state.state_id),
    }
}

fn list_action_types(api: &ApiClient, details: bool) -> Result<()> {
    if details {
        let report = detailed_types_report(&api.power_options()?, &api.special_keys()?);
        print!("{report}");
    } else {
        for action_type in api.action_types()? {
            println!("{action_type}");
        }
    }
    Ok(())
}
