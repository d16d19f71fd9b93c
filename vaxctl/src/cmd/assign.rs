use anyhow::{Result, bail};
use tracing::{Level, info, instrument};

use crate::api::{ApiClient, Resource, read_resource_file};
use crate::cli::AssignCmd;
use crate::model::WorkAssignment;

use super::done;

#[instrument(level = Level::TRACE, skip(api))]
pub fn run(api: &ApiClient, cmd: AssignCmd) -> Result<()> {
    let AssignCmd::Work {
        device,
        rule,
        actions,
        filename,
    } = cmd;

    if let Some(path) = filename {
        api.create(Resource::Work, &read_resource_file(&path)?)?;
        done("work assigned");
        return Ok(());
    }

    let assignment = assignment(device, rule, actions)?;
    info!(device = %assignment.device_uid, "assigning work");
    api.assign_work(&assignment)?;
    done(&format!("work assigned to '{}'", assignment.device_uid));
    Ok(())
}

fn assignment(
    device: Option<String>,
    rule: Option<String>,
    actions: Vec<String>,
) -> Result<WorkAssignment> {
    let Some(device_uid) = device else {
        bail!("device UID must be set if no filename is given");
    };
    if rule.is_none() && actions.is_empty() {
        bail!("either a rule or a list of actions must be set if no filename is given");
    }
    Ok(WorkAssignment {
        device_uid,
        rule,
        actions,
    })
}
