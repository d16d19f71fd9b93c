use anyhow::Result;
use tracing::{Level, info, instrument};

use crate::api::{ApiClient, ResourceApi};
use crate::cli::{SetCmd, WorkStatus};
use crate::model::work::latest_pending;
use crate::model::{Execution, WorkCompleted};

use super::done;

#[instrument(level = Level::TRACE, skip(api))]
pub fn run(api: &ApiClient, cmd: SetCmd) -> Result<()> {
    match cmd {
        SetCmd::State { device } => {
            api.resolve_device_state(&device)?;
            done(&format!("latest state of '{device}' resolved"));
        }
        SetCmd::Cred { name } => {
            api.set_default_cred(&name)?;
            done(&format!("'{name}' is now the default cred"));
        }
        SetCmd::Work { device, status } => {
            report_work(api, &device, status)?;
            done(&format!("work of '{device}' reported as {}", status.as_str()));
        }
    }
    Ok(())
}

/// Close the device's pending work: a manual execution record first, then
/// the work completion itself.
fn report_work(api: &ApiClient, device: &str, status: WorkStatus) -> Result<()> {
    let works = api.works(None, Some(device))?;
    let work = latest_pending(&works, device)?;
    info!(work_id = work.work_id, status = status.as_str(), "reporting work");
    api.report_execution(&Execution::manual_report(
        work.work_id,
        &work.trigger,
        status.as_str(),
    ))?;
    api.report_work_completed(&WorkCompleted {
        work_id: work.work_id,
        status: status.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn works_mock(server: &mut mockito::Server, body: &str) -> mockito::Mock {
        server
            .mock("GET", "/api/v1/work/all/by-device")
            .match_query(Matcher::UrlEncoded("uid".into(), "dev-1".into()))
            .with_status(200)
            .with_body(body)
            .create()
    }

    #[test]
    fn pending_work_is_reported() {
        let mut server = mockito::Server::new();
        works_mock(
            &mut server,
            r#"{"works":[{"work_id":1,"status":"SUCCESS"},{"work_id":2,"status":"PENDING","trigger":"rule"}]}"#,
        );
        let execution = server
            .mock("POST", "/api/v1/execution/")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "work_id": 2,
                "action_name": "Manual report",
                "trigger": "rule",
                "status": "failure",
            })))
            .with_status(200)
            .with_body("{}")
            .create();
        let completed = server
            .mock("POST", "/api/v1/work/by-id")
            .match_body(Matcher::Json(serde_json::json!({
                "work_id": 2,
                "status": "failure",
            })))
            .with_status(200)
            .with_body("{}")
            .create();

        let api = ApiClient::new(server.url());
        report_work(&api, "dev-1", WorkStatus::Failure).unwrap();
        execution.assert();
        completed.assert();
    }

    #[test]
    fn finished_work_is_not_reported_again() {
        let mut server = mockito::Server::new();
        works_mock(&mut server, r#"{"works":[{"work_id":1,"status":"SUCCESS"}]}"#);
        let execution = server.mock("POST", Matcher::Any).expect(0).create();

        let api = ApiClient::new(server.url());
        let err = report_work(&api, "dev-1", WorkStatus::Success).unwrap_err();
        assert_eq!(err.to_string(), "No pending work found for device: dev-1");
        execution.assert();
    }
}
