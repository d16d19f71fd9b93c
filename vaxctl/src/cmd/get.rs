use std::io::Write;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{Level, debug, instrument};

use crate::api::ApiClient;
use crate::cli::GetCmd;
use crate::model::{self, OutputFormat, Work};

use super::print_items;

#[instrument(level = Level::TRACE, skip(api))]
pub fn run(api: &ApiClient, cmd: GetCmd) -> Result<()> {
    match cmd {
        GetCmd::Rule {
            name,
            details,
            output,
        } => {
            let rules = model::rule::for_output(api.rules(name.as_deref())?, details);
            print_items(&rules, name.is_some(), output)
        }
        GetCmd::Action { name, output } => {
            print_items(&api.actions(name.as_deref())?, name.is_some(), output)
        }
        GetCmd::Device { uid, output } => {
            print_items(&api.devices(uid.as_deref())?, uid.is_some(), output)
        }
        GetCmd::Cred { name, output } => {
            let creds = model::cred::for_output(api.creds(name.as_deref())?, output);
            print_items(&creds, name.is_some(), output)
        }
        GetCmd::State {
            id,
            state_type,
            device,
            regex,
            details,
            output,
        } => {
            let states = api.states(
                id.as_deref(),
                state_type,
                device.as_deref(),
                regex.as_deref(),
            )?;
            let states = model::state::for_output(states, details, output);
            print_items(&states, id.is_some(), output)
        }
        GetCmd::Work {
            id,
            device,
            details,
            latest,
            output,
        } => works(api, id.as_deref(), device.as_deref(), details, latest, output),
        GetCmd::Screenshot {
            id,
            device,
            rule,
            filename,
        } => {
            let image = screenshot(api, id.as_deref(), device.as_deref(), rule.as_deref())?;
            match filename {
                Some(path) => std::fs::write(&path, image)
                    .with_context(|| format!("failed to write {}", path.display())),
                None => open_image(&image),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Work
// ---------------------------------------------------------------------------

fn select_works(mut works: Vec<Work>, latest: bool) -> Result<Vec<Work>> {
    if !latest {
        return Ok(works);
    }
    match works.pop() {
        Some(work) => Ok(vec![work]),
        None => bail!("no work found"),
    }
}

fn works(
    api: &ApiClient,
    id: Option<&str>,
    device: Option<&str>,
    details: bool,
    latest: bool,
    output: OutputFormat,
) -> Result<()> {
    let works = select_works(api.works(id, device)?, latest)?;
    if !details {
        return print_items(&works, latest || id.is_some(), output);
    }
    for work in &works {
        let executions = api.executions_for_work(work.work_id)?;
        print_items(&executions, false, output)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Screenshots
// ---------------------------------------------------------------------------

/// PNG bytes of the requested screenshot. A rule's screenshot is that of the
/// state it was built from.
fn screenshot(
    api: &ApiClient,
    id: Option<&str>,
    device: Option<&str>,
    rule: Option<&str>,
) -> Result<Vec<u8>> {
    if let Some(id) = id {
        return api.screenshot_by_state(id);
    }
    if let Some(uid) = device {
        return api.screenshot_by_device(uid);
    }
    let Some(name) = rule else {
        bail!("set either a device uid, a state id or a rule name");
    };
    let rules = api.rules(Some(name))?;
    match rules.first() {
        Some(rule) if rule.state_id != 0 => api.screenshot_by_state(&rule.state_id.to_string()),
        Some(_) => bail!("rule '{name}' is not linked to a state"),
        None => bail!("rule '{name}' not found"),
    }
}

fn viewer_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "display"
    }
}

fn open_image(image: &[u8]) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix("vaxctl-screenshot")
        .suffix(".png")
        .tempfile()
        .context("failed to create temporary screenshot file")?;
    file.write_all(image)?;
    file.flush()?;
    view(file.path())
}

fn view(path: &Path) -> Result<()> {
    let viewer = viewer_command();
    debug!(viewer, path = %path.display(), "opening screenshot");
    let status = Command::new(viewer)
        .arg(path)
        .status()
        .with_context(|| format!("failed to run '{viewer}'"))?;
    if !status.success() {
        bail!("'{viewer}' exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn work(id: i64) -> Work {
        Work {
            work_id: id,
            ..Work::default()
        }
    }

    #[test]
    fn latest_keeps_only_the_last_work() {
        let works = select_works(vec![work(1), work(2)], true).unwrap();
        assert_eq!(works, vec![work(2)]);
        assert_eq!(select_works(vec![work(1), work(2)], false).unwrap().len(), 2);
        assert!(select_works(Vec::new(), true).is_err());
    }

    #[test]
    fn rule_screenshot_comes_from_its_state() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/v1/rule/")
            .match_query(Matcher::UrlEncoded("name".into(), "disk-full".into()))
            .with_status(200)
            .with_body(r#"{"rules":[{"name":"disk-full","state_id":42}]}"#)
            .create();
        let image = server
            .mock("GET", "/api/v1/state-screenshot/by-id")
            .match_query(Matcher::UrlEncoded("id".into(), "42".into()))
            .with_status(200)
            .with_body([0x89, b'P', b'N', b'G'])
            .create();

        let api = ApiClient::new(server.url());
        let bytes = screenshot(&api, None, None, Some("disk-full")).unwrap();
        image.assert();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn rule_without_state_has_no_screenshot() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/v1/rule/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"rules":[{"name":"manual"}]}"#)
            .create();

        let api = ApiClient::new(server.url());
        let err = screenshot(&api, None, None, Some("manual")).unwrap_err();
        assert!(err.to_string().contains("not linked"), "{err}");
    }

    #[test]
    fn screenshot_is_written_to_file() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/v1/state-screenshot/by-device")
            .match_query(Matcher::UrlEncoded("uid".into(), "dev-1".into()))
            .with_status(200)
            .with_body("png-bytes")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let api = ApiClient::new(server.url());
        run(
            &api,
            GetCmd::Screenshot {
                id: None,
                device: Some("dev-1".into()),
                rule: None,
                filename: Some(path.clone()),
            },
        )
        .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
    }
}
