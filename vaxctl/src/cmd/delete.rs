use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing::{Level, info, instrument};

use crate::api::{ApiClient, Resource, read_resource_file, resource_key};

use super::done;

/// Delete by explicit name, or by the name found in a resource file.
#[instrument(level = Level::TRACE, skip(api))]
pub fn run(
    api: &ApiClient,
    resource: Resource,
    filename: Option<PathBuf>,
    name: Option<String>,
) -> Result<()> {
    let key = match (filename, name) {
        (Some(path), None) => resource_key(resource, &read_resource_file(&path)?)?,
        (None, Some(name)) => name,
        _ => bail!("set either '-f' or '-n'"),
    };
    info!(resource = resource.path(), key = %key, "deleting");
    api.delete_by_key(resource, &key)?;
    done(&format!("{} '{}' deleted", resource.display_name(), key));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mockito::Matcher;

    use super::*;

    #[test]
    fn name_is_read_from_file() {
        let mut server = mockito::Server::new();
        let delete = server
            .mock("DELETE", "/api/v1/action/")
            .match_query(Matcher::UrlEncoded("name".into(), "reboot".into()))
            .with_status(200)
            .with_body("{}")
            .create();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: reboot\naction_type: power").unwrap();

        let api = ApiClient::new(server.url());
        run(&api, Resource::Action, Some(file.path().to_path_buf()), None).unwrap();
        delete.assert();
    }

    #[test]
    fn both_sources_are_rejected() {
        let api = ApiClient::new("http://127.0.0.1:9");
        let err = run(
            &api,
            Resource::Rule,
            Some(PathBuf::from("rule.yaml")),
            Some("a".into()),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "set either '-f' or '-n'");
    }
}
