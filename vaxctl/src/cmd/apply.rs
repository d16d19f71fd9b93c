use std::path::Path;

use anyhow::Result;
use tracing::{Level, info, instrument};

use crate::api::{ApiClient, Resource, read_resource_file, resource_key};

use super::done;

/// Create or update a resource from a file. States have no name to look up
/// by, so they are always updated in place.
#[instrument(level = Level::TRACE, skip(api))]
pub fn run(api: &ApiClient, resource: Resource, filename: &Path) -> Result<()> {
    let body = read_resource_file(filename)?;
    if resource == Resource::State {
        api.update(resource, &body)?;
        done("state updated");
        return Ok(());
    }

    let key = resource_key(resource, &body)?;
    info!(resource = resource.path(), key = %key, "applying");
    api.update_or_create(resource, &key, &body)?;
    done(&format!("{} '{}' applied", resource.display_name(), key));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mockito::Matcher;

    use super::*;

    fn file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn state_is_always_put() {
        let mut server = mockito::Server::new();
        let put = server
            .mock("PUT", "/api/v1/state/")
            .match_body(Matcher::PartialJson(serde_json::json!({"state_id": 4})))
            .with_status(200)
            .with_body("{}")
            .create();
        let lookup = server.mock("GET", Matcher::Any).expect(0).create();

        let api = ApiClient::new(server.url());
        let f = file("state_id: 4\nresolved: true\n");
        run(&api, Resource::State, f.path()).unwrap();
        put.assert();
        lookup.assert();
    }

    #[test]
    fn file_without_key_is_rejected() {
        let api = ApiClient::new("http://127.0.0.1:9");
        let f = file("regex: ERROR\n");
        let err = run(&api, Resource::Rule, f.path()).unwrap_err();
        assert!(err.to_string().contains("no 'name' field"), "{err}");
    }

    #[test]
    fn device_is_looked_up_by_uid() {
        let mut server = mockito::Server::new();
        let lookup = server
            .mock("GET", "/api/v1/device/")
            .match_query(Matcher::UrlEncoded("uid".into(), "dev-1".into()))
            .with_status(404)
            .create();
        let post = server
            .mock("POST", "/api/v1/device/")
            .with_status(200)
            .with_body("{}")
            .create();

        let api = ApiClient::new(server.url());
        let f = file(r#"{"uid": "dev-1", "model": "x1"}"#);
        run(&api, Resource::Device, f.path()).unwrap();
        lookup.assert();
        post.assert();
    }
}
