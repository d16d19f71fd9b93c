use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{Level, instrument};

use crate::api::{ApiClient, Resource};
use crate::generator::{self, PropInfo};

use super::done;

#[instrument(level = Level::TRACE, skip(api))]
pub fn run(
    api: &ApiClient,
    resource: Resource,
    filename: Option<&Path>,
    mandatory: bool,
    comments: bool,
) -> Result<()> {
    let template = generator::generate(&props(api, resource)?, mandatory, comments);
    match filename {
        Some(path) => {
            std::fs::write(path, template)
                .with_context(|| format!("failed to write {}", path.display()))?;
            done(&format!("template written to {}", path.display()));
        }
        None => println!("{template}"),
    }
    Ok(())
}

/// Props of `resource`, with enumerations filled from the server.
fn props(api: &ApiClient, resource: Resource) -> Result<Vec<PropInfo>> {
    let props = match resource {
        Resource::Rule => {
            let actions: Vec<String> = api.actions(None)?.into_iter().map(|a| a.name).collect();
            generator::rule_props(&actions, &api.rule_names()?)
        }
        Resource::Action => generator::action_props(&api.action_types()?),
        Resource::Device => {
            let creds: Vec<String> = api.creds(None)?.into_iter().map(|c| c.name).collect();
            generator::device_props(&creds)
        }
        Resource::Cred => generator::cred_props(),
        Resource::State => generator::state_props(),
        Resource::Work => bail!("there is no template for work"),
    };
    Ok(props)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_template_lists_server_types() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/v1/action/list-types")
            .with_status(200)
            .with_body(r#"{"action_types":["sleep","power"]}"#)
            .create();

        let api = ApiClient::new(server.url());
        let props = props(&api, Resource::Action).unwrap();
        assert_eq!(
            props[1].constraints,
            vec![("enum", "[sleep, power]".to_string())]
        );
    }

    #[test]
    fn template_is_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cred.yaml");
        let api = ApiClient::new("http://127.0.0.1:9");
        run(&api, Resource::Cred, Some(&path), true, false).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "name: \nusername: \npassword: \n"
        );
    }
}
