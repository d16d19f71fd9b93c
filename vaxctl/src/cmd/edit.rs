use anyhow::Result;
use tracing::{Level, instrument};

use crate::api::{ApiClient, Resource};
use crate::cli::EditCmd;
use crate::tui::{self, StartAt};

/// Open the terminal UI on an existing resource.
#[instrument(level = Level::TRACE, skip(api))]
pub fn run(api: ApiClient, cmd: EditCmd) -> Result<()> {
    tui::run(api, start_at(cmd))
}

fn start_at(cmd: EditCmd) -> StartAt {
    match cmd {
        EditCmd::Rule { name } => StartAt::Edit(Resource::Rule, name),
        EditCmd::Action { name } => StartAt::Edit(Resource::Action, name),
        EditCmd::Device { name } => StartAt::Edit(Resource::Device, name),
        EditCmd::Cred { name } => StartAt::Edit(Resource::Cred, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_is_edited_by_uid() {
        assert_eq!(
            start_at(EditCmd::Device {
                name: "dev-1".into()
            }),
            StartAt::Edit(Resource::Device, "dev-1".into())
        );
    }
}
