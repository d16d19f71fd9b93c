use anyhow::Result;
use clap::Parser;
use tracing::{Level, error, info, instrument};

use vaxctl::api::ApiClient;
use vaxctl::cli::{Cli, Commands};
use vaxctl::cmd;
use vaxctl::errors::display_error;
use vaxctl::settings::VaxctlSettings;
use vaxctl::tracing_init::init_tracing;

fn main() {
    init_tracing();
    let cli = Cli::parse();
    info!(args = ?std::env::args(), "vaxctl started");

    let verbose = cli.verbose;
    if let Err(e) = run(cli) {
        error!("command failed: {e:#}");
        display_error(&e, verbose);
        std::process::exit(1);
    }
}

#[instrument(level = Level::TRACE, skip(cli))]
fn run(cli: Cli) -> Result<()> {
    let settings = VaxctlSettings::resolve(cli.config.as_deref())?;
    let api = ApiClient::from_settings(&settings);

    match cli.command {
        Commands::Get(get) => cmd::get::run(&api, get),
        Commands::Create(create) => cmd::create::run(api, create),
        Commands::Apply { resource, filename } => {
            cmd::apply::run(&api, resource.into(), &filename)
        }
        Commands::Delete {
            resource,
            filename,
            name,
        } => cmd::delete::run(&api, resource.into(), filename, name),
        Commands::Edit(edit) => cmd::edit::run(api, edit),
        Commands::Generate {
            resource,
            filename,
            mandatory,
            comments,
        } => cmd::generate::run(
            &api,
            resource.into(),
            filename.as_deref(),
            mandatory,
            comments,
        ),
        Commands::Set(set) => cmd::set::run(&api, set),
        Commands::Assign(assign) => cmd::assign::run(&api, assign),
        Commands::Interactive => cmd::interactive::run(api),
    }
}
