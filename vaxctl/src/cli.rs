use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::api::Resource;
use crate::model::OutputFormat;
use crate::model::state::StateType;

#[derive(Parser, Debug)]
#[command(name = "vaxctl")]
#[command(version = crate::version::version_long())]
#[command(about = "Manage rules, actions, devices and credentials of the automation service")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default is $HOME/.vaxctl.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Resource kinds addressable from `apply`, `delete` and `generate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Rule,
    Action,
    Device,
    Cred,
    State,
}

impl From<ResourceKind> for Resource {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Rule => Resource::Rule,
            ResourceKind::Action => Resource::Action,
            ResourceKind::Device => Resource::Device,
            ResourceKind::Cred => Resource::Cred,
            ResourceKind::State => Resource::State,
        }
    }
}

/// Outcome reported with `set work`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WorkStatus {
    Success,
    Failure,
}

impl WorkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkStatus::Success => "success",
            WorkStatus::Failure => "failure",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display one or many resources
    #[command(subcommand)]
    Get(GetCmd),

    /// Create a resource from a file or in interactive mode
    #[command(subcommand)]
    Create(CreateCmd),

    /// Create or update a resource from a YAML or JSON file
    Apply {
        resource: ResourceKind,
        /// File to use to create/update the resource
        #[arg(short, long)]
        filename: PathBuf,
    },

    /// Delete a resource by file or by name
    Delete {
        resource: ResourceKind,
        /// File to read the resource name (uid for devices) from
        #[arg(short, long, conflicts_with = "name", required_unless_present = "name")]
        filename: Option<PathBuf>,
        /// Name of the resource to delete (uid for devices)
        #[arg(short, long, visible_alias = "uid")]
        name: Option<String>,
    },

    /// Edit a resource in interactive mode
    #[command(subcommand)]
    Edit(EditCmd),

    /// Print a YAML template for a resource
    Generate {
        resource: ResourceKind,
        /// Output file (stdout when not set)
        #[arg(short, long)]
        filename: Option<PathBuf>,
        /// Only mandatory fields
        #[arg(short, long)]
        mandatory: bool,
        /// Describe every field in comments
        #[arg(short, long)]
        comments: bool,
    },

    /// Change the status of a resource
    #[command(subcommand)]
    Set(SetCmd),

    /// Assign work to a device
    #[command(subcommand)]
    Assign(AssignCmd),

    /// Browse and edit every resource in the terminal UI
    Interactive,
}

#[derive(Subcommand, Debug)]
pub enum GetCmd {
    /// Get one or many rules, in evaluation order
    Rule {
        /// Name of the rule (all rules when not set)
        #[arg(short, long)]
        name: Option<String>,
        /// Include screenshot and OCR text
        #[arg(long)]
        details: bool,
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Get one or many actions
    Action {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Get one or many devices
    Device {
        /// Uid of the device (all devices when not set)
        #[arg(short = 'n', long = "uid")]
        uid: Option<String>,
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Get one or many credentials
    Cred {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Get one or many states
    State {
        /// Id of the state
        #[arg(short, long)]
        id: Option<String>,
        /// Only states of this type
        #[arg(short = 't', long = "type", value_enum)]
        state_type: Option<StateType>,
        /// Only states of this device
        #[arg(short, long)]
        device: Option<String>,
        /// Only states whose OCR text matches this regex
        #[arg(short, long)]
        regex: Option<String>,
        /// Show the full OCR text
        #[arg(long)]
        details: bool,
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Get one or many work items
    Work {
        #[arg(short, long)]
        id: Option<String>,
        /// Uid of the device
        #[arg(short, long)]
        device: Option<String>,
        /// List the executions of each work item
        #[arg(long)]
        details: bool,
        /// Only the latest work item
        #[arg(short, long)]
        latest: bool,
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Get the screenshot of a state, a device's latest state, or a rule
    #[command(group = clap::ArgGroup::new("source").required(true).args(["id", "device", "rule"]))]
    Screenshot {
        /// Id of the state
        #[arg(short, long)]
        id: Option<String>,
        /// Uid of the device
        #[arg(short, long)]
        device: Option<String>,
        /// Rule name
        #[arg(short, long)]
        rule: Option<String>,
        /// Output file (opened in an image viewer when not set)
        #[arg(short, long)]
        filename: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CreateCmd {
    /// Create an action
    Action {
        #[arg(short, long)]
        filename: Option<PathBuf>,
        /// Open interactive mode
        #[arg(short, long)]
        interactive: bool,
        /// List the available action types
        #[arg(short = 'I', long)]
        list_types: bool,
        /// With --list-types, describe each action type
        #[arg(long, requires = "list_types")]
        details: bool,
    },
    /// Create a rule, from a file or interactively from a state
    Rule {
        #[arg(short, long)]
        filename: Option<PathBuf>,
        /// Id of the state to build the rule on
        #[arg(short, long, conflicts_with = "device")]
        id: Option<i64>,
        /// Uid of a device whose latest, unresolved state to build the rule on
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Create a device
    Device {
        #[arg(short, long)]
        filename: Option<PathBuf>,
        #[arg(short, long)]
        interactive: bool,
    },
    /// Create credentials
    Cred {
        #[arg(short, long)]
        filename: Option<PathBuf>,
        #[arg(short, long)]
        interactive: bool,
    },
    /// Create a state
    State {
        #[arg(short, long)]
        filename: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum EditCmd {
    /// Edit a rule
    Rule {
        #[arg(short, long)]
        name: String,
    },
    /// Edit an action
    Action {
        #[arg(short, long)]
        name: String,
    },
    /// Edit a device
    Device {
        /// Uid of the device
        #[arg(short, long, visible_alias = "uid")]
        name: String,
    },
    /// Edit credentials
    Cred {
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SetCmd {
    /// Resolve the latest state of a device
    State {
        #[arg(short, long)]
        device: String,
    },
    /// Make credentials the default
    Cred {
        #[arg(short, long)]
        name: String,
    },
    /// Report the pending work of a device as done
    Work {
        #[arg(short, long)]
        device: String,
        #[arg(short, long, value_enum)]
        status: WorkStatus,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssignCmd {
    /// Assign work to a device, by rule or by a list of actions
    Work {
        /// Uid of the device
        #[arg(short, long, required_unless_present = "filename")]
        device: Option<String>,
        /// Rule whose actions to run
        #[arg(short, long)]
        rule: Option<String>,
        /// Comma separated list of actions
        #[arg(short, long, value_delimiter = ',')]
        actions: Vec<String>,
        /// Work assignment file
        #[arg(short, long, conflicts_with_all = ["device", "rule", "actions"])]
        filename: Option<PathBuf>,
    },
}
