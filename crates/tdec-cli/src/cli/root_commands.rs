use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{FilesCommands, ProjectCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Set server URL and API key, keeping the old ones if login fails.
    Configure(ConfigureArgs),
    /// Exchange the API key for a fresh token.
    Login,
    /// Forget the stored token.
    Logout,
    /// Show connection and preference state.
    Status,
    /// Search structures and print the resolved records.
    Search(SearchArgs),
    /// Wait for an already-submitted queue job.
    Job(JobArgs),
    /// Fetch structure details by id.
    Resolve(ResolveArgs),
    /// Look up the "Internal ID" annotation of a structure.
    InternalId(InternalIdArgs),
    /// Export structures as PDB files, one per id.
    Export(ExportArgs),
    /// Projects and their structures.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Associated files of a structure.
    Files {
        #[command(subcommand)]
        action: FilesCommands,
    },
    /// Show or change persisted preferences.
    Settings(SettingsArgs),
    /// Print the JSON Schema of an output type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ConfigureArgs {
    /// Server base URL; `http://` is assumed without a scheme.
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub api_key: String,
}

#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    /// Free-text query (gene name, PDB code, ...).
    pub query: String,
}

#[derive(Clone, Debug, Args)]
pub struct JobArgs {
    pub job_id: String,
    #[arg(long, default_value = tdec_client::search::SEARCH_QUEUE)]
    pub queue: String,
}

#[derive(Clone, Debug, Args)]
pub struct ResolveArgs {
    #[arg(required = true)]
    pub structure_ids: Vec<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct InternalIdArgs {
    pub structure_id: i64,
}

#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    #[arg(required = true)]
    pub structure_ids: Vec<i64>,
    /// Directory the PDB files are written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    #[must_use]
    pub const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

#[derive(Clone, Debug, Args)]
pub struct SettingsArgs {
    /// Debug logging for every command.
    #[arg(long)]
    pub logging: Option<Switch>,
    /// Attribute exported files are named by: label, title, external_code, internal_id.
    #[arg(long)]
    pub naming: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Record,
    Project,
    ProjectStructure,
    AssociatedFile,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
