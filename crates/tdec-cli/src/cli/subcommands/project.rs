use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// List projects (system projects hidden).
    List,
    /// List a project's structures with their details and transforms.
    Structures(ProjectStructuresArgs),
    /// Export a project's structures in their reference frames.
    Load(ProjectLoadArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ProjectStructuresArgs {
    pub project_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct ProjectLoadArgs {
    pub project_id: String,
    /// Only these structure ids (default: all).
    #[arg(long = "structure")]
    pub structures: Vec<i64>,
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}
