use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Associated-file commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FilesCommands {
    /// List the files attached to a structure.
    List(FilesListArgs),
    /// Download one file by id or URL.
    Download(FilesDownloadArgs),
}

#[derive(Clone, Debug, Args)]
pub struct FilesListArgs {
    pub external_code: String,
}

#[derive(Clone, Debug, Args)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["id", "url"])))]
pub struct FilesDownloadArgs {
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    /// Destination file.
    #[arg(long)]
    pub out: PathBuf,
}
