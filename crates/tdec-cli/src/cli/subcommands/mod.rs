mod files;
mod project;

pub use files::{FilesCommands, FilesDownloadArgs};
pub use project::{ProjectCommands, ProjectLoadArgs};
