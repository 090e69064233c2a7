use anyhow::Context;
use serde_json::json;
use tdec_core::FileRef;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{FilesCommands, FilesDownloadArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `tdec files`.
pub async fn handle(action: &FilesCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        FilesCommands::List(args) => output(
            &ctx.client.list_associated_files(&args.external_code).await?,
            flags.format,
        ),
        FilesCommands::Download(args) => download(args, ctx, flags).await,
    }
}

async fn download(args: &FilesDownloadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let file = file_ref(args).context("either --id or --url is required")?;
    let bytes = ctx.client.download_file(&file).await?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    output(
        &json!({ "path": args.out.display().to_string(), "bytes": bytes.len() }),
        flags.format,
    )
}

fn file_ref(args: &FilesDownloadArgs) -> Option<FileRef> {
    args.id
        .clone()
        .map(FileRef::Id)
        .or_else(|| args.url.clone().map(FileRef::Url))
}
