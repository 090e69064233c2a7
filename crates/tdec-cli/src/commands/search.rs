use std::sync::Arc;

use serde_json::json;
use tdec_client::JobTask;
use tdec_core::SearchJob;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{InternalIdArgs, JobArgs, ResolveArgs, SearchArgs};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::track;

/// Handle `tdec search`.
pub async fn handle_search(args: &SearchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let task = ctx.client.spawn_search(args.query.clone());
    let records = track(task, &format!("search \"{}\"", args.query)).await?;
    tracing::debug!(query = %args.query, hits = records.len(), "search finished");
    output(&records, flags.format)
}

/// Handle `tdec job`.
pub async fn handle_job(args: &JobArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = Arc::clone(&ctx.client);
    let job = SearchJob::submitted(args.job_id.clone(), args.queue.clone());
    let task = JobTask::spawn(move |job_ctx| async move { client.wait_for_job(&job, &job_ctx).await });
    let finished = track(task, &format!("job {}", args.job_id)).await?;
    output(&finished, flags.format)
}

/// Handle `tdec resolve`. Missing ids are left out of the output.
pub async fn handle_resolve(args: &ResolveArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let records = ctx.client.resolve(&args.structure_ids).await;
    if records.len() < args.structure_ids.len() {
        tracing::warn!(
            requested = args.structure_ids.len(),
            resolved = records.len(),
            "some structures could not be resolved"
        );
    }
    output(&records, flags.format)
}

/// Handle `tdec internal-id`.
pub async fn handle_internal_id(
    args: &InternalIdArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let internal_id = ctx.client.structure_internal_id(args.structure_id).await?;
    output(
        &json!({ "structure_id": args.structure_id, "internal_id": internal_id }),
        flags.format,
    )
}
