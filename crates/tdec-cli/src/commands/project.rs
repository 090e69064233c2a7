use anyhow::Context;
use tdec_core::entities::strip_extension;
use tdec_core::{ProjectStructure, StructureNaming, TransformedExportRequest};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{ProjectCommands, ProjectLoadArgs};
use crate::commands::shared::{OutputDir, object_name};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::track;

/// Handle `tdec project`.
pub async fn handle(action: &ProjectCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ProjectCommands::List => output(&ctx.client.list_projects().await?, flags.format),
        ProjectCommands::Structures(args) => output(
            &ctx.client.list_project_structures(&args.project_id).await?,
            flags.format,
        ),
        ProjectCommands::Load(args) => load(args, ctx, flags).await,
    }
}

/// Export the chosen structures in their reference frames and write one
/// file per structure.
async fn load(args: &ProjectLoadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let structures = client
        .list_project_structures(&args.project_id)
        .await
        .with_context(|| format!("failed to list structures of project {}", args.project_id))?;
    let selected = select(structures, &args.structures)?;
    if selected.is_empty() {
        anyhow::bail!("project {} has no structures", args.project_id);
    }

    let requests: Vec<TransformedExportRequest> =
        selected.iter().map(ProjectStructure::export_request).collect();
    let files = track(
        client.spawn_export_with_transforms(requests),
        &format!("project {} export", args.project_id),
    )
    .await?;

    let attribute = client.naming_attribute();
    let mut out = OutputDir::create(&args.out_dir)?;
    let mut written = Vec::with_capacity(files.len());
    for (file_name, pdb) in &files {
        let stem = strip_extension(file_name);
        let (structure_id, naming) = match entry_structure(stem, &selected) {
            Some(structure) => (Some(structure.structure_id), StructureNaming::from(structure)),
            None => {
                tracing::debug!(file_name, "archive entry matches no project structure");
                (None, StructureNaming::new(stem))
            }
        };
        let name = object_name(client, naming, structure_id, attribute).await;
        written.push(out.write_structure(structure_id, &name, pdb)?);
    }

    output(&written, flags.format)
}

/// The structure an archive entry belongs to. Entry names are the external
/// code, possibly behind a server prefix such as `3dec_`; the longest code
/// that ends the name wins.
fn entry_structure<'a>(stem: &str, structures: &'a [ProjectStructure]) -> Option<&'a ProjectStructure> {
    let stem = stem.to_ascii_lowercase();
    structures
        .iter()
        .filter(|structure| {
            let code = structure.external_code.trim().to_ascii_lowercase();
            if code.is_empty() {
                return false;
            }
            stem == code
                || stem
                    .strip_suffix(&code)
                    .is_some_and(|prefix| prefix.ends_with(['_', '-', '.']))
        })
        .max_by_key(|structure| structure.external_code.trim().len())
}

/// Keep `wanted` ids in project order; an empty filter keeps everything.
fn select(structures: Vec<ProjectStructure>, wanted: &[i64]) -> anyhow::Result<Vec<ProjectStructure>> {
    if wanted.is_empty() {
        return Ok(structures);
    }
    if let Some(missing) = wanted
        .iter()
        .find(|id| !structures.iter().any(|s| s.structure_id == **id))
    {
        anyhow::bail!("structure {missing} is not part of this project");
    }
    Ok(structures
        .into_iter()
        .filter(|structure| wanted.contains(&structure.structure_id))
        .collect())
}
