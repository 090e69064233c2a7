use std::collections::HashMap;

use anyhow::Context;
use tdec_core::StructureNaming;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExportArgs;
use crate::commands::shared::{OutputDir, object_name};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::track;

/// Handle `tdec export`: one export job per structure, named by the
/// configured attribute.
pub async fn handle(args: &ExportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = &ctx.client;
    let attribute = client.naming_attribute();

    let records: HashMap<i64, StructureNaming> = client
        .resolve(&args.structure_ids)
        .await
        .iter()
        .map(|record| (record.structure_id, StructureNaming::from(record)))
        .collect();

    let mut out = OutputDir::create(&args.out_dir)?;
    let mut written = Vec::with_capacity(args.structure_ids.len());
    for &structure_id in &args.structure_ids {
        let pdb = track(client.spawn_export(structure_id), &format!("export {structure_id}"))
            .await
            .with_context(|| format!("export of structure {structure_id} failed"))?;

        let naming = records
            .get(&structure_id)
            .cloned()
            .unwrap_or_else(|| StructureNaming::new(structure_id.to_string()));
        let name = object_name(client, naming, Some(structure_id), attribute).await;
        written.push(out.write_structure(Some(structure_id), &name, &pdb)?);
    }

    output(&written, flags.format)
}
