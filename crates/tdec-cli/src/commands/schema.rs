use schemars::schema_for;
use tdec_core::{AssociatedFile, Project, ProjectStructure, StructureRecord};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::output::output;

/// Handle `tdec schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.type_name {
        SchemaType::Record => schema_for!(StructureRecord),
        SchemaType::Project => schema_for!(Project),
        SchemaType::ProjectStructure => schema_for!(ProjectStructure),
        SchemaType::AssociatedFile => schema_for!(AssociatedFile),
    };
    output(&schema, flags.format)
}
