//! Entity structs for everything the 3decision API hands back.
//!
//! These are the normalised shapes: endpoint-specific wire quirks (key casing,
//! list-or-envelope responses, numeric strings) are resolved by the client
//! before values are built. All structs derive `Serialize`, `Deserialize` and
//! `JsonSchema` so the CLI can print them and publish their schemas.

mod associated_file;
mod export;
mod job;
mod project;
mod structure;

pub use associated_file::{AssociatedFile, FileRef};
pub use export::{ExportFile, ExportJob, NotExported, TransformedExportRequest, strip_extension};
pub use job::SearchJob;
pub use project::{Project, ProjectStructure, ProjectStructureAssignment};
pub use structure::StructureRecord;
