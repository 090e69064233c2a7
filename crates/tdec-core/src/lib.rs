//! # tdec-core
//!
//! Core types and error types for tdec, a client for the 3decision
//! structural-biology database.
//!
//! This crate provides the value types shared by the config, client and CLI
//! crates:
//! - Entity structs for everything the API hands back (structure records,
//!   projects, project assignments, search jobs, export jobs, associated files)
//! - Job and domain-event state enums
//! - The 4×4 [`Transform`] used for transformed exports
//! - Object naming rules for structures handed to a host viewer
//!
//! Nothing in here performs I/O.

pub mod entities;
pub mod enums;
pub mod errors;
pub mod naming;
pub mod serde_helpers;
pub mod transform;

pub use entities::{
    AssociatedFile, ExportFile, ExportJob, FileRef, NotExported, Project, ProjectStructure,
    ProjectStructureAssignment, SearchJob, StructureRecord, TransformedExportRequest,
};
pub use enums::{DomainEventState, ExportFormat, JobState, NamingAttribute};
pub use errors::CoreError;
pub use naming::StructureNaming;
pub use transform::Transform;

/// File extension of the structure files the export endpoints produce.
pub const STRUCTURE_FILE_EXTENSION: &str = ".pdb";
