use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{StructureRecord, TransformedExportRequest};
use crate::transform::Transform;

/// An organisational project grouping structures.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Project {
    pub project_id: String,
    pub project_label: String,
    pub project_name: Option<String>,
    /// Best-effort owner, read from the first populated candidate field.
    pub owner: Option<String>,
    pub structure_count: Option<u64>,
}

/// A structure as assigned to a project, with its reference transform.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProjectStructureAssignment {
    pub structure_id: i64,
    pub external_code: String,
    pub label: Option<String>,
    pub title: Option<String>,
    pub method: Option<String>,
    /// `None` means the identity transform.
    pub transform: Option<Transform>,
}

/// A project assignment merged with the resolver's detailed record.
///
/// Detailed fields win where the record has them; everything else falls back
/// to what the assignment endpoint returned.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProjectStructure {
    pub structure_id: i64,
    pub external_code: String,
    pub label: Option<String>,
    pub title: Option<String>,
    pub method: Option<String>,
    pub resolution: Option<f64>,
    pub transform: Option<Transform>,
    pub details: Option<StructureRecord>,
}

impl ProjectStructure {
    #[must_use]
    pub fn merge(assignment: ProjectStructureAssignment, details: Option<&StructureRecord>) -> Self {
        let Some(record) = details else {
            return Self {
                structure_id: assignment.structure_id,
                external_code: assignment.external_code,
                label: assignment.label,
                title: assignment.title,
                method: assignment.method,
                resolution: None,
                transform: assignment.transform,
                details: None,
            };
        };

        let external_code = if record.external_code.is_empty() {
            assignment.external_code
        } else {
            record.external_code.clone()
        };

        Self {
            structure_id: assignment.structure_id,
            external_code,
            label: assignment.label,
            title: record.title.clone().or(assignment.title),
            method: record.method.clone().or(assignment.method),
            resolution: record.resolution,
            transform: assignment.transform,
            details: Some(record.clone()),
        }
    }

    /// Export request for this structure, identity when no transform is set.
    #[must_use]
    pub fn export_request(&self) -> TransformedExportRequest {
        TransformedExportRequest {
            structure_id: self.structure_id,
            external_code: self.external_code.clone(),
            transform: self.transform.unwrap_or_default(),
        }
    }
}
