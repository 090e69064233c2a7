//! Projects and the structures assigned to them.
//!
//! Unlike search and export, catalog calls raise connection errors instead of
//! degrading to empty results: a host needs to tell "no projects" apart from
//! "credentials must be re-entered".

use std::collections::HashMap;

use serde_json::{Map, Value};
use tdec_config::CatalogConfig;
use tdec_core::serde_helpers::{first_i64, first_string, value_as_f64};
use tdec_core::{Project, ProjectStructure, ProjectStructureAssignment, Transform};
use tracing::{debug, warn};

use crate::DecisionClient;
use crate::error::ClientError;
use crate::http::{check_response, read_json};
use crate::request::ApiRequest;
use crate::shapes::entries;

const PROJECT_ENVELOPES: &[&str] = &["projects", "results"];
const ASSIGNMENT_ENVELOPES: &[&str] = &["results"];

impl DecisionClient {
    /// `GET /projects`, minus the excluded system projects.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotConfigured`], [`ClientError::AuthenticationFailure`]
    /// or [`ClientError::RequestFailure`].
    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.require_connection().await?;
        let request = ApiRequest::get("/projects")
            .header("Accept", "application/json")
            .describe("projects request");
        let body = read_json(check_response(self.execute(request).await?).await?).await?;

        let Some(raw) = entries(body, PROJECT_ENVELOPES) else {
            warn!("unexpected projects response shape");
            return Ok(Vec::new());
        };
        let catalog = self.catalog_settings();
        let projects: Vec<Project> = raw
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|entry| project(entry, &catalog))
            .filter(|p| {
                let hidden = catalog.is_excluded(&p.project_label, p.project_name.as_deref());
                if hidden {
                    debug!(project = %p.project_label, "hiding system project");
                }
                !hidden
            })
            .collect();
        debug!(listed = raw.len(), kept = projects.len(), "projects loaded");
        Ok(projects)
    }

    /// `GET /projects/{id}/structures/matrix`, as returned.
    ///
    /// # Errors
    ///
    /// As [`DecisionClient::list_projects`].
    pub async fn list_project_structure_assignments(
        &self,
        project_id: &str,
    ) -> Result<Vec<ProjectStructureAssignment>, ClientError> {
        self.require_connection().await?;
        let request = ApiRequest::get(format!(
            "/projects/{}/structures/matrix",
            urlencoding::encode(project_id)
        ))
        .header("Accept", "application/json")
        .describe("project structures request");
        let body = read_json(check_response(self.execute(request).await?).await?).await?;

        let Some(raw) = entries(body, ASSIGNMENT_ENVELOPES) else {
            warn!(project_id, "unexpected project structures response shape");
            return Ok(Vec::new());
        };
        Ok(raw
            .iter()
            .filter_map(Value::as_object)
            .filter_map(assignment)
            .collect())
    }

    /// Project assignments merged with their resolved structure details.
    ///
    /// Assignments the resolver has no record for keep their raw fields.
    ///
    /// # Errors
    ///
    /// As [`DecisionClient::list_project_structure_assignments`]; resolver
    /// failures only leave records unmerged.
    pub async fn list_project_structures(
        &self,
        project_id: &str,
    ) -> Result<Vec<ProjectStructure>, ClientError> {
        let assignments = self.list_project_structure_assignments(project_id).await?;
        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = assignments.iter().map(|a| a.structure_id).collect();
        let details: HashMap<i64, _> = self
            .resolve(&ids)
            .await
            .into_iter()
            .map(|record| (record.structure_id, record))
            .collect();
        debug!(
            project_id,
            structures = assignments.len(),
            detailed = details.len(),
            "project structures merged"
        );

        Ok(assignments
            .into_iter()
            .map(|a| {
                let record = details.get(&a.structure_id);
                ProjectStructure::merge(a, record)
            })
            .collect())
    }
}

fn project(entry: &Map<String, Value>, catalog: &CatalogConfig) -> Option<Project> {
    let project_id = first_string(entry, &["project_id", "PROJECT_ID", "id"])?;
    let owner_fields: Vec<&str> = catalog.owner_fields.iter().map(String::as_str).collect();
    Some(Project {
        project_label: first_string(entry, &["project_label", "PROJECT_LABEL", "label"])
            .unwrap_or_default(),
        project_name: first_string(entry, &["project_name", "PROJECT_NAME", "name"]),
        owner: first_string(entry, &owner_fields),
        structure_count: first_i64(
            entry,
            &["count_structures_in_project", "structure_count"],
        )
        .and_then(|n| u64::try_from(n).ok()),
        project_id,
    })
}

fn assignment(entry: &Map<String, Value>) -> Option<ProjectStructureAssignment> {
    let structure_id = first_i64(entry, &["STRUCTURE_ID", "structure_id"])?;
    Some(ProjectStructureAssignment {
        structure_id,
        external_code: first_string(entry, &["EXTERNAL_CODE", "external_code"])
            .unwrap_or_default(),
        label: first_string(entry, &["LABEL", "label", "PROJECT_LABEL", "project_label"]),
        title: first_string(entry, &["TITLE", "title"]),
        method: first_string(entry, &["METHOD", "method"]),
        transform: reference_transform(entry),
    })
}

/// `ReferenceTransforms.transform`, when it holds exactly 16 numbers.
fn reference_transform(entry: &Map<String, Value>) -> Option<Transform> {
    let values = entry
        .get("ReferenceTransforms")?
        .get("transform")?
        .as_array()?
        .iter()
        .map(value_as_f64)
        .collect::<Option<Vec<f64>>>()?;
    Transform::from_flat(&values).ok()
}
