use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DomainEventState;
use crate::serde_helpers::{lenient_i64, lenient_string};
use crate::transform::Transform;

/// One file produced by an export, from `content.file_names`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportFile {
    #[serde(default, deserialize_with = "lenient_string")]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub external_code: Option<String>,
}

/// One entry of `content.errors.not_exported`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NotExported {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub structure_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub external_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error_message: Option<String>,
}

/// An export job tracked through its domain event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportJob {
    pub domain_event_id: String,
    pub state: DomainEventState,
    #[serde(default)]
    pub files: Vec<ExportFile>,
    #[serde(default)]
    pub not_exported: Vec<NotExported>,
}

impl ExportJob {
    #[must_use]
    pub fn pending(domain_event_id: impl Into<String>) -> Self {
        Self {
            domain_event_id: domain_event_id.into(),
            state: DomainEventState::Pending,
            files: Vec::new(),
            not_exported: Vec::new(),
        }
    }

    /// Name of the first exported file, as reported by the domain event.
    #[must_use]
    pub fn primary_file_name(&self) -> Option<&str> {
        self.files
            .first()
            .and_then(|file| file.file_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// The `filename` query value for the download endpoint.
    ///
    /// The endpoint appends the extension itself, so it is stripped here.
    #[must_use]
    pub fn download_stem(&self) -> Option<&str> {
        self.primary_file_name().map(strip_extension)
    }
}

/// Drop the last `.ext` of a file name, if there is one.
#[must_use]
pub fn strip_extension(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem)
}

/// A structure to export, positioned by a transform (identity by default).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TransformedExportRequest {
    pub structure_id: i64,
    pub external_code: String,
    #[serde(default)]
    pub transform: Transform,
}

impl TransformedExportRequest {
    #[must_use]
    pub fn new(structure_id: i64, external_code: impl Into<String>) -> Self {
        Self {
            structure_id,
            external_code: external_code.into(),
            transform: Transform::IDENTITY,
        }
    }

    #[must_use]
    pub const fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("101.pdb", "101")]
    #[case("3dec_1abc.model.pdb", "3dec_1abc.model")]
    #[case("export", "export")]
    #[case("archive.zip", "archive")]
    fn strips_only_the_last_extension(#[case] name: &str, #[case] stem: &str) {
        assert_eq!(strip_extension(name), stem);
    }

    #[test]
    fn download_stem_uses_first_file() {
        let mut job = ExportJob::pending("ev1");
        job.files = vec![
            ExportFile {
                file_name: Some("101.pdb".into()),
                external_code: Some("101".into()),
            },
            ExportFile {
                file_name: Some("102.pdb".into()),
                external_code: Some("102".into()),
            },
        ];
        assert_eq!(job.primary_file_name(), Some("101.pdb"));
        assert_eq!(job.download_stem(), Some("101"));
    }

    #[test]
    fn download_stem_absent_without_files() {
        assert_eq!(ExportJob::pending("ev1").download_stem(), None);
    }

    #[test]
    fn export_file_accepts_numeric_codes() {
        let file: ExportFile =
            serde_json::from_str(r#"{"file_name": "101.pdb", "external_code": 101}"#).unwrap();
        assert_eq!(file.external_code.as_deref(), Some("101"));
    }

    #[test]
    fn transformed_request_defaults_to_identity() {
        let request: TransformedExportRequest =
            serde_json::from_str(r#"{"structure_id": 7, "external_code": "1abc"}"#).unwrap();
        assert!(request.transform.is_identity());
    }
}
