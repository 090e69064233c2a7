use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::serde_helpers::first_string;

const ID_FIELDS: &[&str] = &["id", "file_id", "FILE_ID"];
const URL_FIELDS: &[&str] = &["download_url", "url"];
const NAME_FIELDS: &[&str] = &["file_name", "FILE_NAME", "filename", "name"];

/// A supplementary file linked to a structure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AssociatedFile {
    pub id: Option<String>,
    pub download_url: Option<String>,
    pub file_name: Option<String>,
    /// The descriptor as the API returned it.
    pub metadata: Map<String, Value>,
}

/// How to fetch an associated file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileRef {
    /// Resolve through `GET /structures/file/{id}/download`.
    Id(String),
    /// Fetch this URL directly.
    Url(String),
}

impl AssociatedFile {
    /// Build from one raw descriptor object. Non-objects yield `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(metadata) = value else {
            return None;
        };
        Some(Self {
            id: first_string(&metadata, ID_FIELDS),
            download_url: first_string(&metadata, URL_FIELDS),
            file_name: first_string(&metadata, NAME_FIELDS),
            metadata,
        })
    }

    /// Id wins over URL, matching how the download endpoint is preferred.
    #[must_use]
    pub fn file_ref(&self) -> Option<FileRef> {
        self.id
            .clone()
            .map(FileRef::Id)
            .or_else(|| self.download_url.clone().map(FileRef::Url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_id_from_any_candidate_field() {
        let file = AssociatedFile::from_value(json!({"FILE_ID": 77, "FILE_NAME": "map.ccp4"}))
            .unwrap();
        assert_eq!(file.id.as_deref(), Some("77"));
        assert_eq!(file.file_name.as_deref(), Some("map.ccp4"));
        assert_eq!(file.file_ref(), Some(FileRef::Id("77".into())));
    }

    #[test]
    fn falls_back_to_url() {
        let file =
            AssociatedFile::from_value(json!({"url": "https://files.example/x.csv"})).unwrap();
        assert_eq!(
            file.file_ref(),
            Some(FileRef::Url("https://files.example/x.csv".into()))
        );
    }

    #[test]
    fn no_reference_without_id_or_url() {
        let file = AssociatedFile::from_value(json!({"name": "notes.txt"})).unwrap();
        assert_eq!(file.file_ref(), None);
    }

    #[test]
    fn rejects_non_objects() {
        assert!(AssociatedFile::from_value(json!("x")).is_none());
    }
}
