//! Project catalog rules.

use serde::{Deserialize, Serialize};

fn default_owner_fields() -> Vec<String> {
    [
        "owner",
        "project_owner",
        "created_by",
        "owner_username",
        "creator",
        "author",
        "username",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_excluded_projects() -> Vec<String> {
    vec!["3decision".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Candidate owner keys on a project, first populated one wins.
    #[serde(default = "default_owner_fields")]
    pub owner_fields: Vec<String>,

    /// Project labels/names hidden from listings (case-insensitive).
    #[serde(default = "default_excluded_projects")]
    pub excluded_projects: Vec<String>,
}

impl CatalogConfig {
    /// Whether a project with this label or name is hidden.
    #[must_use]
    pub fn is_excluded(&self, label: &str, name: Option<&str>) -> bool {
        self.excluded_projects.iter().any(|excluded| {
            excluded.eq_ignore_ascii_case(label.trim())
                || name.is_some_and(|name| excluded.eq_ignore_ascii_case(name.trim()))
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            owner_fields: default_owner_fields(),
            excluded_projects: default_excluded_projects(),
        }
    }
}
