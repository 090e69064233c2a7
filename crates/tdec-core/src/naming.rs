//! Object naming for structures handed to a host viewer or written to disk.
//!
//! The user picks one [`NamingAttribute`]; when that attribute is missing for a
//! given structure the external code is used instead. Names are reduced to a
//! filesystem- and viewer-safe alphabet.

use crate::entities::{ProjectStructure, StructureRecord};
use crate::enums::NamingAttribute;

/// The candidate name sources for one structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureNaming {
    pub external_code: String,
    pub label: Option<String>,
    pub title: Option<String>,
    pub internal_id: Option<String>,
}

impl StructureNaming {
    #[must_use]
    pub fn new(external_code: impl Into<String>) -> Self {
        Self {
            external_code: external_code.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn with_internal_id(mut self, internal_id: Option<String>) -> Self {
        self.internal_id = internal_id;
        self
    }

    /// The sanitised object name for `attribute`.
    #[must_use]
    pub fn object_name(&self, attribute: NamingAttribute) -> String {
        let chosen = match attribute {
            NamingAttribute::Label => self.label.as_deref(),
            NamingAttribute::Title => self.title.as_deref(),
            NamingAttribute::ExternalCode => None,
            NamingAttribute::InternalId => self.internal_id.as_deref(),
        };
        let raw = chosen
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.external_code.trim());
        sanitize(raw)
    }
}

impl From<&StructureRecord> for StructureNaming {
    fn from(record: &StructureRecord) -> Self {
        Self::new(record.external_code.clone()).with_title(record.title.clone())
    }
}

impl From<&ProjectStructure> for StructureNaming {
    fn from(structure: &ProjectStructure) -> Self {
        Self::new(structure.external_code.clone())
            .with_label(structure.label.clone())
            .with_title(structure.title.clone())
    }
}

/// Keep ASCII alphanumerics, `-`, `_` and `.`; collapse everything else into
/// single underscores.
fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "structure".to_string()
    } else {
        trimmed.to_string()
    }
}
