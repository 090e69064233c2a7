use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detailed metadata for one structure, as returned by `getStructuresInfo`.
///
/// `structure_id` is the unique key; the resolver never returns two records
/// with the same id from one call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StructureRecord {
    pub structure_id: i64,
    /// Public identifier (e.g. a PDB code); empty when the API omits it.
    #[serde(default)]
    pub external_code: String,
    pub title: Option<String>,
    /// Experimental method (`X-RAY DIFFRACTION`, `SOLUTION NMR`, ...).
    pub method: Option<String>,
    /// Resolution in ångström; `None` for methods without one.
    pub resolution: Option<f64>,
    pub created_date: Option<String>,
    pub imported_date: Option<String>,
    pub created_by: Option<String>,
    pub imported_by: Option<String>,
    pub source: Option<String>,
}

impl StructureRecord {
    /// A record carrying only the key fields.
    #[must_use]
    pub fn new(structure_id: i64, external_code: impl Into<String>) -> Self {
        Self {
            structure_id,
            external_code: external_code.into(),
            title: None,
            method: None,
            resolution: None,
            created_date: None,
            imported_date: None,
            created_by: None,
            imported_by: None,
            source: None,
        }
    }
}
