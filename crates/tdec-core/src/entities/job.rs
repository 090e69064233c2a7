use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::JobState;

/// A queued search job, mutated only by polling its queue resource.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SearchJob {
    pub id: String,
    pub queue_name: String,
    pub state: JobState,
    /// Structure ids in the order the queue reported them.
    #[serde(default)]
    pub result_structure_ids: Vec<i64>,
}

impl SearchJob {
    #[must_use]
    pub fn submitted(id: impl Into<String>, queue_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            queue_name: queue_name.into(),
            state: JobState::Submitted,
            result_structure_ids: Vec::new(),
        }
    }
}
