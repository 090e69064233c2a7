//! Structure annotations.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{API_VERSION_HEADER, DecisionClient};
use crate::error::ClientError;
use crate::http::read_json;
use crate::request::ApiRequest;

/// Annotation type holding a structure's in-house identifier.
pub const INTERNAL_ID_LABEL: &str = "internal id";

impl DecisionClient {
    /// The "Internal ID" annotation of a structure, if it has one.
    ///
    /// A failure status is logged and reads as no annotation.
    ///
    /// # Errors
    ///
    /// Connection errors, or [`ClientError::MalformedResponse`] for a body
    /// that is not JSON.
    pub async fn structure_internal_id(
        &self,
        structure_id: i64,
    ) -> Result<Option<String>, ClientError> {
        self.require_connection().await?;
        let request = ApiRequest::get("/structures/info/annotation")
            .query("structure_id", structure_id)
            .header(API_VERSION_HEADER, "1")
            .describe("structure annotations");
        let response = self.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            warn!(structure_id, status = status.as_u16(), "annotation request failed");
            return Ok(None);
        }

        let internal_id = internal_id(&read_json(response).await?);
        debug!(structure_id, found = internal_id.is_some(), "internal id looked up");
        Ok(internal_id)
    }
}

/// `ANNOT_VALUE` of the first internal-id entry of the first structure.
fn internal_id(body: &Value) -> Option<String> {
    body.pointer("/0/ANNOTATION_INFO/StructureAnnot")?
        .as_array()?
        .iter()
        .filter(|annot| {
            annot
                .get("ANNOT_TYPE_LABEL")
                .and_then(Value::as_str)
                .is_some_and(|label| label.trim().eq_ignore_ascii_case(INTERNAL_ID_LABEL))
        })
        .find_map(|annot| {
            annot
                .get("ANNOT_VALUE")
                .and_then(tdec_core::serde_helpers::value_as_string)
        })
}
