//! Batched structure detail lookup over GraphQL.
//!
//! Ids go out in chunks of [`RESOLVE_CHUNK_SIZE`], one `POST /graphql` per
//! chunk, in order. NMR entries can come back once per model, so records are
//! deduplicated by `structure_id` keeping the first seen. A failing chunk is
//! logged and contributes nothing; the call as a whole never fails.

use std::collections::HashSet;

use serde_json::{Map, Value, json};
use tdec_core::StructureRecord;
use tdec_core::serde_helpers::{first_i64, first_string, value_as_f64};
use tracing::{debug, warn};

use crate::DecisionClient;
use crate::error::ClientError;
use crate::http::{check_response, read_json};
use crate::request::ApiRequest;

/// Ids per GraphQL request.
pub const RESOLVE_CHUNK_SIZE: usize = 500;

const STRUCTURES_INFO_QUERY: &str = "query GetStructuresInfo($ids: [Int!]!) {
  getStructuresInfo(ids: $ids) {
    structure_id
    general {
      structure_id
      external_code
      title
      method
      resolution
      created_date
      imported_date
      created_by
      imported_by
      source
    }
  }
}";

impl DecisionClient {
    /// Detailed records for `ids`, in chunk order then first-seen order, at
    /// most one per `structure_id`.
    pub async fn resolve(&self, ids: &[i64]) -> Vec<StructureRecord> {
        if ids.is_empty() {
            return Vec::new();
        }
        if !self.test_connection().await {
            warn!(structures = ids.len(), "not connected; no structure details fetched");
            return Vec::new();
        }

        let total = ids.len().div_ceil(RESOLVE_CHUNK_SIZE);
        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(ids.len());

        for (index, chunk) in ids.chunks(RESOLVE_CHUNK_SIZE).enumerate() {
            let chunk_number = index + 1;
            debug!(chunk = chunk_number, total, size = chunk.len(), "fetching structure details");
            match self.fetch_structures_chunk(chunk).await {
                Ok(batch) => {
                    let before = records.len();
                    records.extend(batch.into_iter().filter(|r| seen.insert(r.structure_id)));
                    debug!(chunk = chunk_number, kept = records.len() - before, "chunk resolved");
                }
                Err(error) => {
                    warn!(chunk = chunk_number, total, %error, "structure details chunk failed; skipping");
                }
            }
        }
        records
    }

    async fn fetch_structures_chunk(
        &self,
        ids: &[i64],
    ) -> Result<Vec<StructureRecord>, ClientError> {
        let request = ApiRequest::post("/graphql")
            .json(json!({
                "query": STRUCTURES_INFO_QUERY,
                "variables": { "ids": ids },
            }))
            .describe("GraphQL structures batch");
        let body = read_json(check_response(self.execute(request).await?).await?).await?;
        parse_structures_info(&body)
    }
}

fn parse_structures_info(body: &Value) -> Result<Vec<StructureRecord>, ClientError> {
    let Some(entries) = body
        .pointer("/data/getStructuresInfo")
        .and_then(Value::as_array)
    else {
        let detail = body
            .pointer("/errors/0/message")
            .and_then(Value::as_str)
            .unwrap_or("missing data.getStructuresInfo");
        return Err(ClientError::MalformedResponse(format!(
            "GraphQL response: {detail}"
        )));
    };

    Ok(entries
        .iter()
        .filter_map(Value::as_object)
        .filter_map(structure_record)
        .collect())
}

fn structure_record(entry: &Map<String, Value>) -> Option<StructureRecord> {
    let empty = Map::new();
    let general = entry
        .get("general")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let structure_id =
        first_i64(entry, &["structure_id"]).or_else(|| first_i64(general, &["structure_id"]))?;

    Some(StructureRecord {
        structure_id,
        external_code: first_string(general, &["external_code"]).unwrap_or_default(),
        title: first_string(general, &["title"]),
        method: first_string(general, &["method"]),
        resolution: general.get("resolution").and_then(value_as_f64),
        created_date: first_string(general, &["created_date"]),
        imported_date: first_string(general, &["imported_date"]),
        created_by: first_string(general, &["created_by"]),
        imported_by: first_string(general, &["imported_by"]),
        source: first_string(general, &["source"]),
    })
}
