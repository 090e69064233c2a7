//! Structure export through domain events.
//!
//! Every export is three calls: `POST /exports/structure` answers with a
//! domain event id as plain text, `GET /domain-events/{id}` is polled until
//! the event succeeds or fails, then the file named by the event is fetched
//! from `GET /exports/structure/{id}`.

use std::collections::BTreeMap;

use serde_json::{Value, json};
use tdec_core::{
    DomainEventState, ExportFile, ExportFormat, ExportJob, NotExported,
    STRUCTURE_FILE_EXTENSION, TransformedExportRequest,
};
use tracing::{debug, warn};

use crate::DecisionClient;
use crate::archive::unpack_structure_archive;
use crate::error::ClientError;
use crate::http::{check_response, read_json};
use crate::poller::{PollStep, poll_until};
use crate::request::ApiRequest;
use crate::task::{JobContext, JobProgress};

const ZIP_SIGNATURE: &[u8] = b"PK";

impl DecisionClient {
    /// Start an export and return its domain event id.
    ///
    /// # Errors
    ///
    /// Connection and status errors, or [`ClientError::MalformedResponse`]
    /// when the body holds no id.
    pub async fn submit_export(
        &self,
        format: ExportFormat,
        body: Value,
    ) -> Result<String, ClientError> {
        self.require_connection().await?;
        let request = ApiRequest::post("/exports/structure")
            .query("output_format", format.as_str())
            .json(body)
            .describe("structure export");
        let response = check_response(self.execute(request).await?).await?;
        let domain_event_id = response.text().await?.trim().to_string();
        if domain_event_id.is_empty() {
            return Err(ClientError::MalformedResponse(
                "export returned no domain event id".into(),
            ));
        }
        debug!(%domain_event_id, format = format.as_str(), "export submitted");
        Ok(domain_event_id)
    }

    /// One check of `GET /domain-events/{id}`.
    ///
    /// # Errors
    ///
    /// Connection, status and decoding errors.
    pub async fn domain_event(&self, domain_event_id: &str) -> Result<ExportJob, ClientError> {
        let request = ApiRequest::get(format!(
            "/domain-events/{}",
            urlencoding::encode(domain_event_id)
        ))
        .describe("export status check");
        let body = read_json(check_response(self.execute(request).await?).await?).await?;
        parse_domain_event(domain_event_id, &body)
    }

    /// Poll a domain event until it succeeds (export attempt cap).
    ///
    /// # Errors
    ///
    /// [`ClientError::JobFailed`] for a failed event,
    /// [`ClientError::PartialExportFailure`] when a successful event lists
    /// structures it could not export, [`ClientError::PollingTimeout`],
    /// [`ClientError::Cancelled`], or any status-check error.
    pub async fn poll_export(
        &self,
        domain_event_id: &str,
        ctx: &JobContext,
    ) -> Result<ExportJob, ClientError> {
        self.require_connection().await?;
        let policy = self.poll_policy(|p| p.export_max_attempts);
        poll_until(policy, ctx, |_| async move {
            let job = self.domain_event(domain_event_id).await?;
            match job.state {
                DomainEventState::Pending => Ok(PollStep::Pending(None)),
                DomainEventState::Failed => Err(ClientError::JobFailed {
                    job_id: domain_event_id.to_string(),
                }),
                DomainEventState::Success => ensure_complete(job).map(PollStep::Ready),
            }
        })
        .await
    }

    /// Download the file a finished export produced.
    ///
    /// # Errors
    ///
    /// [`ClientError::MalformedResponse`] when the event names no file, or a
    /// connection or status error.
    pub async fn download_export(&self, job: &ExportJob) -> Result<Vec<u8>, ClientError> {
        let Some(stem) = job.download_stem() else {
            return Err(ClientError::MalformedResponse(format!(
                "export {} names no file",
                job.domain_event_id
            )));
        };
        let request = ApiRequest::get(format!(
            "/exports/structure/{}",
            urlencoding::encode(&job.domain_event_id)
        ))
        .query("filename", stem)
        .query("download", true)
        .describe("export download");
        let response = check_response(self.execute(request).await?).await?;
        let bytes = response.bytes().await?;
        debug!(domain_event_id = %job.domain_event_id, stem, size = bytes.len(), "export downloaded");
        Ok(bytes.to_vec())
    }

    /// Export one structure as PDB text.
    ///
    /// # Errors
    ///
    /// Any error of the submit, poll or download steps, or
    /// [`ClientError::MalformedResponse`] if the file is not UTF-8.
    pub async fn export_single(
        &self,
        structure_id: i64,
        ctx: &JobContext,
    ) -> Result<String, ClientError> {
        ctx.check_cancelled()?;
        let body = json!({ "structures_id": [structure_id] });
        let job = self.run_export(ExportFormat::PdbText, body, ctx).await?;
        let text = decode_text(self.download_export(&job).await?)?;
        ctx.report(JobProgress::Done);
        Ok(text)
    }

    /// Export structures placed by their transforms, keyed by file name.
    ///
    /// One request goes out as PDB text keyed `<external_code>.pdb`; more go
    /// out as a ZIP whose `.pdb` entries are unpacked.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidInput`] for an empty list,
    /// [`ClientError::ArchiveError`] for an unreadable or empty archive, or
    /// any error of the export steps.
    pub async fn export_with_transforms(
        &self,
        requests: &[TransformedExportRequest],
        ctx: &JobContext,
    ) -> Result<BTreeMap<String, String>, ClientError> {
        ctx.check_cancelled()?;
        let matrix: Vec<Value> = requests.iter().map(matrix_entry).collect();

        let files = match requests {
            [] => {
                return Err(ClientError::InvalidInput(
                    "no structures to export".into(),
                ));
            }
            [single] => {
                let body = json!({
                    "external_codes": [single.external_code],
                    "matrix": matrix,
                });
                let job = self.run_export(ExportFormat::PdbText, body, ctx).await?;
                let text = decode_text(self.download_export(&job).await?)?;
                BTreeMap::from([(
                    format!("{}{STRUCTURE_FILE_EXTENSION}", single.external_code),
                    text,
                )])
            }
            many => {
                let ids: Vec<i64> = many.iter().map(|r| r.structure_id).collect();
                let archive = self.download_zip(&ids, Some(matrix), ctx).await?;
                ctx.report(JobProgress::Unpacking);
                unpack_structure_archive(&archive)?
            }
        };
        debug!(requested = requests.len(), files = files.len(), "transformed export finished");
        ctx.report(JobProgress::Done);
        Ok(files)
    }

    /// Export `structure_ids` as one ZIP archive, optionally placed by
    /// `matrix` entries, and return its raw bytes.
    ///
    /// A body without the `PK` signature is only logged.
    ///
    /// # Errors
    ///
    /// Any error of the submit, poll or download steps.
    pub async fn download_zip(
        &self,
        structure_ids: &[i64],
        matrix: Option<Vec<Value>>,
        ctx: &JobContext,
    ) -> Result<Vec<u8>, ClientError> {
        ctx.check_cancelled()?;
        let mut body = json!({ "structures_id": structure_ids });
        if let Some(matrix) = matrix.filter(|m| !m.is_empty()) {
            debug!(matrices = matrix.len(), "exporting with transforms");
            body["matrix"] = Value::Array(matrix);
        }

        let job = self.run_export(ExportFormat::PdbZip, body, ctx).await?;
        let archive = self.download_export(&job).await?;
        if !archive.starts_with(ZIP_SIGNATURE) {
            warn!(
                domain_event_id = %job.domain_event_id,
                size = archive.len(),
                "export download does not look like a ZIP archive"
            );
        }
        Ok(archive)
    }

    /// Submit, report, poll, and report the download that follows.
    async fn run_export(
        &self,
        format: ExportFormat,
        body: Value,
        ctx: &JobContext,
    ) -> Result<ExportJob, ClientError> {
        let domain_event_id = self.submit_export(format, body).await?;
        ctx.report(JobProgress::Submitted {
            job_id: domain_event_id.clone(),
        });
        let job = self.poll_export(&domain_event_id, ctx).await?;
        ctx.check_cancelled()?;
        ctx.report(JobProgress::Downloading {
            file_name: job.primary_file_name().unwrap_or_default().to_string(),
        });
        Ok(job)
    }
}

/// Wire form of one transform entry.
fn matrix_entry(request: &TransformedExportRequest) -> Value {
    json!({
        "external_code": request.external_code,
        "structure_id": request.structure_id,
        "transform": request.transform.to_flat(),
    })
}

/// A successful event that still lists un-exported structures fails whole.
fn ensure_complete(job: ExportJob) -> Result<ExportJob, ClientError> {
    if job.not_exported.is_empty() {
        return Ok(job);
    }
    let message = job
        .not_exported
        .iter()
        .find_map(|item| item.error_message.clone())
        .unwrap_or_else(|| "Unknown export error".to_string());
    warn!(
        domain_event_id = %job.domain_event_id,
        not_exported = job.not_exported.len(),
        %message,
        "export finished with errors"
    );
    Err(ClientError::PartialExportFailure {
        not_exported: job.not_exported,
        message,
    })
}

fn decode_text(bytes: Vec<u8>) -> Result<String, ClientError> {
    String::from_utf8(bytes)
        .map_err(|e| ClientError::MalformedResponse(format!("export is not UTF-8 text: {e}")))
}

fn parse_domain_event(domain_event_id: &str, body: &Value) -> Result<ExportJob, ClientError> {
    if !body.is_object() {
        return Err(ClientError::MalformedResponse(
            "domain event is not a JSON object".into(),
        ));
    }
    let state = DomainEventState::from_wire(body.get("state").and_then(Value::as_str));

    let files = body
        .pointer("/content/file_names")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(export_file).collect())
        .unwrap_or_default();
    let not_exported = body
        .pointer("/content/errors/not_exported")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    serde_json::from_value::<NotExported>(item.clone()).unwrap_or_else(|_| {
                        NotExported {
                            error_message: item.as_str().map(str::to_string),
                            ..NotExported::default()
                        }
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ExportJob {
        domain_event_id: domain_event_id.to_string(),
        state,
        files,
        not_exported,
    })
}

/// `file_names` entries are objects; a bare string is taken as the name.
fn export_file(entry: &Value) -> Option<ExportFile> {
    match entry {
        Value::String(name) => Some(ExportFile {
            file_name: Some(name.clone()),
            external_code: None,
        }),
        Value::Object(_) => serde_json::from_value(entry.clone()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tdec_core::Transform;

    #[test]
    fn pending_event() {
        let job = parse_domain_event("ev1", &json!({"state": "pending"})).unwrap();
        assert_eq!(job, ExportJob::pending("ev1"));
    }

    #[test]
    fn successful_event_lists_files() {
        let body = json!({
            "state": "success",
            "content": {"file_names": [{"file_name": "101.pdb", "external_code": "101"}]}
        });
        let job = parse_domain_event("ev1", &body).unwrap();
        assert_eq!(job.state, DomainEventState::Success);
        assert_eq!(job.download_stem(), Some("101"));
    }

    #[test]
    fn string_file_names_are_accepted() {
        let body = json!({"state": "success", "content": {"file_names": ["export.zip", 7]}});
        let job = parse_domain_event("ev2", &body).unwrap();
        assert_eq!(job.files.len(), 1);
        assert_eq!(job.download_stem(), Some("export"));
    }

    #[test]
    fn not_exported_escalates() {
        let body = json!({
            "state": "success",
            "content": {
                "file_names": [{"file_name": "a.zip"}],
                "errors": {"not_exported": [
                    {"structure_id": 9, "error_message": "structure locked"},
                    {"structure_id": 10}
                ]}
            }
        });
        let job = parse_domain_event("ev3", &body).unwrap();
        match ensure_complete(job) {
            Err(ClientError::PartialExportFailure { not_exported, message }) => {
                assert_eq!(not_exported.len(), 2);
                assert_eq!(message, "structure locked");
            }
            other => panic!("expected partial failure, got {other:?}"),
        }
    }

    #[test]
    fn not_exported_without_messages() {
        let mut job = ExportJob::pending("ev4");
        job.not_exported = vec![NotExported::default()];
        let err = ensure_complete(job).unwrap_err();
        assert!(err.to_string().contains("Unknown export error"));
    }

    #[test]
    fn matrix_entry_is_flat() {
        let request = TransformedExportRequest::new(101, "1ABC").with_transform(Transform::IDENTITY);
        let entry = matrix_entry(&request);
        assert_eq!(entry["structure_id"], 101);
        assert_eq!(entry["external_code"], "1ABC");
        assert_eq!(entry["transform"].as_array().map(Vec::len), Some(16));
        assert_eq!(entry["transform"][0], 1.0);
        assert_eq!(entry["transform"][1], 0.0);
    }
}
