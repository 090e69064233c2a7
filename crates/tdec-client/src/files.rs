//! Supplementary files attached to a structure.

use reqwest::StatusCode;
use serde_json::Value;
use tdec_core::{AssociatedFile, FileRef};
use tracing::{debug, warn};

use crate::DecisionClient;
use crate::error::ClientError;
use crate::http::{check_response, read_json};
use crate::request::ApiRequest;
use crate::shapes::entries;

const FILE_ENVELOPES: &[&str] = &["files", "results"];

impl DecisionClient {
    /// `GET /structures/{external_code}/associated-files`.
    ///
    /// A 404 means the structure has no files and yields an empty list.
    ///
    /// # Errors
    ///
    /// Connection errors and non-404 failure statuses.
    pub async fn list_associated_files(
        &self,
        external_code: &str,
    ) -> Result<Vec<AssociatedFile>, ClientError> {
        self.require_connection().await?;
        let request = ApiRequest::get(format!(
            "/structures/{}/associated-files",
            urlencoding::encode(external_code.trim())
        ))
        .header("Accept", "application/json")
        .describe("associated files request");

        let response = self.execute(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(external_code, "no associated files");
            return Ok(Vec::new());
        }
        let body = read_json(check_response(response).await?).await?;

        let Some(raw) = entries(body, FILE_ENVELOPES) else {
            warn!(external_code, "unexpected associated files response shape");
            return Ok(Vec::new());
        };
        let files: Vec<AssociatedFile> = raw.into_iter().filter_map(AssociatedFile::from_value).collect();
        debug!(external_code, files = files.len(), "associated files listed");
        Ok(files)
    }

    /// Fetch a file by id (`GET /structures/file/{id}/download`) or by URL.
    ///
    /// # Errors
    ///
    /// Connection errors and failure statuses.
    pub async fn download_file(&self, file: &FileRef) -> Result<Vec<u8>, ClientError> {
        self.require_connection().await?;
        let request = match file {
            FileRef::Id(id) => ApiRequest::get(format!(
                "/structures/file/{}/download",
                urlencoding::encode(id)
            ))
            .describe("file download"),
            FileRef::Url(url) => ApiRequest::get(url.clone()).describe("direct URL download"),
        };
        let response = check_response(self.execute(request).await?).await?;
        let bytes = response.bytes().await?;
        debug!(?file, size = bytes.len(), "file downloaded");
        Ok(bytes.to_vec())
    }

    /// Download the file a listed descriptor points at.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidInput`] when the descriptor has neither an id
    /// nor a URL, otherwise as [`DecisionClient::download_file`].
    pub async fn download_associated_file(
        &self,
        file: &AssociatedFile,
    ) -> Result<Vec<u8>, ClientError> {
        let Some(file_ref) = file.file_ref() else {
            return Err(ClientError::InvalidInput(format!(
                "file descriptor has no id or download URL: {}",
                Value::Object(file.metadata.clone())
            )));
        };
        self.download_file(&file_ref).await
    }
}
