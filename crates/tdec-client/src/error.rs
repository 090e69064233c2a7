//! Client error types.

use tdec_core::NotExported;
use thiserror::Error;

/// Everything that can go wrong talking to a 3decision server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No base URL or API key has been configured.
    #[error("3decision API is not configured (base URL and API key required)")]
    NotConfigured,

    /// Login or the single re-login after a 401/403 failed.
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),

    /// The server answered with a non-2xx, non-auth status.
    #[error("request failed ({status}): {message}")]
    RequestFailure {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        message: String,
    },

    /// The response body was not the JSON (or text) shape expected.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The remote job or domain event reported a failed state.
    #[error("job {job_id} failed on the server")]
    JobFailed { job_id: String },

    /// The attempt cap was reached without a terminal state.
    #[error("polling timed out after {attempts} attempts")]
    PollingTimeout { attempts: u32 },

    /// The export finished but listed structures it could not export.
    #[error("export incomplete, {} structure(s) not exported: {message}", not_exported.len())]
    PartialExportFailure {
        not_exported: Vec<NotExported>,
        /// First reported error message.
        message: String,
    },

    /// A ZIP export was unreadable or held no structure files.
    #[error("archive error: {0}")]
    ArchiveError(String),

    /// The caller cancelled the job.
    #[error("cancelled")]
    Cancelled,

    /// The arguments cannot form a valid request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The background task panicked or was aborted.
    #[error("background task aborted: {0}")]
    TaskAborted(String),

    /// Loading or saving settings failed.
    #[error(transparent)]
    Config(#[from] tdec_config::ConfigError),
}

impl ClientError {
    /// Failures a polling loop should ride out as a non-terminal attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::RequestFailure { .. } | Self::MalformedResponse(_)
        )
    }

    /// Failures the user resolves by (re)entering credentials.
    #[must_use]
    pub const fn needs_reconfiguration(&self) -> bool {
        matches!(self, Self::NotConfigured | Self::AuthenticationFailure(_))
    }
}
