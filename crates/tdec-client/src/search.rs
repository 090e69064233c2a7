//! Structure search: submit, poll the queue job, resolve the hits.

use serde_json::Value;
use tdec_core::serde_helpers::{value_as_i64, value_as_string};
use tdec_core::{JobState, SearchJob, StructureRecord};
use tracing::{debug, warn};

use crate::DecisionClient;
use crate::error::ClientError;
use crate::http::{check_response, read_json};
use crate::poller::{PollPolicy, PollStep, poll_until};
use crate::request::ApiRequest;
use crate::shapes::id_list;
use crate::task::{JobContext, JobProgress};

/// Queue the search endpoint places its jobs on.
pub const SEARCH_QUEUE: &str = "basicSearch";

/// What the search endpoint did with a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSubmission {
    /// A queue job to poll.
    Queued(SearchJob),
    /// The server answered synchronously with these structure ids.
    Direct(Vec<i64>),
}

impl DecisionClient {
    /// `GET /search/{query}`.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidInput`] for a blank query, connection errors from
    /// login, or [`ClientError::RequestFailure`]/[`ClientError::MalformedResponse`].
    pub async fn submit_search(&self, query: &str) -> Result<SearchSubmission, ClientError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::InvalidInput("search query is empty".into()));
        }
        self.require_connection().await?;

        let request = ApiRequest::get(format!("/search/{}", urlencoding::encode(query)))
            .describe("search submission");
        let body = read_json(check_response(self.execute(request).await?).await?).await?;
        let submission = parse_submission(&body);
        debug!(query, ?submission, "search submitted");
        Ok(submission)
    }

    /// One check of `GET /queues/{queue}/jobs/{job_id}`.
    ///
    /// # Errors
    ///
    /// Connection, status and decoding errors.
    pub async fn job_status(&self, queue: &str, job_id: &str) -> Result<SearchJob, ClientError> {
        self.require_connection().await?;
        let request = ApiRequest::get(format!(
            "/queues/{}/jobs/{}",
            urlencoding::encode(queue),
            urlencoding::encode(job_id)
        ))
        .describe("job status check");
        let body = read_json(check_response(self.execute(request).await?).await?).await?;
        parse_job_status(queue, job_id, &body)
    }

    /// Poll an already-submitted job to completion (job-status attempt cap).
    ///
    /// # Errors
    ///
    /// [`ClientError::JobFailed`], [`ClientError::PollingTimeout`],
    /// [`ClientError::Cancelled`], or a non-transient request error.
    pub async fn wait_for_job(
        &self,
        job: &SearchJob,
        ctx: &JobContext,
    ) -> Result<SearchJob, ClientError> {
        let policy = self.poll_policy(|p| p.job_status_max_attempts);
        self.poll_job(job, policy, ctx).await
    }

    /// Search, wait for the job (search attempt cap) and resolve every hit.
    ///
    /// A completed job without hits yields an empty list.
    ///
    /// # Errors
    ///
    /// See [`DecisionClient::submit_search`] and [`DecisionClient::wait_for_job`].
    pub async fn search(
        &self,
        query: &str,
        ctx: &JobContext,
    ) -> Result<Vec<StructureRecord>, ClientError> {
        ctx.check_cancelled()?;
        let ids = match self.submit_search(query).await? {
            SearchSubmission::Direct(ids) => ids,
            SearchSubmission::Queued(job) => {
                ctx.report(JobProgress::Submitted {
                    job_id: job.id.clone(),
                });
                let policy = self.poll_policy(|p| p.search_max_attempts);
                self.poll_job(&job, policy, ctx).await?.result_structure_ids
            }
        };

        if ids.is_empty() {
            debug!(query, "search completed without results");
            ctx.report(JobProgress::Done);
            return Ok(Vec::new());
        }

        ctx.check_cancelled()?;
        ctx.report(JobProgress::Resolving {
            structures: ids.len(),
        });
        let records = self.resolve(&ids).await;
        debug!(query, hits = ids.len(), records = records.len(), "search resolved");
        ctx.report(JobProgress::Done);
        Ok(records)
    }

    async fn poll_job(
        &self,
        job: &SearchJob,
        policy: PollPolicy,
        ctx: &JobContext,
    ) -> Result<SearchJob, ClientError> {
        poll_until(policy, ctx, |_| self.probe_job(job)).await
    }

    async fn probe_job(&self, job: &SearchJob) -> Result<PollStep<SearchJob>, ClientError> {
        match self.job_status(&job.queue_name, &job.id).await {
            Ok(status) => match status.state {
                JobState::Completed => Ok(PollStep::Ready(status)),
                JobState::Failed => Err(ClientError::JobFailed {
                    job_id: job.id.clone(),
                }),
                state => Ok(PollStep::Pending(state.progress())),
            },
            Err(error) if error.is_transient() => {
                warn!(job_id = %job.id, %error, "job status check failed; will retry");
                Ok(PollStep::Pending(None))
            }
            Err(error) => Err(error),
        }
    }
}

/// Decide between a queued job and a synchronous answer.
fn parse_submission(body: &Value) -> SearchSubmission {
    if let Some(id) = body.get("id").and_then(value_as_string) {
        return SearchSubmission::Queued(SearchJob::submitted(id, SEARCH_QUEUE));
    }
    let ids = id_list(body)
        .or_else(|| body.pointer("/returnvalue/STRUCTURE_ID").and_then(id_list))
        .or_else(|| body.get("STRUCTURE_ID").and_then(id_list))
        .unwrap_or_default();
    SearchSubmission::Direct(ids)
}

/// Map a queue job body onto [`SearchJob`].
///
/// Terminal when `progress == 100`, or when the id list is present and empty
/// while `progress > 0`. `status == "failed"` wins over both.
fn parse_job_status(queue: &str, job_id: &str, body: &Value) -> Result<SearchJob, ClientError> {
    if !body.is_object() {
        return Err(ClientError::MalformedResponse(
            "job status is not a JSON object".into(),
        ));
    }

    let progress = body
        .get("progress")
        .and_then(value_as_i64)
        .unwrap_or(0)
        .clamp(0, 100);
    let progress = u8::try_from(progress).unwrap_or(100);
    let failed = body
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| status.eq_ignore_ascii_case("failed"));
    let ids = body.pointer("/returnvalue/STRUCTURE_ID").and_then(id_list);

    let state = if failed {
        JobState::Failed
    } else if progress == 100 || (progress > 0 && ids.as_ref().is_some_and(Vec::is_empty)) {
        JobState::Completed
    } else if progress > 0 {
        JobState::Running { progress }
    } else {
        JobState::Submitted
    };

    Ok(SearchJob {
        id: job_id.to_string(),
        queue_name: queue.to_string(),
        state,
        result_structure_ids: if state == JobState::Completed {
            ids.unwrap_or_default()
        } else {
            Vec::new()
        },
    })
}
