//! Spinners for background jobs, fed by the job's progress channel.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tdec_client::{ClientError, JobProgress, JobTask};

use crate::ui;

pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

/// One-line description of a progress state.
#[must_use]
pub fn describe(progress: &JobProgress) -> String {
    match progress {
        JobProgress::Idle => "starting".to_string(),
        JobProgress::Submitted { job_id } => format!("submitted job {job_id}"),
        JobProgress::Polling {
            attempt,
            max_attempts,
            percent: Some(percent),
        } => format!("waiting for server ({percent}%, check {attempt}/{max_attempts})"),
        JobProgress::Polling {
            attempt,
            max_attempts,
            percent: None,
        } => format!("waiting for server (check {attempt}/{max_attempts})"),
        JobProgress::Resolving { structures } => format!("fetching details of {structures} structures"),
        JobProgress::Downloading { file_name } if file_name.is_empty() => "downloading".to_string(),
        JobProgress::Downloading { file_name } => format!("downloading {file_name}"),
        JobProgress::Unpacking => "unpacking archive".to_string(),
        JobProgress::Done => "done".to_string(),
    }
}

/// Drive `task` to completion behind a spinner; Ctrl-C cancels it.
pub async fn track<T: Send + 'static>(task: JobTask<T>, label: &str) -> Result<T, ClientError> {
    let spinner = Progress::spinner(label);
    let mut updates = task.progress();
    let cancel = task.cancel_token();
    let join = task.join();
    tokio::pin!(join);

    let mut watching = true;
    let result = loop {
        tokio::select! {
            result = &mut join => break result,
            changed = updates.changed(), if watching => {
                if changed.is_ok() {
                    let text = describe(&updates.borrow_and_update());
                    spinner.set_message(&format!("{label}: {text}"));
                } else {
                    watching = false;
                }
            }
            interrupted = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
                if interrupted.is_ok() {
                    tracing::warn!("interrupted; cancelling");
                    cancel.cancel();
                }
            }
        }
    };

    match &result {
        Ok(_) => spinner.finish_clear(),
        Err(error) => spinner.finish_err(&format!("{label}: {error}")),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn describes_polling_with_and_without_percent() {
        assert_eq!(
            describe(&JobProgress::Polling {
                attempt: 2,
                max_attempts: 60,
                percent: Some(40)
            }),
            "waiting for server (40%, check 2/60)"
        );
        assert_eq!(
            describe(&JobProgress::Polling {
                attempt: 1,
                max_attempts: 30,
                percent: None
            }),
            "waiting for server (check 1/30)"
        );
    }

    #[test]
    fn describes_download_without_name() {
        assert_eq!(
            describe(&JobProgress::Downloading {
                file_name: String::new()
            }),
            "downloading"
        );
    }

    #[tokio::test]
    async fn track_returns_the_job_result() {
        let task = JobTask::spawn(|ctx| async move {
            ctx.report(JobProgress::Resolving { structures: 3 });
            Ok::<_, ClientError>(3_usize)
        });
        assert_eq!(track(task, "test").await.unwrap(), 3);
    }
}
