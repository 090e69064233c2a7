//! Job polling cadence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_interval_ms() -> u64 {
    2000
}

const fn default_export_max_attempts() -> u32 {
    30
}

const fn default_search_max_attempts() -> u32 {
    60
}

const fn default_job_status_max_attempts() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Pause between two status checks, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Domain-event checks before an export times out.
    #[serde(default = "default_export_max_attempts")]
    pub export_max_attempts: u32,

    /// Queue checks before a search times out.
    #[serde(default = "default_search_max_attempts")]
    pub search_max_attempts: u32,

    /// Queue checks for an already-submitted job.
    #[serde(default = "default_job_status_max_attempts")]
    pub job_status_max_attempts: u32,
}

impl PollingConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            export_max_attempts: default_export_max_attempts(),
            search_max_attempts: default_search_max_attempts(),
            job_status_max_attempts: default_job_status_max_attempts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = PollingConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(2));
        assert_eq!(config.export_max_attempts, 30);
        assert_eq!(config.search_max_attempts, 60);
        assert_eq!(config.job_status_max_attempts, 30);
    }
}
