use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resolve::ResolutionPolicy;
use crate::validate::ValidationConfig;

/// Pipeline settings, deserialized from the embedding application's
/// configuration. Every field has a usable default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub resolution_policy: ResolutionPolicy,

    pub validation: ValidationConfig,

    /// Maximum genomes processed concurrently
    pub worker_pool_size: usize,

    /// Per-genome job timeout, in seconds
    pub job_timeout_secs: u64,

    /// Retries for transient collaborator failures. Validation failures
    /// are never retried.
    pub max_retries: u32,

    /// Fixed delay between retry attempts, in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resolution_policy: ResolutionPolicy::Automatic,
            validation: ValidationConfig::default(),
            worker_pool_size: 4,
            job_timeout_secs: 3600,
            max_retries: 3,
            retry_delay_ms: 5000,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
