//! Swipe pipeline configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default timeout for a single store call, in seconds.
const fn default_request_timeout_secs() -> u64 {
    10
}

/// Reconcile with the store when entering feedback and allocation.
const fn default_reconcile_on_stage_entry() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Timeout applied to every store call made by the pipeline.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Reload persisted interactions and retry pending writes on stage entry.
    #[serde(default = "default_reconcile_on_stage_entry")]
    pub reconcile_on_stage_entry: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            reconcile_on_stage_entry: default_reconcile_on_stage_entry(),
        }
    }
}

impl PipelineConfig {
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.request_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
