//! Timeout wrapper for store calls.

use std::future::Future;
use std::time::Duration;

use moqi_config::PipelineConfig;
use moqi_core::errors::StoreError;

use crate::error::PipelineError;

/// Applies the configured timeout to every store call and tags failures with
/// the operation name.
#[derive(Debug, Clone, Copy)]
pub struct RequestGuard {
    timeout: Duration,
}

impl RequestGuard {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[must_use]
    pub const fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.request_timeout())
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Await `fut`, failing with `PipelineError::Timeout` if it does not finish in time.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Store` when the call fails and
    /// `PipelineError::Timeout` when it does not complete.
    pub async fn call<T, F>(&self, operation: &'static str, fut: F) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(PipelineError::Store { operation, source }),
            Err(_) => {
                tracing::warn!(operation, timeout_secs = self.timeout.as_secs(), "store call timed out");
                Err(PipelineError::Timeout {
                    operation,
                    after: self.timeout,
                })
            }
        }
    }
}

impl Default for RequestGuard {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_success() {
        let guard = RequestGuard::default();
        let value = guard.call("noop", async { Ok::<_, StoreError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn tags_store_errors_with_operation() {
        let guard = RequestGuard::default();
        let err = guard
            .call("list_startups", async {
                Err::<(), _>(StoreError::Network("reset".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Store { operation: "list_startups", .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_call_times_out() {
        let guard = RequestGuard::new(Duration::from_secs(10));
        let err = guard
            .call("list_startups", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Timeout { .. }));
        assert!(err.is_retryable());
    }
}
