//! Pipeline error types.

use std::time::Duration;

use moqi_core::enums::Stage;
use moqi_core::errors::StoreError;
use thiserror::Error;

/// Errors from pipeline operations.
///
/// None of these are fatal to the session: in-memory state is left intact so
/// the caller can retry the same operation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A store call failed.
    #[error("{operation} failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// A store call did not complete within the configured timeout.
    #[error("{operation} timed out after {}s", after.as_secs())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Coins do not add up to the budget yet.
    #[error("Allocation incomplete: {remaining} coins left to allocate")]
    AllocationIncomplete { remaining: u32 },

    /// Input failed validation; never sent to the store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The stage machine does not allow this move.
    #[error("Invalid stage transition: from {from} to {to}")]
    InvalidTransition { from: Stage, to: Stage },

    /// The operation belongs to a different stage.
    #[error("Operation requires stage {expected}, session is in {actual}")]
    WrongStage { expected: Stage, actual: Stage },

    /// A decision was submitted after the last candidate.
    #[error("All candidates have been swiped")]
    SwipeFinished,

    /// The startup is not part of the current step (not liked, not disliked, or unknown).
    #[error("Startup {0} is not part of this step")]
    UnknownStartup(String),
}

impl PipelineError {
    /// Whether the caller should offer a retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Store { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_network_failures_are_retryable() {
        assert!(
            PipelineError::Timeout {
                operation: "list_startups",
                after: Duration::from_secs(10)
            }
            .is_retryable()
        );
        assert!(
            PipelineError::Store {
                operation: "upsert_interaction",
                source: StoreError::Network("connection reset".into())
            }
            .is_retryable()
        );
    }

    #[test]
    fn validation_is_not_retryable() {
        assert!(!PipelineError::AllocationIncomplete { remaining: 20 }.is_retryable());
        assert!(!PipelineError::SwipeFinished.is_retryable());
    }

    #[test]
    fn incomplete_allocation_names_remaining() {
        let msg = PipelineError::AllocationIncomplete { remaining: 20 }.to_string();
        assert!(msg.contains("20 coins left"));
    }
}
