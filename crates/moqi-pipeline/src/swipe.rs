//! Swipe state machine.
//!
//! ```text
//! AwaitingDecision(0) → AwaitingDecision(1) → … → AwaitingDecision(N-1) → Done
//! ```
//!
//! Each decision advances the index by one regardless of like/dislike. The
//! machine itself is pure; [`persist_decision`] writes the interaction row and
//! the session records the returned id before advancing.

use serde::Serialize;

use moqi_core::entities::{Interaction, NewInteraction, Startup};
use moqi_core::enums::Decision;
use moqi_core::store::MatchStore;

use crate::error::PipelineError;
use crate::guard::RequestGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum SwipeState {
    AwaitingDecision(usize),
    Done,
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionRecord {
    pub startup_id: String,
    pub decision: Decision,
    /// Row id, or `None` while the write is still pending.
    pub interaction_id: Option<String>,
}

/// Where the pipeline goes once every candidate has been decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Straight to results, nothing to allocate.
    NoLikes,
    /// The single liked startup receives the whole budget.
    SingleLike(Startup),
    /// Feedback and allocation stages follow.
    MultipleLikes(Vec<Startup>),
}

#[derive(Debug, Clone, Default)]
pub struct SwipeMachine {
    candidates: Vec<Startup>,
    index: usize,
    liked: Vec<Startup>,
    records: Vec<DecisionRecord>,
}

impl SwipeMachine {
    #[must_use]
    pub const fn new(candidates: Vec<Startup>) -> Self {
        Self {
            candidates,
            index: 0,
            liked: Vec::new(),
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SwipeState {
        if self.is_done() {
            SwipeState::Done
        } else {
            SwipeState::AwaitingDecision(self.index)
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.index >= self.candidates.len()
    }

    /// The candidate awaiting a decision.
    #[must_use]
    pub fn current(&self) -> Option<&Startup> {
        self.candidates.get(self.index)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.candidates.len().saturating_sub(self.index)
    }

    #[must_use]
    pub fn candidates(&self) -> &[Startup] {
        &self.candidates
    }

    /// Liked startups in encounter order.
    #[must_use]
    pub fn liked(&self) -> &[Startup] {
        &self.liked
    }

    #[must_use]
    pub fn records(&self) -> &[DecisionRecord] {
        &self.records
    }

    #[must_use]
    pub fn is_liked(&self, startup_id: &str) -> bool {
        self.liked.iter().any(|s| s.id == startup_id)
    }

    /// Whether `startup_id` was decided as a dislike.
    #[must_use]
    pub fn is_disliked(&self, startup_id: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.startup_id == startup_id && r.decision == Decision::Dislike)
    }

    #[must_use]
    pub fn interaction_id(&self, startup_id: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.startup_id == startup_id)
            .and_then(|r| r.interaction_id.as_deref())
    }

    /// Attach a row id learned after the fact. Returns false if the startup
    /// has no recorded decision.
    pub fn set_interaction_id(&mut self, startup_id: &str, interaction_id: String) -> bool {
        match self.records.iter_mut().find(|r| r.startup_id == startup_id) {
            Some(record) => {
                record.interaction_id = Some(interaction_id);
                true
            }
            None => false,
        }
    }

    /// Record a decision on the current candidate and advance.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::SwipeFinished` when no candidate is left.
    pub fn record(
        &mut self,
        decision: Decision,
        interaction_id: Option<String>,
    ) -> Result<&DecisionRecord, PipelineError> {
        let startup = self
            .candidates
            .get(self.index)
            .cloned()
            .ok_or(PipelineError::SwipeFinished)?;

        self.records.push(DecisionRecord {
            startup_id: startup.id.clone(),
            decision,
            interaction_id,
        });
        if decision.is_like() {
            self.liked.push(startup);
        }
        self.index += 1;

        tracing::debug!(index = self.index, total = self.candidates.len(), %decision, "recorded decision");
        self.records.last().ok_or(PipelineError::SwipeFinished)
    }

    /// The branch to take after the last decision, or `None` while swiping.
    #[must_use]
    pub fn outcome(&self) -> Option<SwipeOutcome> {
        if !self.is_done() {
            return None;
        }
        Some(match self.liked.as_slice() {
            [] => SwipeOutcome::NoLikes,
            [only] => SwipeOutcome::SingleLike(only.clone()),
            many => SwipeOutcome::MultipleLikes(many.to_vec()),
        })
    }
}

/// Write the swipe-time interaction row for one decision.
///
/// Uses the idempotent upsert so a repeated submit for the same pair reuses
/// the existing row.
///
/// # Errors
///
/// Propagates store failures and timeouts.
pub async fn persist_decision<S: MatchStore + ?Sized>(
    store: &S,
    guard: &RequestGuard,
    swiper_id: &str,
    startup_id: &str,
    decision: Decision,
) -> Result<Interaction, PipelineError> {
    let new = NewInteraction::from_decision(swiper_id, startup_id, decision);
    guard
        .call("upsert_interaction", store.upsert_interaction(&new))
        .await
}
