//! One swiper's pass through the pipeline.
//!
//! ```text
//! Dashboard → Swiping ─┬─ 0 liked ──────────────────────────→ Results
//!                      ├─ 1 liked (auto 100) ───────────────→ Results
//!                      └─ ≥2 liked → Feedback ⇄ Allocation ─→ Results
//! ```
//!
//! Every store call goes through the session's [`RequestGuard`]. Write
//! failures never abort the session: the in-memory state moves on and the
//! write is queued as a [`PendingWrite`] until [`PipelineSession::reconcile`]
//! succeeds in flushing it.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use moqi_config::PipelineConfig;
use moqi_core::entities::{InteractionFilter, InteractionPatch, NewInteraction, Startup};
use moqi_core::enums::{Decision, FeedbackPreference, Stage};
use moqi_core::store::MatchStore;

use crate::allocation::{
    AdjustOutcome, AllocationEngine, AllocationWrite, BUDGET, FlushReport, flush_writes,
    planned_writes,
};
use crate::candidates::load_candidates;
use crate::error::PipelineError;
use crate::feedback::FeedbackEditor;
use crate::guard::RequestGuard;
use crate::results::{ResultInputs, Results, assemble};
use crate::swipe::{SwipeMachine, SwipeOutcome, persist_decision};

/// A write the store has not acknowledged yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingWrite {
    /// Swipe-time row; replayed through the idempotent upsert.
    Create {
        new: NewInteraction,
        /// Edits folded in after the decision. Only these are replayed if
        /// the row turns out to exist already.
        changes: InteractionPatch,
    },
    /// Change to a row identified by its startup.
    Update {
        startup_id: String,
        patch: InteractionPatch,
    },
}

impl PendingWrite {
    #[must_use]
    pub fn startup_id(&self) -> &str {
        match self {
            Self::Create { new, .. } => &new.startup_id,
            Self::Update { startup_id, .. } => startup_id,
        }
    }
}

/// What happened on one `decide` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionReport {
    pub startup_id: String,
    pub decision: Decision,
    pub interaction_id: Option<String>,
    /// Set when the row write failed and was queued.
    pub write_error: Option<String>,
    /// Stage after the decision.
    pub stage: Stage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Row ids learned from the store for startups decided without one.
    pub ids_recovered: usize,
    pub flushed: usize,
    pub still_pending: usize,
}

pub struct PipelineSession<'a, S: MatchStore + ?Sized> {
    store: &'a S,
    guard: RequestGuard,
    swiper_id: String,
    reconcile_on_entry: bool,
    stage: Stage,
    swipe: SwipeMachine,
    feedback: FeedbackEditor,
    allocation: AllocationEngine,
    disliked_feedback: HashMap<String, FeedbackPreference>,
    pending: Vec<PendingWrite>,
}

impl<'a, S: MatchStore + ?Sized> PipelineSession<'a, S> {
    #[must_use]
    pub fn new(store: &'a S, swiper_id: impl Into<String>, config: &PipelineConfig) -> Self {
        Self {
            store,
            guard: RequestGuard::from_config(config),
            swiper_id: swiper_id.into(),
            reconcile_on_entry: config.reconcile_on_stage_entry,
            stage: Stage::Dashboard,
            swipe: SwipeMachine::default(),
            feedback: FeedbackEditor::default(),
            allocation: AllocationEngine::default(),
            disliked_feedback: HashMap::new(),
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn swiper_id(&self) -> &str {
        &self.swiper_id
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn pending_writes(&self) -> &[PendingWrite] {
        &self.pending
    }

    #[must_use]
    pub const fn swipe(&self) -> &SwipeMachine {
        &self.swipe
    }

    #[must_use]
    pub const fn feedback(&self) -> &FeedbackEditor {
        &self.feedback
    }

    #[must_use]
    pub const fn allocation(&self) -> &AllocationEngine {
        &self.allocation
    }

    /// The startup awaiting a decision, while swiping.
    #[must_use]
    pub fn current(&self) -> Option<&Startup> {
        if self.stage == Stage::Swiping {
            self.swipe.current()
        } else {
            None
        }
    }

    /// Leave the dashboard and load a fresh candidate set.
    ///
    /// Queued writes are retried first so their startups count as swiped.
    /// Startups whose swipe-time row is still queued are not offered again.
    /// An empty candidate set goes straight to results.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` outside the dashboard; store failures and timeouts
    /// leave the session on the dashboard.
    pub async fn start(&mut self) -> Result<usize, PipelineError> {
        self.check_transition(Stage::Swiping)?;
        if !self.pending.is_empty() {
            self.reconcile().await?;
        }

        let mut candidates = load_candidates(self.store, &self.guard, &self.swiper_id).await?;
        let queued: HashSet<&str> = self
            .pending
            .iter()
            .filter(|w| matches!(w, PendingWrite::Create { .. }))
            .map(PendingWrite::startup_id)
            .collect();
        candidates.retain(|s| !queued.contains(s.id.as_str()));
        let count = candidates.len();

        self.reset_round();
        self.swipe = SwipeMachine::new(candidates);
        self.transition(Stage::Swiping)?;
        if self.swipe.is_done() {
            self.finish_swiping().await?;
        }
        Ok(count)
    }

    /// Decide on the current candidate.
    ///
    /// The row write is awaited before advancing. If it fails the decision
    /// still counts, the write is queued, and the report carries the error.
    ///
    /// # Errors
    ///
    /// `WrongStage` outside swiping, `SwipeFinished` when nothing is left.
    pub async fn decide(&mut self, decision: Decision) -> Result<DecisionReport, PipelineError> {
        self.expect_stage(Stage::Swiping)?;
        let startup_id = self
            .swipe
            .current()
            .map(|s| s.id.clone())
            .ok_or(PipelineError::SwipeFinished)?;

        let (interaction_id, write_error) = match persist_decision(
            self.store,
            &self.guard,
            &self.swiper_id,
            &startup_id,
            decision,
        )
        .await
        {
            Ok(row) => (Some(row.id), None),
            Err(error) => {
                tracing::warn!(%startup_id, %decision, %error, "decision write failed, queued");
                self.pending.push(PendingWrite::Create {
                    new: NewInteraction::from_decision(
                        self.swiper_id.clone(),
                        startup_id.clone(),
                        decision,
                    ),
                    changes: InteractionPatch::new(),
                });
                (None, Some(error.to_string()))
            }
        };

        self.swipe.record(decision, interaction_id.clone())?;
        if self.swipe.is_done() {
            self.finish_swiping().await?;
        }

        Ok(DecisionReport {
            startup_id,
            decision,
            interaction_id,
            write_error,
            stage: self.stage,
        })
    }

    /// Override the feedback preference of a liked startup.
    ///
    /// # Errors
    ///
    /// `WrongStage` outside feedback, `UnknownStartup` if it was not liked.
    pub fn set_feedback(
        &mut self,
        startup_id: &str,
        preference: FeedbackPreference,
    ) -> Result<(), PipelineError> {
        self.expect_stage(Stage::Feedback)?;
        self.feedback.set(startup_id, preference)
    }

    /// Move on to allocation. Allocations made before going back are kept.
    ///
    /// # Errors
    ///
    /// `WrongStage` outside feedback.
    pub async fn finish_feedback(&mut self) -> Result<(), PipelineError> {
        self.expect_stage(Stage::Feedback)?;
        if !self.feedback.is_complete() {
            return Err(PipelineError::Validation(
                "every liked startup needs a feedback preference".into(),
            ));
        }
        self.transition(Stage::Allocation)?;
        self.reconcile_on_stage_entry().await;
        Ok(())
    }

    /// Return from allocation to feedback.
    ///
    /// # Errors
    ///
    /// `WrongStage` outside allocation.
    pub fn back_to_feedback(&mut self) -> Result<(), PipelineError> {
        self.expect_stage(Stage::Allocation)?;
        self.transition(Stage::Feedback)
    }

    /// Step one startup's allocation by `±10`.
    ///
    /// # Errors
    ///
    /// `WrongStage` outside allocation, plus the engine's validation errors.
    pub fn adjust_allocation(
        &mut self,
        startup_id: &str,
        delta: i32,
    ) -> Result<AdjustOutcome, PipelineError> {
        self.expect_stage(Stage::Allocation)?;
        self.allocation.adjust(startup_id, delta)
    }

    /// Set one startup's allocation directly.
    ///
    /// # Errors
    ///
    /// `WrongStage` outside allocation, plus the engine's validation errors.
    pub fn set_allocation(
        &mut self,
        startup_id: &str,
        value: u32,
    ) -> Result<AdjustOutcome, PipelineError> {
        self.expect_stage(Stage::Allocation)?;
        self.allocation.set(startup_id, value)
    }

    /// Write allocations and preferences, then show results.
    ///
    /// Failed writes are queued and listed in the report; the session still
    /// moves to results.
    ///
    /// # Errors
    ///
    /// `WrongStage` outside allocation, `AllocationIncomplete` until the
    /// whole budget is placed. Nothing is written in either case.
    pub async fn complete_allocation(&mut self) -> Result<FlushReport, PipelineError> {
        self.expect_stage(Stage::Allocation)?;
        self.allocation.ensure_complete()?;

        let writes = planned_writes(&self.allocation, self.feedback.preferences());
        let report = self.flush(&writes).await;
        self.transition(Stage::Results)?;
        Ok(report)
    }

    /// Ranked summary of this round.
    ///
    /// # Errors
    ///
    /// `WrongStage` before the round is over.
    pub fn results(&self) -> Result<Results, PipelineError> {
        self.expect_stage(Stage::Results)?;
        let swipe = &self.swipe;
        let is_liked = |id: &str| swipe.is_liked(id);
        Ok(assemble(&ResultInputs {
            candidates: swipe.candidates(),
            is_liked: &is_liked,
            allocations: self.allocation.allocations(),
            liked_feedback: self.feedback.preferences(),
            disliked_feedback: &self.disliked_feedback,
        }))
    }

    /// Change the feedback preference of a disliked startup from the results
    /// screen. Returns whether the store acknowledged the change; otherwise it
    /// is queued.
    ///
    /// # Errors
    ///
    /// `WrongStage` outside results, `UnknownStartup` if it was not disliked.
    pub async fn set_disliked_feedback(
        &mut self,
        startup_id: &str,
        preference: FeedbackPreference,
    ) -> Result<bool, PipelineError> {
        self.expect_stage(Stage::Results)?;
        if !self.swipe.is_disliked(startup_id) {
            return Err(PipelineError::UnknownStartup(startup_id.to_string()));
        }
        self.disliked_feedback.insert(startup_id.to_string(), preference);

        let patch = InteractionPatch::new().feedback_preference(preference);
        let Some(id) = self.swipe.interaction_id(startup_id).map(str::to_owned) else {
            self.queue_update(startup_id, patch);
            return Ok(false);
        };
        match self
            .guard
            .call("update_interaction", self.store.update_interaction(&id, &patch))
            .await
        {
            Ok(()) => {
                self.note_applied(startup_id, patch);
                Ok(true)
            }
            Err(error) => {
                tracing::warn!(startup_id, %error, "disliked feedback write failed, queued");
                self.queue_update(startup_id, patch);
                Ok(false)
            }
        }
    }

    /// Bring the session in line with the store: learn row ids for decisions
    /// made without one, then retry every queued write. A queued create whose
    /// row already exists is not replayed; only the edits folded into it are.
    ///
    /// # Errors
    ///
    /// Fails only if the swiper's rows cannot be listed. Individual retries
    /// that fail stay queued.
    pub async fn reconcile(&mut self) -> Result<ReconcileReport, PipelineError> {
        let rows = self
            .guard
            .call(
                "list_interactions",
                self.store
                    .list_interactions(&InteractionFilter::Swiper(self.swiper_id.clone())),
            )
            .await?;

        let mut report = ReconcileReport::default();
        for row in &rows {
            if self.swipe.interaction_id(&row.startup_id).is_none()
                && self.swipe.set_interaction_id(&row.startup_id, row.id.clone())
            {
                report.ids_recovered += 1;
            }
        }

        for write in std::mem::take(&mut self.pending) {
            let write = match write {
                PendingWrite::Create { new, changes }
                    if rows.iter().any(|r| r.startup_id == new.startup_id) =>
                {
                    if changes.is_empty() {
                        report.flushed += 1;
                        continue;
                    }
                    PendingWrite::Update {
                        startup_id: new.startup_id,
                        patch: changes,
                    }
                }
                other => other,
            };
            let result = match &write {
                PendingWrite::Create { new, .. } => self
                    .guard
                    .call("upsert_interaction", self.store.upsert_interaction(new))
                    .await
                    .map(|row| {
                        self.swipe.set_interaction_id(&row.startup_id, row.id);
                    }),
                PendingWrite::Update { startup_id, patch } => {
                    let id = self
                        .swipe
                        .interaction_id(startup_id)
                        .map(str::to_owned)
                        .or_else(|| {
                            rows.iter()
                                .find(|r| r.startup_id == *startup_id)
                                .map(|r| r.id.clone())
                        });
                    match id {
                        Some(id) => {
                            self.guard
                                .call("update_interaction", self.store.update_interaction(&id, patch))
                                .await
                        }
                        None => Err(PipelineError::UnknownStartup(startup_id.clone())),
                    }
                }
            };
            match result {
                Ok(()) => report.flushed += 1,
                Err(error) => {
                    tracing::warn!(startup_id = write.startup_id(), %error, "queued write retry failed");
                    self.pending.push(write);
                    report.still_pending += 1;
                }
            }
        }

        tracing::info!(
            swiper_id = %self.swiper_id,
            ids_recovered = report.ids_recovered,
            flushed = report.flushed,
            still_pending = report.still_pending,
            "reconciled session"
        );
        Ok(report)
    }

    /// Back to the dashboard. Round state is discarded; queued writes are kept.
    ///
    /// # Errors
    ///
    /// Never fails from a non-dashboard stage; calling it on the dashboard is
    /// a no-op.
    pub fn restart(&mut self) -> Result<(), PipelineError> {
        if self.stage == Stage::Dashboard {
            return Ok(());
        }
        self.transition(Stage::Dashboard)?;
        self.reset_round();
        Ok(())
    }

    async fn finish_swiping(&mut self) -> Result<(), PipelineError> {
        let Some(outcome) = self.swipe.outcome() else {
            return Ok(());
        };
        match outcome {
            SwipeOutcome::NoLikes => self.transition(Stage::Results),
            SwipeOutcome::SingleLike(startup) => {
                let mut engine = AllocationEngine::new([startup.id.clone()]);
                engine.set(&startup.id, BUDGET)?;
                self.allocation = engine;
                self.feedback = FeedbackEditor::seeded(std::slice::from_ref(&startup));

                let write = AllocationWrite {
                    startup_id: startup.id.clone(),
                    coins: BUDGET,
                    feedback_preference: FeedbackPreference::LIKED_DEFAULT,
                };
                self.flush(std::slice::from_ref(&write)).await;
                self.transition(Stage::Results)
            }
            SwipeOutcome::MultipleLikes(liked) => {
                self.feedback = FeedbackEditor::seeded(&liked);
                self.allocation = AllocationEngine::new(liked.into_iter().map(|s| s.id));
                self.transition(Stage::Feedback)?;
                self.reconcile_on_stage_entry().await;
                Ok(())
            }
        }
    }

    async fn flush(&mut self, writes: &[AllocationWrite]) -> FlushReport {
        let swipe = &self.swipe;
        let report = flush_writes(self.store, &self.guard, writes, |id| {
            swipe.interaction_id(id).map(str::to_owned)
        })
        .await;
        for write in writes {
            if report.written.contains(&write.startup_id) {
                self.note_applied(&write.startup_id, write.patch());
            } else {
                self.queue_update(&write.startup_id, write.patch());
            }
        }
        report
    }

    /// Keep a queued create in step with an update the store already applied.
    fn note_applied(&mut self, startup_id: &str, patch: InteractionPatch) {
        for write in &mut self.pending {
            if let PendingWrite::Create { new, .. } = write
                && new.startup_id == startup_id
            {
                fold_into_new(new, patch);
            }
        }
    }

    /// Queue a patch, folding it into an earlier queued write for the same
    /// startup if there is one.
    fn queue_update(&mut self, startup_id: &str, patch: InteractionPatch) {
        for write in &mut self.pending {
            match write {
                PendingWrite::Create { new, changes } if new.startup_id == startup_id => {
                    fold_into_new(new, patch);
                    *changes = merge_patches(*changes, patch);
                    return;
                }
                PendingWrite::Update {
                    startup_id: queued_id,
                    patch: queued,
                } if queued_id == startup_id => {
                    *queued = merge_patches(*queued, patch);
                    return;
                }
                _ => {}
            }
        }
        self.pending.push(PendingWrite::Update {
            startup_id: startup_id.to_string(),
            patch,
        });
    }

    async fn reconcile_on_stage_entry(&mut self) {
        if !self.reconcile_on_entry || self.pending.is_empty() {
            return;
        }
        if let Err(error) = self.reconcile().await {
            tracing::warn!(stage = %self.stage, %error, "reconcile on stage entry failed");
        }
    }

    fn reset_round(&mut self) {
        self.swipe = SwipeMachine::default();
        self.feedback = FeedbackEditor::default();
        self.allocation = AllocationEngine::default();
        self.disliked_feedback.clear();
    }

    fn expect_stage(&self, expected: Stage) -> Result<(), PipelineError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(PipelineError::WrongStage {
                expected,
                actual: self.stage,
            })
        }
    }

    fn check_transition(&self, to: Stage) -> Result<(), PipelineError> {
        if self.stage.can_transition_to(to) {
            Ok(())
        } else {
            Err(PipelineError::InvalidTransition {
                from: self.stage,
                to,
            })
        }
    }

    fn transition(&mut self, to: Stage) -> Result<(), PipelineError> {
        self.check_transition(to)?;
        tracing::info!(swiper_id = %self.swiper_id, from = %self.stage, %to, "stage transition");
        self.stage = to;
        Ok(())
    }
}

const fn merge_patches(base: InteractionPatch, over: InteractionPatch) -> InteractionPatch {
    InteractionPatch {
        has_liked: match over.has_liked {
            Some(v) => Some(v),
            None => base.has_liked,
        },
        coin_allocation: match over.coin_allocation {
            Some(v) => Some(v),
            None => base.coin_allocation,
        },
        feedback_preference: match over.feedback_preference {
            Some(v) => Some(v),
            None => base.feedback_preference,
        },
    }
}

fn fold_into_new(new: &mut NewInteraction, patch: InteractionPatch) {
    if let Some(has_liked) = patch.has_liked {
        new.has_liked = has_liked;
    }
    if let Some(coins) = patch.coin_allocation {
        new.coin_allocation = coins;
    }
    if let Some(pref) = patch.feedback_preference {
        new.feedback_preference = pref;
    }
}
