//! Coin allocation engine.
//!
//! A swiper distributes a fixed budget of [`BUDGET`] coins across liked
//! startups in steps of [`STEP`]. Increases that do not fit the remaining
//! budget are rejected whole; decreases clamp at zero. Completion requires
//! the total to equal the budget exactly.

use std::collections::HashMap;

use serde::Serialize;

use moqi_core::entities::InteractionPatch;
use moqi_core::enums::FeedbackPreference;
use moqi_core::store::MatchStore;

use crate::error::PipelineError;
use crate::guard::RequestGuard;

pub const BUDGET: u32 = 100;
pub const STEP: u32 = 10;

/// Result of a single `adjust` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdjustOutcome {
    Applied { value: u32, remaining: u32 },
    /// The increase did not fit; nothing changed.
    Rejected { value: u32, remaining: u32 },
}

impl AdjustOutcome {
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Applied { value, .. } | Self::Rejected { value, .. } => value,
        }
    }

    #[must_use]
    pub const fn remaining(self) -> u32 {
        match self {
            Self::Applied { remaining, .. } | Self::Rejected { remaining, .. } => remaining,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AllocationEngine {
    order: Vec<String>,
    allocations: HashMap<String, u32>,
}

impl AllocationEngine {
    /// Every liked startup starts at zero.
    #[must_use]
    pub fn new<I>(startup_ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let order: Vec<String> = startup_ids.into_iter().collect();
        let allocations = order.iter().map(|id| (id.clone(), 0)).collect();
        Self { order, allocations }
    }

    /// Resume from previously held values. Values need not be step-aligned.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::UnknownStartup` for a seeded id outside
    /// `startup_ids`, and `PipelineError::Validation` if the seeded total
    /// exceeds the budget.
    pub fn with_allocations<I>(
        startup_ids: I,
        seeded: &HashMap<String, u32>,
    ) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut engine = Self::new(startup_ids);
        for (id, value) in seeded {
            let slot = engine
                .allocations
                .get_mut(id)
                .ok_or_else(|| PipelineError::UnknownStartup(id.clone()))?;
            *slot = *value;
        }
        let total: u64 = engine.allocations.values().map(|v| u64::from(*v)).sum();
        if total > u64::from(BUDGET) {
            return Err(PipelineError::Validation(format!(
                "seeded allocations total {total}, budget is {BUDGET}"
            )));
        }
        Ok(engine)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.allocations.values().sum()
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        BUDGET.saturating_sub(self.total())
    }

    #[must_use]
    pub fn can_complete(&self) -> bool {
        self.total() == BUDGET
    }

    #[must_use]
    pub fn get(&self, startup_id: &str) -> Option<u32> {
        self.allocations.get(startup_id).copied()
    }

    #[must_use]
    pub const fn allocations(&self) -> &HashMap<String, u32> {
        &self.allocations
    }

    /// Startup ids in encounter order.
    #[must_use]
    pub fn startup_ids(&self) -> &[String] {
        &self.order
    }

    /// Move one startup's allocation by `delta` (`+STEP` or `-STEP`).
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Validation` for any other delta and
    /// `PipelineError::UnknownStartup` for a startup that was not liked.
    pub fn adjust(&mut self, startup_id: &str, delta: i32) -> Result<AdjustOutcome, PipelineError> {
        if delta.unsigned_abs() != STEP {
            return Err(PipelineError::Validation(format!(
                "allocation changes must be +{STEP} or -{STEP}, got {delta}"
            )));
        }
        let current = self
            .get(startup_id)
            .ok_or_else(|| PipelineError::UnknownStartup(startup_id.to_string()))?;
        let remaining = self.remaining();

        let value = if delta > 0 {
            if remaining < STEP {
                tracing::debug!(startup_id, remaining, "allocation increase rejected");
                return Ok(AdjustOutcome::Rejected {
                    value: current,
                    remaining,
                });
            }
            (current + STEP).min(BUDGET)
        } else {
            current.saturating_sub(STEP)
        };

        self.allocations.insert(startup_id.to_string(), value);
        Ok(AdjustOutcome::Applied {
            value,
            remaining: self.remaining(),
        })
    }

    /// Set one startup's allocation directly.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Validation` when `value` is not a multiple of
    /// `STEP` or does not fit in the budget left by the other startups.
    pub fn set(&mut self, startup_id: &str, value: u32) -> Result<AdjustOutcome, PipelineError> {
        let current = self
            .get(startup_id)
            .ok_or_else(|| PipelineError::UnknownStartup(startup_id.to_string()))?;
        if value % STEP != 0 {
            return Err(PipelineError::Validation(format!(
                "allocation must be a multiple of {STEP}, got {value}"
            )));
        }
        let available = self.remaining() + current;
        if value > available {
            return Err(PipelineError::Validation(format!(
                "allocation of {value} exceeds the {available} coins available"
            )));
        }

        self.allocations.insert(startup_id.to_string(), value);
        Ok(AdjustOutcome::Applied {
            value,
            remaining: self.remaining(),
        })
    }

    /// Require the budget to be fully allocated.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::AllocationIncomplete` with the remaining amount.
    pub fn ensure_complete(&self) -> Result<(), PipelineError> {
        if self.can_complete() {
            Ok(())
        } else {
            Err(PipelineError::AllocationIncomplete {
                remaining: self.remaining(),
            })
        }
    }
}

/// One startup's final write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationWrite {
    pub startup_id: String,
    pub coins: u32,
    pub feedback_preference: FeedbackPreference,
}

impl AllocationWrite {
    #[must_use]
    pub const fn patch(&self) -> InteractionPatch {
        InteractionPatch::new()
            .coin_allocation(self.coins)
            .feedback_preference(self.feedback_preference)
    }
}

/// Per-startup outcome of flushing allocations to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub written: Vec<String>,
    /// `(startup_id, error message)` for every write that failed.
    pub failed: Vec<(String, String)>,
}

impl FlushReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes for every startup holding coins, in encounter order.
#[must_use]
pub fn planned_writes(
    engine: &AllocationEngine,
    preferences: &HashMap<String, FeedbackPreference>,
) -> Vec<AllocationWrite> {
    engine
        .startup_ids()
        .iter()
        .filter_map(|id| {
            let coins = engine.get(id).unwrap_or(0);
            (coins > 0).then(|| AllocationWrite {
                startup_id: id.clone(),
                coins,
                feedback_preference: preferences
                    .get(id)
                    .copied()
                    .unwrap_or(FeedbackPreference::LIKED_DEFAULT),
            })
        })
        .collect()
}

/// Apply `writes` one update per startup. Writes are independent: a failure
/// is logged and reported, siblings still run, nothing is rolled back.
///
/// `interaction_id` resolves a startup to its row; startups without a known
/// row are reported as failed.
pub async fn flush_writes<S, F>(
    store: &S,
    guard: &RequestGuard,
    writes: &[AllocationWrite],
    interaction_id: F,
) -> FlushReport
where
    S: MatchStore + ?Sized,
    F: Fn(&str) -> Option<String>,
{
    let mut report = FlushReport::default();
    for write in writes {
        let Some(id) = interaction_id(&write.startup_id) else {
            tracing::warn!(startup_id = %write.startup_id, "no interaction row known for allocation");
            report
                .failed
                .push((write.startup_id.clone(), "interaction row not yet persisted".into()));
            continue;
        };
        let patch = write.patch();
        match guard
            .call("update_interaction", store.update_interaction(&id, &patch))
            .await
        {
            Ok(()) => report.written.push(write.startup_id.clone()),
            Err(error) => {
                tracing::warn!(startup_id = %write.startup_id, %error, "allocation write failed");
                report.failed.push((write.startup_id.clone(), error.to_string()));
            }
        }
    }
    tracing::info!(
        written = report.written.len(),
        failed = report.failed.len(),
        "flushed allocations"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn engine(ids: &[&str]) -> AllocationEngine {
        AllocationEngine::new(ids.iter().map(|id| (*id).to_string()))
    }

    #[test]
    fn starts_at_zero_with_full_budget() {
        let e = engine(&["a", "b"]);
        assert_eq!(e.total(), 0);
        assert_eq!(e.remaining(), 100);
        assert!(!e.can_complete());
    }

    #[test]
    fn increase_and_decrease_by_step() {
        let mut e = engine(&["a", "b"]);
        assert_eq!(
            e.adjust("a", 10).unwrap(),
            AdjustOutcome::Applied { value: 10, remaining: 90 }
        );
        assert_eq!(
            e.adjust("a", -10).unwrap(),
            AdjustOutcome::Applied { value: 0, remaining: 100 }
        );
    }

    #[test]
    fn decrease_clamps_at_zero() {
        let mut e = engine(&["a"]);
        let outcome = e.adjust("a", -10).unwrap();
        assert_eq!(outcome.value(), 0);
        assert_eq!(e.get("a"), Some(0));
    }

    #[test]
    fn increase_past_budget_is_rejected() {
        let mut e = engine(&["a", "b"]);
        for _ in 0..10 {
            e.adjust("a", 10).unwrap();
        }
        assert_eq!(
            e.adjust("b", 10).unwrap(),
            AdjustOutcome::Rejected { value: 0, remaining: 0 }
        );
        assert_eq!(e.total(), 100);
    }

    #[test]
    fn increase_with_five_remaining_is_rejected_whole() {
        let seeded = HashMap::from([("a".to_string(), 45), ("b".to_string(), 50)]);
        let mut e =
            AllocationEngine::with_allocations(["a".to_string(), "b".to_string()], &seeded).unwrap();
        assert_eq!(e.remaining(), 5);

        let outcome = e.adjust("a", 10).unwrap();

        assert_eq!(outcome, AdjustOutcome::Rejected { value: 45, remaining: 5 });
        assert_eq!(e.get("a"), Some(45));
        assert_eq!(e.remaining(), 5);
    }

    #[rstest]
    #[case(5)]
    #[case(20)]
    #[case(-1)]
    #[case(0)]
    fn off_step_deltas_are_invalid(#[case] delta: i32) {
        let mut e = engine(&["a"]);
        assert!(matches!(e.adjust("a", delta), Err(PipelineError::Validation(_))));
        assert_eq!(e.total(), 0);
    }

    #[test]
    fn adjust_unknown_startup_fails() {
        let mut e = engine(&["a"]);
        assert!(matches!(e.adjust("z", 10), Err(PipelineError::UnknownStartup(_))));
    }

    #[test]
    fn every_pm_step_sequence_stays_within_bounds() {
        // Deterministic walk over a mix of increases and decreases across three startups.
        let ids = ["a", "b", "c"];
        let mut e = engine(&ids);
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let id = ids[(seed % 3) as usize];
            let delta = if seed & 0x10 == 0 { 10 } else { -10 };
            e.adjust(id, delta).unwrap();

            assert!(e.total() <= BUDGET);
            for value in e.allocations().values() {
                assert!(*value <= BUDGET);
            }
            assert_eq!(e.can_complete(), e.total() == BUDGET);
        }
    }

    #[test]
    fn ensure_complete_reports_remaining() {
        let mut e = engine(&["a", "b"]);
        e.set("a", 30).unwrap();
        assert!(matches!(
            e.ensure_complete(),
            Err(PipelineError::AllocationIncomplete { remaining: 70 })
        ));
        e.set("b", 70).unwrap();
        assert!(e.ensure_complete().is_ok());
    }

    #[test]
    fn set_validates_step_and_budget() {
        let mut e = engine(&["a", "b"]);
        assert!(matches!(e.set("a", 35), Err(PipelineError::Validation(_))));
        e.set("a", 60).unwrap();
        assert!(matches!(e.set("b", 50), Err(PipelineError::Validation(_))));
        // Lowering then raising the same startup reuses its own coins.
        e.set("a", 100).unwrap();
        assert_eq!(e.remaining(), 0);
    }

    #[test]
    fn seeded_total_over_budget_is_rejected() {
        let seeded = HashMap::from([("a".to_string(), 80), ("b".to_string(), 30)]);
        let result = AllocationEngine::with_allocations(["a".to_string(), "b".to_string()], &seeded);
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn planned_writes_skip_zero_allocations() {
        let mut e = engine(&["a", "b", "c"]);
        e.set("a", 40).unwrap();
        e.set("c", 60).unwrap();
        let prefs = HashMap::from([("c".to_string(), FeedbackPreference::Group)]);

        let writes = planned_writes(&e, &prefs);

        assert_eq!(
            writes,
            vec![
                AllocationWrite {
                    startup_id: "a".into(),
                    coins: 40,
                    feedback_preference: FeedbackPreference::All,
                },
                AllocationWrite {
                    startup_id: "c".into(),
                    coins: 60,
                    feedback_preference: FeedbackPreference::Group,
                },
            ]
        );
    }
}
