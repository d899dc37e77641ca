//! Startup-side read models over persisted interactions: coin totals,
//! like/dislike counts, and feedback preference counts within a date window.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use moqi_core::entities::{Interaction, InteractionFilter};
use moqi_core::enums::FeedbackPreference;
use moqi_core::store::MatchStore;

use crate::error::PipelineError;
use crate::guard::RequestGuard;

/// Inclusive `created_at` bounds. An open side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateWindow {
    #[must_use]
    pub const fn all() -> Self {
        Self { from: None, to: None }
    }

    /// # Errors
    ///
    /// Returns `PipelineError::Validation` if `from` is after `to`.
    pub fn new(
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Self, PipelineError> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(PipelineError::Validation(format!(
                "date window starts after it ends ({from} > {to})"
            )));
        }
        Ok(Self { from, to })
    }

    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| ts >= from) && self.to.is_none_or(|to| ts <= to)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackCounts {
    pub no: u32,
    pub group: u32,
    pub all: u32,
}

impl FeedbackCounts {
    fn bump(&mut self, pref: FeedbackPreference) {
        match pref {
            FeedbackPreference::No => self.no += 1,
            FeedbackPreference::Group => self.group += 1,
            FeedbackPreference::All => self.all += 1,
        }
    }

    /// `(label, count)` pairs in display order.
    #[must_use]
    pub fn labelled(&self) -> [(&'static str, u32); 3] {
        [
            (FeedbackPreference::No.label(), self.no),
            (FeedbackPreference::Group.label(), self.group),
            (FeedbackPreference::All.label(), self.all),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartupInsights {
    pub startup_id: String,
    pub window: DateWindow,
    pub interactions: u32,
    pub likes: u32,
    pub dislikes: u32,
    pub total_coins: u32,
    /// Preference counts across every interaction in the window.
    pub feedback: FeedbackCounts,
    /// Coins received per UTC day of the interaction's `created_at`.
    pub coins_by_day: BTreeMap<NaiveDate, u32>,
}

impl StartupInsights {
    /// Fold rows belonging to `startup_id` and falling inside `window`.
    #[must_use]
    pub fn from_interactions(
        startup_id: &str,
        window: DateWindow,
        rows: &[Interaction],
    ) -> Self {
        let mut insights = Self {
            startup_id: startup_id.to_string(),
            window,
            ..Self::default()
        };
        for row in rows
            .iter()
            .filter(|row| row.startup_id == startup_id && window.contains(row.created_at))
        {
            insights.interactions += 1;
            if row.has_liked {
                insights.likes += 1;
            } else {
                insights.dislikes += 1;
            }
            insights.total_coins += row.coin_allocation;
            insights.feedback.bump(row.feedback_preference);
            if row.coin_allocation > 0 {
                *insights
                    .coins_by_day
                    .entry(row.created_at.date_naive())
                    .or_default() += row.coin_allocation;
            }
        }
        insights
    }
}

/// Load and summarize every interaction a startup has received.
///
/// # Errors
///
/// Propagates store failures and timeouts.
pub async fn load_startup_insights<S: MatchStore + ?Sized>(
    store: &S,
    guard: &RequestGuard,
    startup_id: &str,
    window: DateWindow,
) -> Result<StartupInsights, PipelineError> {
    let rows = guard
        .call(
            "list_interactions",
            store.list_interactions(&InteractionFilter::Startup(startup_id.to_string())),
        )
        .await?;
    Ok(StartupInsights::from_interactions(startup_id, window, &rows))
}
