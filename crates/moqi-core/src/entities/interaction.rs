use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Decision, FeedbackPreference};

/// One swiper's decision (and later allocation/preference) for one startup.
///
/// At most one row exists per (`swiper_id`, `startup_id`). It is created at the
/// first swipe and updated in place afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Interaction {
    pub id: String,
    pub swiper_id: String,
    pub startup_id: String,
    pub has_liked: bool,
    /// Coins allocated to the startup, in `[0, 100]`.
    pub coin_allocation: u32,
    pub feedback_preference: FeedbackPreference,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an interaction row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewInteraction {
    pub swiper_id: String,
    pub startup_id: String,
    pub has_liked: bool,
    pub coin_allocation: u32,
    pub feedback_preference: FeedbackPreference,
}

impl NewInteraction {
    /// The row written at swipe time: no coins yet, preference defaulted by decision.
    #[must_use]
    pub fn from_decision(
        swiper_id: impl Into<String>,
        startup_id: impl Into<String>,
        decision: Decision,
    ) -> Self {
        Self {
            swiper_id: swiper_id.into(),
            startup_id: startup_id.into(),
            has_liked: decision.is_like(),
            coin_allocation: 0,
            feedback_preference: decision.default_feedback(),
        }
    }

    /// The patch that brings an existing row in line with this one.
    #[must_use]
    pub const fn as_patch(&self) -> InteractionPatch {
        InteractionPatch {
            has_liked: Some(self.has_liked),
            coin_allocation: Some(self.coin_allocation),
            feedback_preference: Some(self.feedback_preference),
        }
    }
}

/// Partial update of an interaction row. Only `Some` fields are written.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InteractionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_liked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin_allocation: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_preference: Option<FeedbackPreference>,
}

impl InteractionPatch {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            has_liked: None,
            coin_allocation: None,
            feedback_preference: None,
        }
    }

    #[must_use]
    pub const fn has_liked(mut self, has_liked: bool) -> Self {
        self.has_liked = Some(has_liked);
        self
    }

    #[must_use]
    pub const fn coin_allocation(mut self, coins: u32) -> Self {
        self.coin_allocation = Some(coins);
        self
    }

    #[must_use]
    pub const fn feedback_preference(mut self, pref: FeedbackPreference) -> Self {
        self.feedback_preference = Some(pref);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.has_liked.is_none()
            && self.coin_allocation.is_none()
            && self.feedback_preference.is_none()
    }

    /// Apply the patch to an in-memory row.
    pub fn apply_to(&self, interaction: &mut Interaction) {
        if let Some(has_liked) = self.has_liked {
            interaction.has_liked = has_liked;
        }
        if let Some(coins) = self.coin_allocation {
            interaction.coin_allocation = coins;
        }
        if let Some(pref) = self.feedback_preference {
            interaction.feedback_preference = pref;
        }
    }
}

/// Which side of the interaction table to query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "by", content = "id")]
pub enum InteractionFilter {
    Swiper(String),
    Startup(String),
}

impl InteractionFilter {
    /// Whether `interaction` belongs to this filter.
    #[must_use]
    pub fn matches(&self, interaction: &Interaction) -> bool {
        match self {
            Self::Swiper(id) => interaction.swiper_id == *id,
            Self::Startup(id) => interaction.startup_id == *id,
        }
    }
}
