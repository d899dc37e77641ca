//! Feedback preferences, swipe decisions, and the pipeline stage machine.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `Stage` provides `allowed_next_states()` to enforce valid transitions at the
//! application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// FeedbackPreference
// ---------------------------------------------------------------------------

/// A swiper's declared willingness to give feedback to a startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackPreference {
    No,
    Group,
    All,
}

impl FeedbackPreference {
    pub const ALL_VALUES: [Self; 3] = [Self::No, Self::Group, Self::All];

    /// Default preference seeded for a liked startup.
    pub const LIKED_DEFAULT: Self = Self::All;

    /// Default preference written for a disliked startup.
    pub const DISLIKED_DEFAULT: Self = Self::No;

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Group => "group",
            Self::All => "all",
        }
    }

    /// Human-readable label shown next to a startup.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::No => "No feedback",
            Self::Group => "Group session",
            Self::All => "Full feedback",
        }
    }
}

impl fmt::Display for FeedbackPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackPreference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" => Ok(Self::No),
            "group" => Ok(Self::Group),
            "all" => Ok(Self::All),
            other => Err(CoreError::Validation(format!(
                "unknown feedback preference '{other}' (expected no, group, or all)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// A binary swipe decision on one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Like,
    Dislike,
}

impl Decision {
    #[must_use]
    pub const fn is_like(self) -> bool {
        matches!(self, Self::Like)
    }

    /// Feedback preference written with the interaction row at swipe time.
    #[must_use]
    pub const fn default_feedback(self) -> FeedbackPreference {
        match self {
            Self::Like => FeedbackPreference::LIKED_DEFAULT,
            Self::Dislike => FeedbackPreference::DISLIKED_DEFAULT,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" | "l" | "yes" => Ok(Self::Like),
            "dislike" | "d" | "no" => Ok(Self::Dislike),
            other => Err(CoreError::Validation(format!(
                "unknown decision '{other}' (expected like or dislike)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Stage of a swiper's pipeline session.
///
/// ```text
/// dashboard → swiping → feedback → allocation → results → dashboard
///                     → allocation
///                     → results (0 or 1 liked)
/// any non-dashboard stage → dashboard (restart)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Dashboard,
    Swiping,
    Feedback,
    Allocation,
    Results,
}

impl Stage {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Dashboard => &[Self::Swiping],
            Self::Swiping => &[Self::Feedback, Self::Allocation, Self::Results, Self::Dashboard],
            Self::Feedback => &[Self::Allocation, Self::Dashboard],
            Self::Allocation => &[Self::Results, Self::Feedback, Self::Dashboard],
            Self::Results => &[Self::Dashboard],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Swiping => "swiping",
            Self::Feedback => "feedback",
            Self::Allocation => "allocation",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Entity types, used in not-found errors and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Startup,
    Swiper,
    Interaction,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Swiper => "swiper",
            Self::Interaction => "interaction",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_preference_serializes_snake_case() {
        for pref in FeedbackPreference::ALL_VALUES {
            let json = serde_json::to_string(&pref).unwrap();
            assert_eq!(json, format!("\"{}\"", pref.as_str()));
        }
    }

    #[test]
    fn individual_preference_is_rejected() {
        assert!(serde_json::from_str::<FeedbackPreference>("\"individual\"").is_err());
        assert!("individual".parse::<FeedbackPreference>().is_err());
    }

    #[test]
    fn feedback_preference_parses_from_str() {
        assert_eq!("group".parse::<FeedbackPreference>().unwrap(), FeedbackPreference::Group);
    }

    #[test]
    fn decision_defaults() {
        assert_eq!(Decision::Like.default_feedback(), FeedbackPreference::All);
        assert_eq!(Decision::Dislike.default_feedback(), FeedbackPreference::No);
        assert!(Decision::Like.is_like());
        assert!(!Decision::Dislike.is_like());
    }

    #[test]
    fn decision_accepts_short_forms() {
        assert_eq!("l".parse::<Decision>().unwrap(), Decision::Like);
        assert_eq!("d".parse::<Decision>().unwrap(), Decision::Dislike);
        assert!("maybe".parse::<Decision>().is_err());
    }

    #[test]
    fn stage_happy_path_transitions() {
        assert!(Stage::Dashboard.can_transition_to(Stage::Swiping));
        assert!(Stage::Swiping.can_transition_to(Stage::Feedback));
        assert!(Stage::Feedback.can_transition_to(Stage::Allocation));
        assert!(Stage::Allocation.can_transition_to(Stage::Results));
        assert!(Stage::Results.can_transition_to(Stage::Dashboard));
    }

    #[test]
    fn stage_rejects_skips_backwards_into_swiping() {
        assert!(!Stage::Dashboard.can_transition_to(Stage::Results));
        assert!(!Stage::Results.can_transition_to(Stage::Swiping));
        assert!(!Stage::Feedback.can_transition_to(Stage::Results));
    }

    #[test]
    fn every_non_dashboard_stage_can_restart() {
        for stage in [Stage::Swiping, Stage::Feedback, Stage::Allocation, Stage::Results] {
            assert!(stage.can_transition_to(Stage::Dashboard), "{stage} should restart");
        }
    }
}
