//! Feedback preference editor for liked startups.

use std::collections::HashMap;

use moqi_core::entities::Startup;
use moqi_core::enums::FeedbackPreference;

use crate::error::PipelineError;

/// In-memory preference map, seeded with the liked default on stage entry.
#[derive(Debug, Clone, Default)]
pub struct FeedbackEditor {
    order: Vec<String>,
    preferences: HashMap<String, FeedbackPreference>,
}

impl FeedbackEditor {
    /// Seed every liked startup with `FeedbackPreference::LIKED_DEFAULT`.
    #[must_use]
    pub fn seeded(liked: &[Startup]) -> Self {
        let order: Vec<String> = liked.iter().map(|s| s.id.clone()).collect();
        let preferences = order
            .iter()
            .map(|id| (id.clone(), FeedbackPreference::LIKED_DEFAULT))
            .collect();
        Self { order, preferences }
    }

    /// Override the preference for one liked startup.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::UnknownStartup` if the startup is not liked.
    pub fn set(
        &mut self,
        startup_id: &str,
        preference: FeedbackPreference,
    ) -> Result<(), PipelineError> {
        let slot = self
            .preferences
            .get_mut(startup_id)
            .ok_or_else(|| PipelineError::UnknownStartup(startup_id.to_string()))?;
        *slot = preference;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, startup_id: &str) -> Option<FeedbackPreference> {
        self.preferences.get(startup_id).copied()
    }

    /// Every liked startup has a preference.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.order.iter().all(|id| self.preferences.contains_key(id))
    }

    /// Startup ids shown on the feedback stage, in encounter order.
    #[must_use]
    pub fn startup_ids(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub const fn preferences(&self) -> &HashMap<String, FeedbackPreference> {
        &self.preferences
    }
}
