//! In-memory implementation of `MatchStore`.
//!
//! Holds the same contract as the libSQL service (one row per pair, conflict
//! on duplicate create, ordered listings) in a `RwLock`. All state is lost
//! when the store is dropped.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use moqi_core::entities::{
    Interaction, InteractionFilter, InteractionPatch, NewInteraction, Startup, Swiper,
};
use moqi_core::enums::EntityType;
use moqi_core::errors::StoreError;
use moqi_core::ids::{PREFIX_INTERACTION, format_id};
use moqi_core::store::MatchStore;

#[derive(Default)]
struct Tables {
    startups: Vec<Startup>,
    swipers: Vec<Swiper>,
    interactions: Vec<Interaction>,
    next_id: u32,
}

/// In-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with reference data.
    #[must_use]
    pub fn with_reference_data(startups: Vec<Startup>, swipers: Vec<Swiper>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                startups,
                swipers,
                ..Tables::default()
            }),
        }
    }

    /// Snapshot of every interaction row, in creation order.
    pub async fn interactions(&self) -> Vec<Interaction> {
        self.tables.read().await.interactions.clone()
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn list_startups(&self) -> Result<Vec<Startup>, StoreError> {
        Ok(self.tables.read().await.startups.clone())
    }

    async fn get_startup(&self, id: &str) -> Result<Startup, StoreError> {
        self.tables
            .read()
            .await
            .startups
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityType::Startup, id))
    }

    async fn get_swiper(&self, id: &str) -> Result<Swiper, StoreError> {
        self.tables
            .read()
            .await
            .swipers
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityType::Swiper, id))
    }

    async fn list_swiped_startup_ids(&self, swiper_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .interactions
            .iter()
            .filter(|row| row.swiper_id == swiper_id)
            .map(|row| row.startup_id.clone())
            .collect())
    }

    async fn create_interaction(&self, new: &NewInteraction) -> Result<Interaction, StoreError> {
        if new.coin_allocation > 100 {
            return Err(StoreError::Invalid(format!(
                "coin_allocation {} exceeds 100",
                new.coin_allocation
            )));
        }

        let mut tables = self.tables.write().await;
        if tables
            .interactions
            .iter()
            .any(|row| row.swiper_id == new.swiper_id && row.startup_id == new.startup_id)
        {
            return Err(StoreError::Conflict {
                swiper_id: new.swiper_id.clone(),
                startup_id: new.startup_id.clone(),
            });
        }

        tables.next_id += 1;
        let now = Utc::now();
        let row = Interaction {
            id: format_id(PREFIX_INTERACTION, tables.next_id),
            swiper_id: new.swiper_id.clone(),
            startup_id: new.startup_id.clone(),
            has_liked: new.has_liked,
            coin_allocation: new.coin_allocation,
            feedback_preference: new.feedback_preference,
            created_at: now,
            updated_at: now,
        };
        tables.interactions.push(row.clone());
        Ok(row)
    }

    async fn update_interaction(
        &self,
        id: &str,
        patch: &InteractionPatch,
    ) -> Result<(), StoreError> {
        if patch.coin_allocation.is_some_and(|coins| coins > 100) {
            return Err(StoreError::Invalid("coin_allocation exceeds 100".into()));
        }

        let mut tables = self.tables.write().await;
        let row = tables
            .interactions
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| StoreError::not_found(EntityType::Interaction, id))?;
        if !patch.is_empty() {
            patch.apply_to(row);
            row.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_interactions(
        &self,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .interactions
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moqi_core::enums::{Decision, FeedbackPreference};

    #[tokio::test]
    async fn duplicate_create_is_conflict() {
        let store = InMemoryStore::new();
        let new = NewInteraction::from_decision("swp-1", "stu-1", Decision::Like);

        store.create_interaction(&new).await.unwrap();
        let err = store.create_interaction(&new).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn default_upsert_reuses_existing_row() {
        let store = InMemoryStore::new();
        let first = store
            .upsert_interaction(&NewInteraction::from_decision("swp-1", "stu-1", Decision::Like))
            .await
            .unwrap();
        let again = store
            .upsert_interaction(&NewInteraction::from_decision("swp-1", "stu-1", Decision::Like))
            .await
            .unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(store.interactions().await.len(), 1);
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let store = InMemoryStore::new();
        let row = store
            .create_interaction(&NewInteraction::from_decision("swp-1", "stu-1", Decision::Like))
            .await
            .unwrap();

        store
            .update_interaction(
                &row.id,
                &InteractionPatch::new()
                    .coin_allocation(40)
                    .feedback_preference(FeedbackPreference::Group),
            )
            .await
            .unwrap();

        let rows = store.interactions().await;
        assert_eq!(rows[0].coin_allocation, 40);
        assert_eq!(rows[0].feedback_preference, FeedbackPreference::Group);
    }

    #[tokio::test]
    async fn update_unknown_row_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .update_interaction("int-00000009", &InteractionPatch::new().coin_allocation(10))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn swiped_ids_are_scoped_to_swiper() {
        let store = InMemoryStore::new();
        for (swiper, startup) in [("swp-1", "stu-1"), ("swp-2", "stu-2"), ("swp-1", "stu-3")] {
            store
                .create_interaction(&NewInteraction::from_decision(swiper, startup, Decision::Dislike))
                .await
                .unwrap();
        }
        assert_eq!(
            store.list_swiped_startup_ids("swp-1").await.unwrap(),
            vec!["stu-1".to_string(), "stu-3".to_string()]
        );
    }
}
