//! Data-access interface consumed by the matchmaking pipeline.
//!
//! The pipeline never talks to a database directly. It is generic over a
//! `MatchStore`, implemented by the libSQL-backed `MoqiService` and by the
//! in-memory store in `moqi-db`.

use async_trait::async_trait;

use crate::entities::{
    Interaction, InteractionFilter, InteractionPatch, NewInteraction, Startup, Swiper,
};
use crate::enums::EntityType;
use crate::errors::StoreError;

/// Backend operations the pipeline relies on.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// All startups, in the backend's stable order.
    async fn list_startups(&self) -> Result<Vec<Startup>, StoreError>;

    async fn get_startup(&self, id: &str) -> Result<Startup, StoreError>;

    async fn get_swiper(&self, id: &str) -> Result<Swiper, StoreError>;

    /// IDs of every startup the swiper has an interaction row for.
    async fn list_swiped_startup_ids(&self, swiper_id: &str) -> Result<Vec<String>, StoreError>;

    /// Insert a new row.
    ///
    /// Fails with `StoreError::Conflict` if the (swiper, startup) pair exists.
    async fn create_interaction(&self, new: &NewInteraction) -> Result<Interaction, StoreError>;

    async fn update_interaction(
        &self,
        id: &str,
        patch: &InteractionPatch,
    ) -> Result<(), StoreError>;

    async fn list_interactions(
        &self,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, StoreError>;

    /// Create the row, or bring the existing row for the same pair in line.
    ///
    /// A repeated create for the same pair is treated as success and reuses
    /// the existing row id.
    async fn upsert_interaction(&self, new: &NewInteraction) -> Result<Interaction, StoreError> {
        match self.create_interaction(new).await {
            Err(StoreError::Conflict { .. }) => {
                let mut existing = self
                    .list_interactions(&InteractionFilter::Swiper(new.swiper_id.clone()))
                    .await?
                    .into_iter()
                    .find(|row| row.startup_id == new.startup_id)
                    .ok_or_else(|| {
                        StoreError::not_found(
                            EntityType::Interaction,
                            format!("{}/{}", new.swiper_id, new.startup_id),
                        )
                    })?;
                let patch = new.as_patch();
                self.update_interaction(&existing.id, &patch).await?;
                patch.apply_to(&mut existing);
                Ok(existing)
            }
            other => other,
        }
    }
}
