//! `MatchStore` implementation for the libSQL service.

use async_trait::async_trait;

use moqi_core::entities::{
    Interaction, InteractionFilter, InteractionPatch, NewInteraction, Startup, Swiper,
};
use moqi_core::enums::EntityType;
use moqi_core::errors::StoreError;
use moqi_core::store::MatchStore;

use crate::error::DatabaseError;
use crate::service::MoqiService;

/// Map `NoResult` to a not-found naming the entity; everything else converts
/// through `From<DatabaseError>`.
fn lookup_error(err: DatabaseError, entity_type: EntityType, id: &str) -> StoreError {
    match err {
        DatabaseError::NoResult => StoreError::not_found(entity_type, id),
        other => other.into(),
    }
}

#[async_trait]
impl MatchStore for MoqiService {
    async fn list_startups(&self) -> Result<Vec<Startup>, StoreError> {
        Ok(Self::list_startups(self).await?)
    }

    async fn get_startup(&self, id: &str) -> Result<Startup, StoreError> {
        Self::get_startup(self, id)
            .await
            .map_err(|e| lookup_error(e, EntityType::Startup, id))
    }

    async fn get_swiper(&self, id: &str) -> Result<Swiper, StoreError> {
        Self::get_swiper(self, id)
            .await
            .map_err(|e| lookup_error(e, EntityType::Swiper, id))
    }

    async fn list_swiped_startup_ids(&self, swiper_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(Self::list_swiped_startup_ids(self, swiper_id).await?)
    }

    async fn create_interaction(&self, new: &NewInteraction) -> Result<Interaction, StoreError> {
        Ok(Self::create_interaction(self, new).await?)
    }

    async fn update_interaction(
        &self,
        id: &str,
        patch: &InteractionPatch,
    ) -> Result<(), StoreError> {
        Self::update_interaction(self, id, patch)
            .await
            .map(|_| ())
            .map_err(|e| lookup_error(e, EntityType::Interaction, id))
    }

    async fn list_interactions(
        &self,
        filter: &InteractionFilter,
    ) -> Result<Vec<Interaction>, StoreError> {
        Ok(Self::list_interactions(self, filter).await?)
    }

    async fn upsert_interaction(&self, new: &NewInteraction) -> Result<Interaction, StoreError> {
        Ok(Self::upsert_interaction(self, new).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_startups, seed_swiper, test_service};
    use moqi_core::enums::Decision;

    #[tokio::test]
    async fn missing_swiper_maps_to_not_found() {
        let svc = test_service().await;
        let store: &dyn MatchStore = &svc;
        let err = store.get_swiper("swp-00000000").await.unwrap_err();
        assert_eq!(err, StoreError::not_found(EntityType::Swiper, "swp-00000000"));
    }

    #[tokio::test]
    async fn duplicate_create_through_trait_is_conflict() {
        let svc = test_service().await;
        let swiper = seed_swiper(&svc, "Robin").await;
        let startups = seed_startups(&svc, &["A"]).await;
        let store: &dyn MatchStore = &svc;
        let new = NewInteraction::from_decision(&swiper.id, &startups[0].id, Decision::Like);

        store.create_interaction(&new).await.unwrap();
        let err = store.create_interaction(&new).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        let reused = store.upsert_interaction(&new).await.unwrap();
        assert_eq!(store.list_swiped_startup_ids(&swiper.id).await.unwrap(), vec![reused.startup_id]);
    }

    #[tokio::test]
    async fn update_missing_row_maps_to_not_found() {
        let svc = test_service().await;
        let store: &dyn MatchStore = &svc;
        let err = store
            .update_interaction("int-00000000", &InteractionPatch::new().coin_allocation(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity_type: EntityType::Interaction,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn create_for_unknown_swiper_is_invalid() {
        let svc = test_service().await;
        let startups = seed_startups(&svc, &["A"]).await;
        let store: &dyn MatchStore = &svc;
        let new = NewInteraction::from_decision("swp-missing", &startups[0].id, Decision::Like);

        let err = store.create_interaction(&new).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)), "{err:?}");
        assert!(!err.is_transient());
    }
}
