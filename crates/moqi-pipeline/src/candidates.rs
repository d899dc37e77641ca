//! Candidate set loader: all startups minus the ones already swiped.

use std::collections::HashSet;

use moqi_core::entities::Startup;
use moqi_core::store::MatchStore;

use crate::error::PipelineError;
use crate::guard::RequestGuard;

/// Remove every startup whose id is in `swiped`, keeping the original order.
#[must_use]
pub fn subtract_swiped(all: Vec<Startup>, swiped: &[String]) -> Vec<Startup> {
    let swiped: HashSet<&str> = swiped.iter().map(String::as_str).collect();
    all.into_iter()
        .filter(|startup| !swiped.contains(startup.id.as_str()))
        .collect()
}

/// Load the startups `swiper_id` has not interacted with yet.
///
/// Role checks belong to the caller; this only reads.
///
/// # Errors
///
/// Propagates store failures and timeouts.
pub async fn load_candidates<S: MatchStore + ?Sized>(
    store: &S,
    guard: &RequestGuard,
    swiper_id: &str,
) -> Result<Vec<Startup>, PipelineError> {
    let all = guard.call("list_startups", store.list_startups()).await?;
    let swiped = guard
        .call("list_swiped_startup_ids", store.list_swiped_startup_ids(swiper_id))
        .await?;
    let total = all.len();
    let candidates = subtract_swiped(all, &swiped);
    tracing::debug!(
        swiper_id,
        total,
        swiped = swiped.len(),
        candidates = candidates.len(),
        "loaded candidates"
    );
    Ok(candidates)
}
