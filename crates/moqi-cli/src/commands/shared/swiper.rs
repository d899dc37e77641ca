use anyhow::Context;
use moqi_core::entities::Swiper;

use crate::context::AppContext;

/// Look up the swiper, failing with a readable error if it does not exist.
///
/// Only registered swipers may swipe; this is the CLI's role check.
pub async fn require_swiper(ctx: &AppContext, swiper_id: &str) -> anyhow::Result<Swiper> {
    ctx.service
        .get_swiper(swiper_id)
        .await
        .with_context(|| format!("unknown swiper '{swiper_id}'. Register one with 'moqi swiper add'"))
}
