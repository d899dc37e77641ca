use serde::Serialize;

use moqi_core::entities::Startup;
use moqi_pipeline::candidates::load_candidates;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CandidatesArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::swiper::require_swiper;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct CandidatesResponse {
    swiper_id: String,
    remaining: usize,
    candidates: Vec<Startup>,
}

/// Handle `moqi candidates`.
pub async fn handle(
    args: &CandidatesArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let swiper = require_swiper(ctx, &args.swiper).await?;
    let mut candidates = load_candidates(&ctx.service, &ctx.guard, &swiper.id).await?;
    let remaining = candidates.len();
    candidates.truncate(effective_limit(flags.limit, ctx.config.general.default_limit));

    output(
        &CandidatesResponse {
            swiper_id: swiper.id,
            remaining,
            candidates,
        },
        flags.format,
    )
}
