use serde::Serialize;

use moqi_core::entities::{Interaction, InteractionFilter};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InteractionsArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InteractionListResponse {
    interactions: Vec<Interaction>,
}

/// Handle `moqi interactions`.
pub async fn handle(
    args: &InteractionsArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = filter_from_args(args)?;
    let mut interactions = ctx.service.list_interactions(&filter).await?;
    interactions.truncate(effective_limit(flags.limit, ctx.config.general.default_limit));
    output(&InteractionListResponse { interactions }, flags.format)
}

fn filter_from_args(args: &InteractionsArgs) -> anyhow::Result<InteractionFilter> {
    match (&args.swiper, &args.startup) {
        (Some(swiper), None) => Ok(InteractionFilter::Swiper(swiper.clone())),
        (None, Some(startup)) => Ok(InteractionFilter::Startup(startup.clone())),
        _ => anyhow::bail!("pass exactly one of --swiper or --startup"),
    }
}
