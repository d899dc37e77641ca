use anyhow::Context;
use serde::Serialize;

use moqi_core::entities::Startup;
use moqi_pipeline::insights::{DateWindow, StartupInsights, load_startup_insights};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InsightsArgs;
use crate::commands::shared::parse::parse_timestamp;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct FeedbackLine {
    label: &'static str,
    count: u32,
}

#[derive(Debug, Serialize)]
struct InsightsResponse {
    startup: Startup,
    insights: StartupInsights,
    feedback: Vec<FeedbackLine>,
}

/// Handle `moqi insights`.
pub async fn handle(
    args: &InsightsArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let window = window_from_args(args)?;
    let startup = ctx
        .service
        .get_startup(&args.startup)
        .await
        .with_context(|| format!("unknown startup '{}'", args.startup))?;

    let insights = load_startup_insights(&ctx.service, &ctx.guard, &startup.id, window).await?;
    let feedback = insights
        .feedback
        .labelled()
        .into_iter()
        .map(|(label, count)| FeedbackLine { label, count })
        .collect();

    output(
        &InsightsResponse {
            startup,
            insights,
            feedback,
        },
        flags.format,
    )
}

fn window_from_args(args: &InsightsArgs) -> anyhow::Result<DateWindow> {
    let from = args
        .from
        .as_deref()
        .map(|raw| parse_timestamp(raw, "from"))
        .transpose()?;
    let to = args
        .to
        .as_deref()
        .map(|raw| parse_timestamp(raw, "to"))
        .transpose()?;
    Ok(DateWindow::new(from, to)?)
}
