use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Startup { action } => commands::startup::handle(&action, ctx, flags).await,
        Commands::Swiper { action } => commands::swiper::handle(&action, ctx, flags).await,
        Commands::Swipe(args) => commands::swipe::handle(&args, ctx, flags).await,
        Commands::Candidates(args) => commands::candidates::handle(&args, ctx, flags).await,
        Commands::Interactions(args) => commands::interactions::handle(&args, ctx, flags).await,
        Commands::Insights(args) => commands::insights::handle(&args, ctx, flags).await,
    }
}
