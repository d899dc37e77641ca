use serde::Serialize;

use moqi_core::entities::Startup;
use moqi_db::repos::startup::NewStartup;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::StartupCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StartupListResponse {
    startups: Vec<Startup>,
}

/// Handle `moqi startup`.
pub async fn handle(
    action: &StartupCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        StartupCommands::Add {
            name,
            tagline,
            description,
            industry,
            founded,
            employees,
            logo_url,
        } => {
            if name.trim().is_empty() {
                anyhow::bail!("startup name must not be empty");
            }
            let new = NewStartup {
                name: name.trim().to_string(),
                tagline: tagline.clone(),
                description: description.clone(),
                industry: industry.clone(),
                founding_year: *founded,
                employee_band: employees.clone(),
                logo_url: logo_url.clone(),
            };
            let startup = ctx.service.create_startup(&new).await?;
            output(&startup, flags.format)
        }
        StartupCommands::List => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            let mut startups = ctx.service.list_startups().await?;
            startups.truncate(limit);
            output(&StartupListResponse { startups }, flags.format)
        }
    }
}
