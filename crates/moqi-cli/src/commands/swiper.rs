use moqi_db::repos::swiper::NewSwiper;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SwiperCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `moqi swiper`.
pub async fn handle(
    action: &SwiperCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SwiperCommands::Add { name, age, field } => {
            if name.trim().is_empty() {
                anyhow::bail!("swiper name must not be empty");
            }
            let new = NewSwiper {
                name: name.trim().to_string(),
                age: *age,
                field_of_study: field.clone(),
            };
            let swiper = ctx.service.create_swiper(&new).await?;
            output(&swiper, flags.format)
        }
    }
}
