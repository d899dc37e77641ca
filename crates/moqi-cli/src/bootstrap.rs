use std::path::Path;

use anyhow::Context;
use moqi_config::MoqiConfig;

use crate::cli::GlobalFlags;

/// Load `.env` from the working directory, then the layered config.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<MoqiConfig> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    load_dotenv(&cwd)?;

    let mut config = MoqiConfig::load().context("failed to load moqi configuration")?;
    // An explicit --db always means a local file.
    if let Some(path) = &flags.db {
        config.db.path.clone_from(path);
        config.db.url.clear();
    }
    Ok(config)
}

fn load_dotenv(dir: &Path) -> anyhow::Result<()> {
    let env_path = dir.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        tracing::debug!(path = %env_path.display(), "loaded dotenv file");
    }
    Ok(())
}
