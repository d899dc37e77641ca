use std::path::Path;

use anyhow::Context;
use moqi_config::MoqiConfig;
use moqi_db::service::MoqiService;
use moqi_pipeline::guard::RequestGuard;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: MoqiService,
    pub config: MoqiConfig,
    pub guard: RequestGuard,
}

impl AppContext {
    /// Open the local interaction store named by `config.db.path`.
    pub async fn init(config: MoqiConfig) -> anyhow::Result<Self> {
        if config.db.is_remote() {
            anyhow::bail!(
                "hosted database configured (db.url = {}); moqi only opens local files. \
                 Unset MOQI_DB__URL or pass --db PATH",
                config.db.url
            );
        }

        if !config.db.is_in_memory()
            && let Some(parent) = Path::new(&config.db.path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let service = MoqiService::new_local(&config.db.path)
            .await
            .with_context(|| format!("failed to open database at {}", config.db.path))?;
        let guard = RequestGuard::from_config(&config.pipeline);

        Ok(Self {
            service,
            config,
            guard,
        })
    }
}
