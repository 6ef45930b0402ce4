use std::path::Path;

use anyhow::Context;
use pms_artifacts::ArtifactStore;
use pms_config::PmsConfig;
use pms_db::PmsDb;
use pms_engine::PanelEngine;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub engine: PanelEngine<PmsDb>,
}

impl AppContext {
    /// Open the database and artifact backend named by the configuration.
    pub async fn init(config: PmsConfig) -> anyhow::Result<Self> {
        let db_path = &config.database.path;
        if !config.database.is_in_memory()
            && let Some(parent) = Path::new(db_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let db = PmsDb::open_local(db_path)
            .await
            .with_context(|| format!("failed to open panel database at {db_path}"))?;
        let artifacts = ArtifactStore::from_config(&config.artifacts)
            .context("failed to initialize artifact store")?;

        Ok(Self {
            engine: PanelEngine::new(db, artifacts, config),
        })
    }

    pub const fn db(&self) -> &PmsDb {
        self.engine.store()
    }

    pub const fn artifacts(&self) -> &ArtifactStore {
        self.engine.artifacts()
    }
}
