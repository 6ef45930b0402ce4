use anyhow::Context;
use pms_config::PmsConfig;

/// Load `.env`, the TOML layers, and `PMS_*` overrides, then validate.
pub fn load_config() -> anyhow::Result<PmsConfig> {
    let config = PmsConfig::load_with_dotenv().context("failed to load pms configuration")?;
    tracing::debug!(
        database = %config.database.path,
        backend = ?config.artifacts.backend,
        "loaded configuration"
    );
    Ok(config)
}
