//! # pms-config
//!
//! Layered configuration loading for the panel grading engine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PMS_*` prefix, `__` as separator)
//! 2. Project-level `.pms/config.toml`
//! 3. User-level `~/.config/pms/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PMS_SCORING__PENALTY_RATE` -> `scoring.penalty_rate`,
//! `PMS_ARTIFACTS__BACKEND` -> `artifacts.backend`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use pms_config::PmsConfig;
//!
//! let config = PmsConfig::load_with_dotenv().expect("config");
//! println!("grades are clamped to {}", config.scoring.total_score);
//! ```

mod artifacts;
mod database;
mod distribution;
mod error;
mod scoring;
mod shortlist;

pub use artifacts::{ArtifactBackend, ArtifactConfig};
pub use database::DatabaseConfig;
pub use distribution::{DistributionConfig, ExtraSlotFill};
pub use error::ConfigError;
pub use scoring::ScoringConfig;
pub use shortlist::ShortlistConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PmsConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub distribution: DistributionConfig,
    #[serde(default)]
    pub shortlist: ShortlistConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl PmsConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate from an arbitrary provider chain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".pms/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("PMS_").split("__"));

        figment
    }

    /// Cross-field checks figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        if self.distribution.max_questions_per_student == 0 {
            return Err(ConfigError::InvalidValue {
                field: "distribution.max_questions_per_student".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.distribution.max_student_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "distribution.max_student_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.shortlist.finalist_count > self.shortlist.tagging_pool_size {
            return Err(ConfigError::InvalidValue {
                field: "shortlist.finalist_count".into(),
                reason: format!(
                    "{} exceeds tagging_pool_size {}",
                    self.shortlist.finalist_count, self.shortlist.tagging_pool_size
                ),
            });
        }
        if self.artifacts.backend == ArtifactBackend::S3 && !self.artifacts.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "artifacts".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pms").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PmsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.artifacts.backend, ArtifactBackend::Local);
        assert_eq!(config.database.path, ".pms/pms.db");
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config = PmsConfig::from_figment(&PmsConfig::figment())
                .expect("should extract defaults");
            assert_eq!(config.distribution.max_questions_per_student, 20);
            assert_eq!(config.shortlist.finalist_count, 10);
            Ok(())
        });
    }

    #[test]
    fn s3_backend_requires_credentials() {
        let mut config = PmsConfig::default();
        config.artifacts.backend = ArtifactBackend::S3;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { .. }));
    }

    #[test]
    fn finalists_cannot_exceed_pool() {
        let mut config = PmsConfig::default();
        config.shortlist.finalist_count = 30;
        assert!(config.validate().is_err());
    }
}
