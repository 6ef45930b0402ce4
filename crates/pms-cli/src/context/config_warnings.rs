use pms_config::{ArtifactBackend, PmsConfig};

/// Emit warnings for settings that silently lose data or look mistyped.
pub fn warn_unconfigured(config: &PmsConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &PmsConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if config.database.is_in_memory() {
        warnings.push(
            "database.path is ':memory:'; imported panels and grades are discarded on exit."
                .to_string(),
        );
    }

    if config.artifacts.backend == ArtifactBackend::Memory {
        warnings.push(
            "artifacts.backend is 'memory'; stage artifacts are discarded on exit.".to_string(),
        );
    }

    if config.artifacts.backend != ArtifactBackend::S3
        && has_env_prefix(&env_keys, "PMS_ARTIFACTS_")
        && !has_env_prefix(&env_keys, "PMS_ARTIFACTS__")
    {
        warnings.push(
            "PMS_ARTIFACTS* env vars exist but were not applied. Use double underscores (example: PMS_ARTIFACTS__BACKEND)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use pms_config::{ArtifactBackend, PmsConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_throwaway_storage_and_single_underscore_keys() {
        let mut config = PmsConfig::default();
        config.database.path = ":memory:".to_string();
        config.artifacts.backend = ArtifactBackend::Memory;

        let warnings = collect_unconfigured_warnings(
            &config,
            vec![("PMS_ARTIFACTS_BACKEND".to_string(), "s3".to_string())],
        );

        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn does_not_warn_for_default_local_setup() {
        let config = PmsConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![("PMS_ARTIFACTS__LOCAL_ROOT".to_string(), "/tmp/a".to_string())],
        );

        assert!(warnings.is_empty());
    }
}
