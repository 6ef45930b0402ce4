//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pms_config::{ArtifactBackend, ExtraSlotFill, PmsConfig};
use rust_decimal_macros::dec;

#[test]
fn loads_scoring_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[scoring]
total_score = 50
penalty_rate = "1.5"
tag_stage_bonus = 3
"#,
        )?;

        let config: PmsConfig = Figment::from(Serialized::defaults(PmsConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.scoring.total_score, dec!(50));
        assert_eq!(config.scoring.penalty_rate, dec!(1.5));
        assert_eq!(config.scoring.tag_stage_bonus, dec!(3));
        // untouched fields keep their defaults
        assert_eq!(config.scoring.vote_stage_bonus, dec!(5));
        Ok(())
    });
}

#[test]
fn loads_distribution_and_shortlist_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[distribution]
max_questions_per_student = 12
extra_slot_fill = "front"
seed = 42

[shortlist]
tagging_pool_size = 15
finalist_count = 5
"#,
        )?;

        let config: PmsConfig = Figment::from(Serialized::defaults(PmsConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.distribution.max_questions_per_student, 12);
        assert_eq!(config.distribution.extra_slot_fill, ExtraSlotFill::Front);
        assert_eq!(config.distribution.seed, Some(42));
        assert_eq!(config.shortlist.tagging_pool_size, 15);
        assert_eq!(config.shortlist.finalist_count, 5);
        Ok(())
    });
}

#[test]
fn loads_artifact_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[artifacts]
backend = "s3"
bucket_name = "toml-bucket"
region = "eu-west-1"
endpoint = "http://localhost:9000"
access_key_id = "toml-key"
secret_access_key = "toml-secret"
"#,
        )?;

        let config: PmsConfig = Figment::from(Serialized::defaults(PmsConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.artifacts.backend, ArtifactBackend::S3);
        assert_eq!(config.artifacts.bucket_name, "toml-bucket");
        assert_eq!(config.artifacts.region, "eu-west-1");
        assert_eq!(config.artifacts.endpoint_url(), Some("http://localhost:9000"));
        assert!(config.artifacts.is_configured());
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".pms")?;
        jail.create_file(
            ".pms/config.toml",
            r#"
[database]
path = ":memory:"

[artifacts]
backend = "memory"
"#,
        )?;

        let config = PmsConfig::load().expect("config loads");
        assert!(config.database.is_in_memory());
        assert_eq!(config.artifacts.backend, ArtifactBackend::Memory);
        Ok(())
    });
}

#[test]
fn invalid_scoring_value_fails_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".pms")?;
        jail.create_file(
            ".pms/config.toml",
            r#"
[scoring]
question_stage_denominator = 0
"#,
        )?;

        let err = PmsConfig::load().unwrap_err();
        assert!(err.to_string().contains("question_stage_denominator"));
        Ok(())
    });
}
