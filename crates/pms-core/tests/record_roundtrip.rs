//! Serde roundtrip and JsonSchema validation tests for stored records and artifacts.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use pms_core::artifacts::{ClusterDescriptor, ShortlistEntry, TagDistribution};
use pms_core::entities::*;
use pms_core::snapshot::PanelSnapshot;
use rust_decimal_macros::dec;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn cluster() -> ClusterDescriptor {
    ClusterDescriptor {
        representative_id: "q-2".into(),
        representative_text: "How does the borrow checker handle loops?".into(),
        member_ids: vec!["q-1".into(), "q-2".into()],
        cluster_likes: 6,
        cluster_dislikes: 2,
        net_likes: 4,
    }
}

fn graded_metric() -> Metric {
    let mut metric = Metric::new("u-7", "p-1");
    metric.tag_stage_in = Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
    metric.tag_stage_out = Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 20, 0).unwrap());
    metric.tag_stage_interactions = 14;
    metric.entered_questions_score = dec!(6.5);
    metric.question_stage_score = Some(dec!(72.50));
    metric.tag_stage_score = Some(dec!(100));
    metric.vote_stage_score = Some(Default::default());
    metric.final_total_score = Some(dec!(57.50));
    metric.cohort = Some(CohortStats {
        question_stage: StageSummary {
            min: dec!(10),
            max: dec!(90),
            mean: dec!(51.25),
        },
        ..CohortStats::default()
    });
    metric
}

roundtrip_and_validate!(
    question_roundtrip,
    Question,
    Question::new("q-1", "u-1", "p-1", "What does `Send` guarantee?")
        .unwrap()
        .with_likes(["u-2", "u-3"])
        .with_dislikes(["u-4"])
        .with_similar(["q-2"])
        .with_vote_score(3)
);

roundtrip_and_validate!(
    student_roundtrip,
    Student,
    Student {
        id: "u-1".into(),
        panel_id: "p-1".into(),
    }
);

roundtrip_and_validate!(
    panel_roundtrip,
    Panel,
    Panel {
        id: "p-1".into(),
        questions_required: 2,
    }
);

roundtrip_and_validate!(ungraded_metric_roundtrip, Metric, Metric::new("u-1", "p-1"));

roundtrip_and_validate!(graded_metric_roundtrip, Metric, graded_metric());

roundtrip_and_validate!(cluster_roundtrip, ClusterDescriptor, cluster());

roundtrip_and_validate!(
    shortlist_roundtrip,
    ShortlistEntry,
    ShortlistEntry {
        cluster: cluster(),
        vote_score: 9,
    }
);

roundtrip_and_validate!(
    distribution_roundtrip,
    TagDistribution,
    TagDistribution(BTreeMap::from([(
        "u-1".to_string(),
        BTreeMap::from([
            ("q-2".to_string(), "Second".to_string()),
            ("q-3".to_string(), "Third".to_string()),
        ]),
    )]))
);

roundtrip_and_validate!(
    snapshot_roundtrip,
    PanelSnapshot,
    PanelSnapshot {
        panel: Panel {
            id: "p-1".into(),
            questions_required: 1,
        },
        students: vec![Student {
            id: "u-1".into(),
            panel_id: "p-1".into(),
        }],
        questions: vec![Question::new("q-1", "u-1", "p-1", "t").unwrap()],
        metrics: vec![graded_metric()],
    }
);
