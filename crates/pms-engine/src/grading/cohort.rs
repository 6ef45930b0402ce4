//! Cohort-wide engagement statistics.

use chrono::{DateTime, Utc};
use pms_core::entities::Metric;

use super::stats::Spread;

/// Elapsed seconds between stage entry and exit; negative if they are reversed.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn elapsed_seconds(window: (DateTime<Utc>, DateTime<Utc>)) -> f64 {
    let (entered, left) = window;
    (left - entered).num_milliseconds() as f64 / 1000.0
}

/// Spreads of stage time and tag interactions over students who completed
/// the stage. Reversed windows are left out; those students are graded as
/// failures individually.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngagementCohort {
    pub tag_time: Option<Spread>,
    pub tag_interactions: Option<Spread>,
    pub vote_time: Option<Spread>,
}

impl EngagementCohort {
    #[must_use]
    pub fn from_metrics(metrics: &[Metric]) -> Self {
        let mut tag_time = Vec::new();
        let mut tag_interactions = Vec::new();
        let mut vote_time = Vec::new();

        for metric in metrics {
            if let Some(seconds) = metric.tag_window().map(elapsed_seconds) {
                if seconds >= 0.0 {
                    tag_time.push(seconds);
                    tag_interactions.push(f64::from(metric.tag_stage_interactions));
                }
            }
            if let Some(seconds) = metric.vote_window().map(elapsed_seconds) {
                if seconds >= 0.0 {
                    vote_time.push(seconds);
                }
            }
        }

        tracing::debug!(
            tag_completed = tag_time.len(),
            vote_completed = vote_time.len(),
            "computed engagement cohort"
        );
        Self {
            tag_time: Spread::of(&tag_time),
            tag_interactions: Spread::of(&tag_interactions),
            vote_time: Spread::of(&vote_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn metric(student: &str, tag_minutes: Option<i64>, interactions: u32) -> Metric {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut metric = Metric::new(student, "p-1");
        if let Some(minutes) = tag_minutes {
            metric.tag_stage_in = Some(start);
            metric.tag_stage_out = Some(start + Duration::minutes(minutes));
        }
        metric.tag_stage_interactions = interactions;
        metric
    }

    #[test]
    fn only_completed_stages_count() {
        let metrics = vec![
            metric("u-1", Some(10), 4),
            metric("u-2", Some(30), 8),
            metric("u-3", None, 100),
        ];
        let cohort = EngagementCohort::from_metrics(&metrics);
        let time = cohort.tag_time.unwrap();
        assert!((time.mean - 1200.0).abs() < 1e-9);
        let interactions = cohort.tag_interactions.unwrap();
        assert!((interactions.mean - 6.0).abs() < 1e-9);
        assert!(cohort.vote_time.is_none());
    }

    #[test]
    fn reversed_windows_are_excluded() {
        let metrics = vec![metric("u-1", Some(10), 4), metric("u-2", Some(-5), 4)];
        let cohort = EngagementCohort::from_metrics(&metrics);
        let time = cohort.tag_time.unwrap();
        assert!((time.mean - 600.0).abs() < 1e-9);
        assert!(time.std_dev.abs() < 1e-9);
    }
}
